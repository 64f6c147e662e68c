use crate::auth::AuthProvider;
use crate::grid::FormValues;
use crate::shell::Route;
use crate::types::{FieldValue, Locale};
use crate::validation::rules::first_violation;
use crate::validation::{FieldIssue, FieldRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Invalid(Vec<FieldIssue<LoginField>>),
    /// Message for the error banner above the form
    Failed(String),
    SignedIn(Route),
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    values: FormValues<LoginField>,
}

fn rules(field: LoginField) -> Vec<FieldRule> {
    match field {
        LoginField::Email => vec![
            FieldRule::required("Por favor ingresa tu correo electrónico"),
            FieldRule::email("Ingresa un correo válido"),
        ],
        LoginField::Password => vec![FieldRule::required("Por favor ingresa tu contraseña")],
    }
}

impl LoginForm {
    pub fn new(email: &str, password: &str) -> Self {
        let mut form = Self::default();
        form.set(LoginField::Email, email);
        form.set(LoginField::Password, password);
        form
    }

    pub fn set(&mut self, field: LoginField, raw: &str) {
        let value = if raw.is_empty() { FieldValue::Null } else { FieldValue::Text(raw.to_string()) };
        self.values.set(field, value);
    }

    pub fn validate(&self) -> Vec<FieldIssue<LoginField>> {
        [LoginField::Email, LoginField::Password]
            .into_iter()
            .filter_map(|field| {
                first_violation(&rules(field), self.values.get(field))
                    .map(|message| FieldIssue { field, message: message.to_string() })
            })
            .collect()
    }

    /// Validate, then sign in. On success the caller navigates to the dashboard.
    pub async fn submit(&self, auth: &dyn AuthProvider, locale: Locale) -> LoginOutcome {
        let issues = self.validate();
        if !issues.is_empty() {
            return LoginOutcome::Invalid(issues);
        }
        let email = self.values.get(LoginField::Email).to_string();
        let password = self.values.get(LoginField::Password).to_string();
        match auth.sign_in_with_password(email.trim(), &password).await {
            Ok(_) => LoginOutcome::SignedIn(Route::Dashboard),
            Err(e) => LoginOutcome::Failed(e.user_message(locale)),
        }
    }
}
