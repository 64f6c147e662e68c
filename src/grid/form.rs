use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::types::{FieldKind, FieldValue};
use crate::validation::rules::first_violation;
use crate::validation::{normalize_text, FieldIssue, FieldRule};

static NULL: FieldValue = FieldValue::Null;

/// Values entered in a form, keyed by field
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues<F: Eq + Hash> {
    values: HashMap<F, FieldValue>,
}

impl<F: Eq + Hash> Default for FormValues<F> {
    fn default() -> Self {
        Self { values: HashMap::new() }
    }
}

impl<F: Copy + Eq + Hash + Debug> FormValues<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: F) -> &FieldValue {
        self.values.get(&field).unwrap_or(&NULL)
    }

    pub fn set(&mut self, field: F, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Required text
    pub fn text(&self, field: F) -> Result<String, String> {
        match self.get(field) {
            v if v.is_empty() => Err(format!("{field:?} is required")),
            v => Ok(v.to_string().trim().to_string()),
        }
    }

    pub fn optional_text(&self, field: F) -> Option<String> {
        let value = self.get(field);
        if value.is_empty() { None } else { Some(value.to_string().trim().to_string()) }
    }

    /// Switches are off unless set
    pub fn flag(&self, field: F) -> bool {
        self.get(field).as_bool().unwrap_or(false)
    }

    pub fn integer(&self, field: F) -> Result<i64, String> {
        self.get(field).as_integer().ok_or_else(|| format!("{field:?} must be an integer"))
    }

    pub fn decimal(&self, field: F) -> Result<Decimal, String> {
        self.get(field).as_decimal().ok_or_else(|| format!("{field:?} must be a number"))
    }

    pub fn date(&self, field: F) -> Option<NaiveDate> {
        self.get(field).as_date()
    }
}

/// One input of a create form
#[derive(Debug, Clone)]
pub struct FormField<F> {
    pub field: F,
    pub label: String,
    pub kind: FieldKind,
    pub rules: Vec<FieldRule>,
    /// Apply [`normalize_text`] to text input as it is entered
    pub normalize: bool,
    pub initial: FieldValue,
    pub placeholder: Option<String>,
}

impl<F> FormField<F> {
    pub fn new(field: F, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            field,
            label: label.into(),
            kind,
            rules: vec![],
            normalize: false,
            initial: FieldValue::Null,
            placeholder: None,
        }
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }

    pub fn initial(mut self, value: FieldValue) -> Self {
        self.initial = value;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(FieldRule::is_required)
    }
}

/// Create-record form: field specs plus the values typed so far
#[derive(Debug, Clone)]
pub struct CreateForm<F: Eq + Hash> {
    fields: Vec<FormField<F>>,
    values: FormValues<F>,
}

impl<F: Copy + Eq + Hash + Debug> CreateForm<F> {
    pub fn new(fields: Vec<FormField<F>>) -> Self {
        let mut form = Self { fields, values: FormValues::new() };
        form.reset();
        form
    }

    pub fn fields(&self) -> &[FormField<F>] {
        &self.fields
    }

    pub fn values(&self) -> &FormValues<F> {
        &self.values
    }

    fn definition(&self, field: F) -> Option<&FormField<F>> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Parse raw input according to the field kind and store it
    pub fn set_input(&mut self, field: F, raw: &str) -> Result<(), String> {
        let def = self.definition(field).ok_or_else(|| format!("{field:?} is not part of this form"))?;
        let value = FieldValue::parse(def.kind, raw)?;
        self.set_value(field, value);
        Ok(())
    }

    pub fn set_value(&mut self, field: F, value: FieldValue) {
        let normalize = self.definition(field).is_some_and(|s| s.normalize);
        let value = match value {
            FieldValue::Text(s) if normalize => FieldValue::Text(normalize_text(s.as_str())),
            other => other,
        };
        self.values.set(field, value);
    }

    /// Every failing field with the message of its first broken rule
    pub fn validate(&self) -> Vec<FieldIssue<F>> {
        self.fields
            .iter()
            .filter_map(|def| {
                first_violation(&def.rules, self.values.get(def.field))
                    .map(|message| FieldIssue { field: def.field, message: message.to_string() })
            })
            .collect()
    }

    /// Back to initial values
    pub fn reset(&mut self) {
        self.values.clear();
        for def in &self.fields {
            self.values.set(def.field, def.initial.clone());
        }
    }
}
