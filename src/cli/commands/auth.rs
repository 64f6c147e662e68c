use anyhow::bail;
use serde_json::json;
use std::io::BufRead;
use std::time::Duration;
use tracing::warn;

use crate::cli::utils::{output_success, output_value};
use crate::cli::{AppContext, OutputFormat};
use crate::pages::{LoginForm, LoginOutcome};
use crate::shell::display_name;

pub async fn login(ctx: &AppContext, email: String, password: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let mut state_rx = ctx.session.subscribe();
    let form = LoginForm::new(&email, &password);
    match form.submit(ctx.auth.as_ref(), ctx.locale()).await {
        LoginOutcome::Invalid(issues) => {
            let messages: Vec<String> = issues.into_iter().map(|i| i.message).collect();
            bail!("{}", messages.join("; "))
        }
        LoginOutcome::Failed(message) => bail!("{}", message),
        LoginOutcome::SignedIn(route) => {
            // The session listener applies the sign-in event with its profile
            let signed_in = state_rx.wait_for(|s| s.is_authenticated());
            if tokio::time::timeout(Duration::from_secs(5), signed_in).await.is_err() {
                warn!("Timed out waiting for the session to pick up the sign-in");
            }
            let state = ctx.session.current();
            output_success(
                &output_format,
                &format!("Signed in as {}", display_name(&state)),
                Some(json!({ "redirect": route.path() })),
            )
        }
    }
}

pub async fn logout(ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.session.sign_out().await?;
    output_success(&output_format, "Signed out", None)
}

pub fn whoami(ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let state = ctx.session.current();
    let Some(user) = state.user() else {
        bail!("{}", crate::messages::no_active_session(ctx.locale()));
    };

    let profile = state.profile.as_ref();
    let value = json!({
        "id": user.id,
        "email": user.email,
        "name": display_name(&state),
        "role": profile.map(|p| p.rol.to_string()),
        "avatar_url": profile.and_then(|p| p.foto_perfil.clone()),
    });
    output_value(&output_format, &value)
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
