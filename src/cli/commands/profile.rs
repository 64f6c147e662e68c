use anyhow::bail;
use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::{output_notifications, output_success, output_value};
use crate::cli::{AppContext, OutputFormat};
use crate::pages::{ProfileEditor, ProfileOutcome};
use crate::shell::Route;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show the account settings")]
    Show,

    #[command(about = "Change the display name")]
    Rename {
        #[arg(help = "New display name")]
        name: String,
    },

    #[command(about = "Upload a new profile picture")]
    Avatar {
        #[arg(help = "Image file")]
        file: PathBuf,
    },
}

pub async fn handle(ctx: &AppContext, cmd: ProfileCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.require(Route::Profile)?;
    let editor = ProfileEditor::new(ctx.profiles.clone(), ctx.session.clone(), ctx.notifications.clone(), ctx.locale());

    let outcome = match cmd {
        ProfileCommands::Show => {
            let view = editor.view();
            return output_value(
                &output_format,
                &json!({
                    "name": view.name,
                    "email": view.email,
                    "avatar_url": view.avatar_url,
                    "role": view.role.label,
                }),
            );
        }
        ProfileCommands::Rename { name } => editor.save_name(&name).await,
        ProfileCommands::Avatar { file } => {
            let bytes = std::fs::read(&file)?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "avatar".to_string());
            editor.change_avatar(&file_name, bytes).await
        }
    };

    output_notifications(&output_format, ctx.notifications.take());
    match outcome {
        ProfileOutcome::Saved => {
            let view = editor.view();
            output_success(
                &output_format,
                "Profile saved",
                Some(json!({ "name": view.name, "avatar_url": view.avatar_url })),
            )
        }
        ProfileOutcome::Invalid(message) => bail!("{}", message),
        ProfileOutcome::Skipped => bail!("{}", crate::messages::no_active_session(ctx.locale())),
        ProfileOutcome::Failed(err) => bail!("{}", err.message),
    }
}
