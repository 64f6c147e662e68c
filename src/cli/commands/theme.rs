use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;
use crate::theme::{detect_system_dark, ThemeContext, ThemePreference};

#[derive(Subcommand)]
pub enum ThemeCommands {
    #[command(about = "Show the stored preference and the effective theme")]
    Get,

    #[command(about = "Store a new preference")]
    Set {
        #[arg(help = "light, dark or system")]
        preference: ThemePreference,
    },
}

pub fn handle(cmd: ThemeCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let storage = crate::cli::config::local_storage()?;
    let theme = ThemeContext::new(storage, detect_system_dark());

    match cmd {
        ThemeCommands::Get => output_value(
            &output_format,
            &json!({
                "preference": theme.preference().to_string(),
                "effective": if theme.is_dark() { "dark" } else { "light" },
            }),
        ),
        ThemeCommands::Set { preference } => {
            theme.set_preference(preference)?;
            output_success(
                &output_format,
                &format!("Theme set to {}", preference),
                Some(json!({ "preference": preference.to_string() })),
            )
        }
    }
}
