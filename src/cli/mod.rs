pub mod commands;
pub mod config;
pub mod context;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub use context::AppContext;

#[derive(Parser)]
#[command(name = "aeg")]
#[command(about = "AEG Admin - console for companies, branches and fiscal printer models")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and forget the stored session")]
    Logout,

    #[command(about = "Show the signed-in user and profile")]
    Whoami,

    #[command(about = "Company records (/empresas)")]
    Companies {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "Branch office records (/sucursales)")]
    Branches {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "Fiscal printer model records (/modelos)")]
    Models {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "Own profile: display name and avatar")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Theme preference (light, dark, system)")]
    Theme {
        #[command(subcommand)]
        cmd: commands::theme::ThemeCommands,
    },

    #[command(about = "Show the dashboard counters")]
    Dashboard,

    #[command(about = "Resolve a console path through the session guard")]
    Open {
        #[arg(help = "Path, e.g. /sucursales")]
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        // Purely local; works without a configured backend
        Commands::Theme { cmd } => commands::theme::handle(cmd, output_format),
        command => run_with_session(command, output_format).await,
    }
}

/// Signing in or out goes ahead even when the stored session cannot be resolved
fn needs_stored_session(command: &Commands) -> bool {
    !matches!(command, Commands::Login { .. } | Commands::Logout)
}

async fn run_with_session(command: Commands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AppContext::load()?;
    if let Err(e) = ctx.init().await {
        if needs_stored_session(&command) {
            return Err(e);
        }
        tracing::warn!("Stored session could not be resolved: {}", e);
    }

    let result = match command {
        Commands::Login { email, password } => commands::auth::login(&ctx, email, password, output_format).await,
        Commands::Logout => commands::auth::logout(&ctx, output_format).await,
        Commands::Whoami => commands::auth::whoami(&ctx, output_format),
        Commands::Companies { cmd } => commands::records::companies(&ctx, cmd, output_format).await,
        Commands::Branches { cmd } => commands::records::branches(&ctx, cmd, output_format).await,
        Commands::Models { cmd } => commands::records::printer_models(&ctx, cmd, output_format).await,
        Commands::Profile { cmd } => commands::profile::handle(&ctx, cmd, output_format).await,
        Commands::Theme { cmd } => commands::theme::handle(cmd, output_format),
        Commands::Dashboard => commands::dashboard::dashboard(&ctx, output_format),
        Commands::Open { path } => commands::dashboard::open(&ctx, &path, output_format),
    };

    ctx.teardown();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn login_and_logout_survive_an_unresolved_session() {
        assert!(!needs_stored_session(&command(&["aeg", "login", "ana@example.com", "--password", "x"])));
        assert!(!needs_stored_session(&command(&["aeg", "logout"])));
        assert!(needs_stored_session(&command(&["aeg", "whoami"])));
        assert!(needs_stored_session(&command(&["aeg", "companies", "list"])));
    }
}
