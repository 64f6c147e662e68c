use clap::Parser;
use tracing_subscriber::EnvFilter;

use aeg_admin::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so AEG_BACKEND_URL and AEG_ANON_KEY can live next to the binary
    let _ = dotenvy::dotenv();

    let config = aeg_admin::config::config();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if aeg_admin::is_development!() && config.logging.debug_logging {
        tracing::debug!("Starting AEG Admin in {:?} mode against {}", config.environment, config.backend.url);
    }

    let cli = Cli::parse();

    if let Err(e) = aeg_admin::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
