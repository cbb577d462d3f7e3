use anyhow::Result;
use clap::Parser;
use prescripto_core::tracing::{config::InstrumentationConfig, init::init_tracing};
use prescripto_daemon::Settings;
use prescripto_http::ApiRouters;
use std::path::PathBuf;
use tracing::info;

/// Prescripto backend server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let instrumentation_config = InstrumentationConfig {
        service_name: "prescripto-server".to_string(),
        service_version: env!("CARGO_PKG_VERSION").to_string(),
        log_level: std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "prescripto=debug,tower_http=debug".to_string()),
        ..InstrumentationConfig::from_env()
    };
    init_tracing(&instrumentation_config)?;

    if let Some(path) = &cli.config {
        info!("Loading configuration from: {}", path.display());
    }
    let settings = Settings::load(cli.config.as_deref())?;

    prescripto_daemon::run(settings, ApiRouters::default(), async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
        }
    })
    .await?;

    Ok(())
}
