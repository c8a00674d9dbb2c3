//! Review relay CLI
//!
//! Command-line interface for the homework review status relay.

use std::path::PathBuf;

use clap::Parser;
use review_relay::{load_config, logging, Config, Credentials};
use tracing::Level;

#[derive(Parser)]
#[command(name = "review-relay")]
#[command(about = "Relays homework review status changes to a Telegram chat")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Status API endpoint (overrides config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Seconds between polls (overrides config file)
    #[arg(long)]
    retry_period_seconds: Option<u64>,

    /// Log file path (overrides config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "debug", value_parser = parse_log_level)]
    log_level: Level,
}

fn parse_log_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid log level: {}. Use: trace, debug, info, warn, error",
            s
        )
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(config_path) => load_config(config_path)?,
        None => Config::default(),
    };

    if let Some(endpoint) = args.endpoint {
        config.api.endpoint = endpoint;
    }
    if let Some(retry_period_seconds) = args.retry_period_seconds {
        config.polling.retry_period_seconds = retry_period_seconds;
    }
    if let Some(log_file) = args.log_file {
        config.log.file = Some(log_file);
    }

    let _log_guard = logging::init(args.log_level, config.log.file.as_deref())?;

    tracing::debug!(
        "Parsed command line arguments: config={:?}, log_level={:?}",
        args.config,
        args.log_level
    );

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("Missing required credentials, exiting: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Starting review relay");
    tracing::info!("Status API: {}", config.api.endpoint);
    tracing::info!("Poll interval: {}s", config.polling.retry_period_seconds);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(review_relay::run(config, credentials))?;

    Ok(())
}
