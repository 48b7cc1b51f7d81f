//! alert-engine - predictive-maintenance alert engine

#![allow(missing_docs)]

use clap::Parser;
use predictive_alerts::utils::logging::init_logging;
use predictive_alerts::{AlertEngine, Config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "alert-engine", version, about = "Predictive-maintenance alert engine")]
struct Cli {
    /// YAML configuration file; defaults plus environment when omitted
    #[arg(short, long, env = "ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Apply database migrations and exit
    #[arg(long)]
    migrate_only: bool,
}

async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            // Logging is configured from the file, so report on stderr
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.logging());

    let engine = AlertEngine::new(config);
    let result = if cli.migrate_only {
        info!("Running migrations only");
        engine.migrate().await
    } else {
        engine.run().await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
