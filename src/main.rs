//! ACDEF - Autonomous Cross-Domain Evolutionary Fabric
//!
//! Validates configuration, sets up logging and bootstraps the document store.

use clap::Parser;
use serde_json::Value;
use tracing::{error, info};

use acdef::{
    cli::{Args, Command},
    config::Config,
    db::{schemas::SYSTEM_STATUS_COLLECTION, ConnectionManager, SystemStatusDoc},
    logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Logging is configured from the record, so config errors go to stderr
    let config = match Config::from_overrides(args.config_overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let logger = logging::configure(&config)?;
    if let Some(log_file) = logger.log_file() {
        info!("Logging to {}", log_file.display());
    }

    match args.command() {
        Command::Show => {
            println!(
                "{}",
                serde_json::to_string_pretty(&Value::Object(config.to_mapping()))?
            );
        }
        Command::InitDirs => {
            config.ensure_directories()?;
            for dir in config.paths().directories() {
                info!("Directory ready: {}", dir.display());
            }
        }
        Command::Connect { note } => {
            config.ensure_directories()?;

            let manager = ConnectionManager::mongo(&config, args.credentials.clone());
            if let Err(e) = manager.initialize_with_retry().await {
                error!("Document store unavailable: {}", e);
                println!("{}", serde_json::to_string_pretty(&manager.status().await)?);
                std::process::exit(1);
            }

            let status = manager.status().await;
            let mut doc = SystemStatusDoc::new(&config, &status);
            if let Some(note) = note {
                doc = doc.with_note(note);
            }

            let id = manager.write(SYSTEM_STATUS_COLLECTION, &doc).await?;
            info!(
                "Recorded startup status {} in {}",
                id,
                manager.collection_name(SYSTEM_STATUS_COLLECTION)
            );

            println!("{}", serde_json::to_string_pretty(&manager.status().await)?);
        }
    }

    Ok(())
}
