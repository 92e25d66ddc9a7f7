// ABOUTME: Main entry point for apimctl, the API management admin console CLI
//
// Binary: apimctl
// Usage: apimctl [--format text|json] <COMMAND>
// - list / show: browse entities of a resource family
// - save / deny-status: create or edit through the entity forms
// - delete: confirm-then-delete an entity
// - role add: run the add-role wizard
// - auth: store or clear the access token

#![allow(missing_docs)]

use anyhow::{Context, Result};
use apim_console::cli;
use apim_console::config::AppConfig;
use clap::Parser;
use std::fs::OpenOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    if let Err(e) = setup_logging(&config) {
        eprintln!("Warning: file logging disabled: {e:#}");
    }
    setup_panic_handler();

    tracing::info!(base_url = %config.backend.base_url, "apimctl starting");
    let result = cli::execute(args, config).await;
    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }
    result
}

fn setup_logging(config: &AppConfig) -> Result<()> {
    use tracing_subscriber::prelude::*;

    let log_dir = config.log_directory()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    // JSONL log file with timestamp
    let log_file = log_dir.join(format!(
        "apim-console-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.as_str().into());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()             // Output in JSON Lines format
                .with_target(true)  // Include target module in JSON
                .with_writer(file)
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
