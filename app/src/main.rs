//! invoice-templates - Command-line manager for invoice templates
//!
//! Wires store settings, logging, and a file-backed template store together.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use store::{FileStorage, SettingsManager, TemplateStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    tracing::debug!("App data directory: {:?}", cli.data_dir);

    let mut settings_manager = SettingsManager::new(&cli.data_dir);
    let settings = settings_manager
        .load_sync()
        .with_context(|| format!("Failed to load settings from {}", cli.data_dir.display()))?
        .clone();

    let storage_dir = settings.resolve_storage_dir(&cli.data_dir);
    tracing::debug!("Template storage directory: {:?}", storage_dir);

    let store = TemplateStore::with_settings(FileStorage::new(storage_dir), &settings);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&store, cli.command, &mut out)
}
