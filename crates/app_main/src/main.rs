//! ArchiveShell - shell over the contents of a tar or zip archive
//!
//! Main entry point.

mod app;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "archive_shell", version, about = "Browse an archive like a filesystem")]
struct Args {
    /// Configuration file (defaults to ./config.toml, then the platform config dir)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("ArchiveShell starting...");

    let config = app_core::ShellConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;

    let state = app_core::ShellState::open(&config)
        .with_context(|| format!("failed to open {}", config.vfs_path.display()))?;

    app::run(&config, state)?;

    tracing::info!("ArchiveShell stopped");
    Ok(())
}
