//! Configuration command implementation

use crate::cli::ConfigCommands;
use crate::config::PackageConfig;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Execute a config subcommand
pub fn execute(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { path, force } => init(path, force),
        ConfigCommands::Show { path } => show(path),
    }
}

fn init(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file '{}' already exists (use --force to replace it)",
            path.display()
        );
    }

    PackageConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "{} Wrote default configuration to {}",
        "✓".green().bold(),
        path.display().to_string().cyan()
    );
    Ok(())
}

fn show(path: PathBuf) -> Result<()> {
    let exists = path.exists();
    let config = PackageConfig::load_or_default(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    if exists {
        eprintln!("{}: {}", "Configuration file".bold(), path.display().to_string().cyan());
    } else {
        eprintln!(
            "{}: {} ({})",
            "Configuration file".bold(),
            path.display(),
            "not found, showing defaults".yellow()
        );
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
