//! Pack command implementation

use super::{display_path, package_output_path};
use crate::config::PackageConfig;
use crate::package::{save_package, TreeSerializer};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Execute the pack command
pub fn execute(root: PathBuf, output: Option<PathBuf>, config: PathBuf) -> Result<()> {
    let config = PackageConfig::load_or_bootstrap(&config)
        .with_context(|| format!("Failed to load configuration from {}", config.display()))?;

    let outcome = TreeSerializer::new(config)
        .scan(&root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    let output_path = package_output_path(output, &outcome.root.name);
    save_package(&outcome.root, &output_path)
        .with_context(|| format!("Failed to write package {}", output_path.display()))?;

    println!(
        "{} Generated package: {}",
        "✓".green().bold(),
        display_path(&output_path).cyan()
    );
    println!("  {} {}", "Directories:".bold(), outcome.stats.directories);
    println!("  {} {}", "Files:".bold(), outcome.stats.files);
    if outcome.stats.ignored > 0 {
        println!(
            "  {} {}",
            "Ignored:".bold(),
            outcome.stats.ignored.to_string().yellow()
        );
    }

    Ok(())
}
