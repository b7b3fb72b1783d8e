//! Extract command implementation

use super::{default_extract_path, display_path};
use crate::package::{load_package, TreeExtractor};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Execute the extract command
pub fn execute(package: PathBuf, output: Option<PathBuf>, overwrite: bool) -> Result<()> {
    if !package.exists() {
        bail!("Package file '{}' does not exist", package.display());
    }
    if !package.is_file() {
        bail!("'{}' is not a file", package.display());
    }

    let root = load_package(&package)
        .with_context(|| format!("Failed to load package {}", package.display()))?;

    let destination = output.unwrap_or_else(|| default_extract_path(&root.name));
    let outcome = TreeExtractor::new()
        .with_overwrite(overwrite)
        .extract(&root, &destination)
        .with_context(|| format!("Extraction into {} aborted", destination.display()))?;

    println!(
        "{} Extracted to: {}",
        "✓".green().bold(),
        display_path(&destination).cyan()
    );
    println!("  {} {}", "Directories created:".bold(), outcome.stats.directories);
    println!("  {} {}", "Files created:".bold(), outcome.stats.files);

    if outcome.stats.errors > 0 {
        println!(
            "  {} {}",
            "Errors:".bold(),
            outcome.stats.errors.to_string().yellow()
        );
        for failure in &outcome.failures {
            println!(
                "    {} {}: {}",
                "•".yellow(),
                failure.path.display(),
                failure.message
            );
        }
    }

    Ok(())
}
