//! Validate command implementation

use crate::config::PackageConfig;
use crate::validate::{TreeValidator, ValidationReport};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// How many errors and warnings the summary lists before eliding
const SUMMARY_LIMIT: usize = 10;

/// Execute the validate command
pub fn execute(
    original: PathBuf,
    extracted: PathBuf,
    config: PathBuf,
    save_report: Option<PathBuf>,
) -> Result<()> {
    let config = PackageConfig::load_or_default(&config)
        .with_context(|| format!("Failed to load configuration from {}", config.display()))?;

    let report = TreeValidator::new(&original, &extracted)
        .with_config(config)
        .validate();

    print_summary(&report);

    if let Some(path) = save_report {
        report
            .save(&path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        println!("{} Report saved to: {}", "✓".green(), path.display());
    }

    if !report.passed() {
        bail!("Validation failed with {} error(s)", report.errors.len());
    }
    Ok(())
}

fn print_summary(report: &ValidationReport) {
    let stats = &report.statistics;

    println!("{}", "Validation Summary".bold());
    println!("  Original:  {}", report.original_path.display());
    println!("  Extracted: {}", report.extracted_path.display());
    println!();
    println!(
        "  Directories: {} original, {} extracted, {} matched, {} missing, {} extra",
        stats.total_dirs_original,
        stats.total_dirs_extracted,
        stats.dirs_matched,
        stats.dirs_missing,
        stats.dirs_extra
    );
    println!(
        "  Files:       {} original, {} extracted, {} matched, {} missing, {} extra",
        stats.total_files_original,
        stats.total_files_extracted,
        stats.files_matched,
        stats.files_missing,
        stats.files_extra
    );
    println!(
        "  Mismatches:  {} size, {} content",
        stats.files_size_mismatch, stats.files_content_mismatch
    );

    print_list("Errors", &report.errors, |line| line.red().to_string());
    print_list("Warnings", &report.warnings, |line| line.yellow().to_string());

    println!();
    if report.passed() {
        println!("{} {}", "✓".green().bold(), "Validation passed".green().bold());
    } else {
        println!("{} {}", "✗".red().bold(), "Validation failed".red().bold());
    }
}

fn print_list(title: &str, lines: &[String], paint: impl Fn(&str) -> String) {
    if lines.is_empty() {
        return;
    }
    println!();
    println!("  {} ({}):", title.bold(), lines.len());
    for line in lines.iter().take(SUMMARY_LIMIT) {
        println!("    • {}", paint(line));
    }
    if lines.len() > SUMMARY_LIMIT {
        println!("    ... and {} more", lines.len() - SUMMARY_LIMIT);
    }
}
