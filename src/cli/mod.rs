//! Command-line interface for Treepack

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Treepack - package directory trees into JSON and back
#[derive(Parser)]
#[command(
    name = "treepack",
    version,
    about = "Package a directory tree into a single JSON document, rebuild it, and verify the rebuild",
    long_about = "Treepack serializes a directory tree (structure, metadata and optionally file contents) into one JSON document, extracts a tree from such a document, and validates an extracted tree against its original."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory into a package document
    Pack {
        /// Root directory to scan and package
        root: PathBuf,

        /// Output file (default: outputs/<name>_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file, created with defaults if missing
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
    },

    /// Rebuild a directory tree from a package document
    Extract {
        /// Package document to extract
        package: PathBuf,

        /// Output directory (default: extracted/<name>_extracted_<timestamp>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing files and directories
        #[arg(long)]
        overwrite: bool,
    },

    /// Check that an extracted tree matches its original
    Validate {
        /// Original directory
        original: PathBuf,

        /// Extracted directory
        extracted: PathBuf,

        /// Configuration used to filter the original (defaults if missing)
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// Save the detailed report as JSON
        #[arg(long)]
        save_report: Option<PathBuf>,
    },

    /// Manage the packaging configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the default configuration
    Init {
        /// Where to write it
        #[arg(default_value = "config.json")]
        path: PathBuf,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        /// Configuration file to read (defaults if missing)
        #[arg(default_value = "config.json")]
        path: PathBuf,
    },
}
