//! Treepack CLI
//!
//! Command-line interface for packaging, extracting and validating directory trees.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use treepack::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over the verbosity flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Execute the command
    match cli.command {
        Commands::Pack { root, output, config } => {
            cli::commands::pack::execute(root, output, config)
        },
        Commands::Extract { package, output, overwrite } => {
            cli::commands::extract::execute(package, output, overwrite)
        },
        Commands::Validate { original, extracted, config, save_report } => {
            cli::commands::validate::execute(original, extracted, config, save_report)
        },
        Commands::Config { command } => cli::commands::config::execute(command),
    }
}
