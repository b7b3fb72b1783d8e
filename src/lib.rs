//! Treepack - directory trees as single JSON documents
//!
//! Treepack captures a directory tree (structure, metadata and, within policy
//! limits, file contents) into one JSON package document, rebuilds a tree on
//! disk from such a document, and validates a rebuilt tree against its
//! original.
//!
//! # Core Features
//!
//! - **Ignore rules**: a `.gitignore` at the scan root, or configured filters
//! - **Content capture**: UTF-8 and legacy text verbatim, everything else as base64
//! - **Best-effort extraction**: one bad entry never aborts the rest
//! - **Validation**: size tolerance for binary files, content hashes for the rest
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use treepack::{PackageConfig, TreeExtractor, TreeSerializer, TreeValidator};
//! use std::path::Path;
//!
//! let outcome = TreeSerializer::new(PackageConfig::default()).scan(Path::new("./my-project"))?;
//! treepack::save_package(&outcome.root, Path::new("my-project.json"))?;
//!
//! let root = treepack::load_package(Path::new("my-project.json"))?;
//! TreeExtractor::new().extract(&root, Path::new("./restored"))?;
//!
//! let report = TreeValidator::new("./my-project", "./restored").validate();
//! assert!(report.passed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod ignore;
pub mod package;
pub mod validate;

// Re-export commonly used types
pub use crate::core::{
    error::{Result, TreepackError},
    types::{ContentBlock, DirectoryNode, FileNode, Node},
};

pub use crate::config::PackageConfig;

pub use crate::ignore::{IgnoreEngine, IgnoreMode};

pub use crate::package::{
    load_package, save_package, ContentCodec, ExtractOutcome, ScanOutcome, TreeExtractor,
    TreeSerializer,
};

pub use crate::validate::{TreeValidator, ValidationReport};

/// Current version of Treepack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
