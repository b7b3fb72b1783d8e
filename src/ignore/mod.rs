//! Ignore rules for directory scans
//!
//! This module decides which filesystem entries a scan skips. A scan root with a
//! `.gitignore` is filtered by that file alone; otherwise the configured
//! extension, glob and path lists apply. The choice is made once per root and
//! carried by an [`IgnoreEngine`] value.

pub mod checker;
pub mod parser;
pub mod scanner;

// Re-export commonly used items
pub use checker::{IgnoreEngine, IgnoreMode, IgnoreResult, ESSENTIAL_IGNORES};
pub use parser::{PatternFile, PATTERN_FILE_NAME};
pub use scanner::{FilteredFileScanner, TreeListing};
