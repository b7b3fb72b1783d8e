//! Packaging configuration management
//!
//! Settings for what a scan ignores and which file contents it captures,
//! stored as JSON next to where the tool is run.

pub mod package_config;

// Re-export commonly used items
pub use package_config::{PackageConfig, DEFAULT_MAX_CONTENT_SIZE};
