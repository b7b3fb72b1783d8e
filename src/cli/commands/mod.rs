//! Command implementations

pub mod config;
pub mod extract;
pub mod pack;
pub mod validate;

use chrono::Local;
use std::path::{Path, PathBuf};

/// Directory default package documents are written to
pub const OUTPUTS_DIR: &str = "outputs";
/// Directory default extractions are written to
pub const EXTRACTED_DIR: &str = "extracted";

/// Keep characters safe in file names; empty results become `directory`
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    if cleaned.is_empty() {
        "directory".to_string()
    } else {
        cleaned
    }
}

/// Timestamp suffix used in generated output names
pub fn timestamp_tag() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Where `pack` writes its document.
///
/// A bare file name goes under `outputs/`; any other path is used as given.
pub fn package_output_path(output: Option<PathBuf>, root_name: &str) -> PathBuf {
    match output {
        Some(path) if !path.is_absolute() && path.components().count() == 1 => {
            Path::new(OUTPUTS_DIR).join(path)
        },
        Some(path) => path,
        None => Path::new(OUTPUTS_DIR).join(format!(
            "{}_{}.json",
            sanitize_name(root_name),
            timestamp_tag()
        )),
    }
}

/// Where `extract` writes when no output is given
pub fn default_extract_path(root_name: &str) -> PathBuf {
    Path::new(EXTRACTED_DIR).join(format!(
        "{}_extracted_{}",
        sanitize_name(root_name),
        timestamp_tag()
    ))
}

/// Absolute form of a path for display, falling back to the path itself
pub fn display_path(path: &Path) -> String {
    dunce::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
