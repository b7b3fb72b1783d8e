//! Shared helpers for Treepack integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use treepack::PackageConfig;

/// Configuration with no ignore lists apart from `.git`, capturing everything
pub fn plain_config() -> PackageConfig {
    PackageConfig {
        no_capture_extensions: Vec::new(),
        ignore_extensions: Vec::new(),
        ignore_file_patterns: Vec::new(),
        ignore_folder_patterns: vec![".git".to_string()],
        ignore_paths: Vec::new(),
        ..PackageConfig::default()
    }
}

/// Write `contents` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Deterministic non-text bytes
pub fn noise(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + 7) % 251) as u8).collect()
}
