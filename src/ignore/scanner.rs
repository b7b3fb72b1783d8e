//! Flat directory listing with optional ignore filtering
//!
//! Used where a tree is compared by root-relative path rather than serialized
//! into nested nodes.

use crate::ignore::checker::{normalize_separators, IgnoreEngine};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A file found by the scanner
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// A directory found by the scanner
#[derive(Debug, Clone)]
pub struct DirRecord {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

/// Result of listing a tree, keyed by `/`-separated root-relative path
#[derive(Debug, Default)]
pub struct TreeListing {
    pub files: BTreeMap<String, FileRecord>,
    pub dirs: BTreeMap<String, DirRecord>,
    /// Entries that could not be read, with the cause
    pub errors: Vec<String>,
    /// Entries skipped by the ignore engine
    pub ignored: usize,
}

/// Walks a tree, skipping whatever the ignore engine excludes
pub struct FilteredFileScanner<'a> {
    ignore: Option<&'a IgnoreEngine>,
}

impl<'a> FilteredFileScanner<'a> {
    /// Scanner that lists everything
    pub fn unfiltered() -> Self {
        Self { ignore: None }
    }

    /// Scanner that consults `engine` before yielding or descending
    pub fn new(engine: &'a IgnoreEngine) -> Self {
        Self {
            ignore: Some(engine),
        }
    }

    /// List every file and directory under `root`, excluding `root` itself
    pub fn scan_directory(&self, root: &Path) -> TreeListing {
        let mut listing = TreeListing::default();
        let mut ignored = 0usize;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                match self.ignore {
                    Some(engine) => {
                        let result = engine.check(entry.path(), entry.file_type().is_dir());
                        if result.is_ignored() {
                            debug!("Skipping {}: {:?}", entry.path().display(), result);
                            ignored += 1;
                            false
                        } else {
                            true
                        }
                    },
                    None => true,
                }
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let location = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    warn!("Error scanning {}: {}", location, e);
                    listing
                        .errors
                        .push(format!("Error scanning {}: {}", location, e));
                    continue;
                },
            };

            if entry.depth() == 0 {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let key = normalize_separators(relative);

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Could not stat {}: {}", entry.path().display(), e);
                    listing
                        .errors
                        .push(format!("Could not stat {}: {}", entry.path().display(), e));
                    continue;
                },
            };

            if metadata.is_file() {
                listing.files.insert(
                    key,
                    FileRecord {
                        path: entry.path().to_path_buf(),
                        size: metadata.len(),
                        modified: metadata.modified().ok(),
                    },
                );
            } else if metadata.is_dir() {
                listing.dirs.insert(
                    key,
                    DirRecord {
                        path: entry.path().to_path_buf(),
                        modified: metadata.modified().ok(),
                    },
                );
            }
        }

        listing.ignored = ignored;
        listing
    }
}
