//! Directory tree serializer
//!
//! Walks a directory depth-first and builds the nested [`DirectoryNode`]
//! document. The ignore strategy is chosen once at the root and reused for the
//! whole walk.

use crate::config::PackageConfig;
use crate::core::error::{Result, TreepackError};
use crate::core::types::{format_timestamp, now_timestamp, DirectoryNode, FileNode, Node};
use crate::ignore::checker::IgnoreEngine;
use crate::package::codec::ContentCodec;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Counters for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Directories included below the root
    pub directories: usize,
    /// Files included
    pub files: usize,
    /// Entries skipped by the ignore engine
    pub ignored: usize,
}

/// Result of a scan: the document root and its counters
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub root: DirectoryNode,
    pub stats: ScanStats,
}

/// Builds package documents from directories on disk
#[derive(Debug, Clone)]
pub struct TreeSerializer {
    config: PackageConfig,
    codec: ContentCodec,
}

impl TreeSerializer {
    pub fn new(config: PackageConfig) -> Self {
        let codec = ContentCodec::new(config.capture_policy());
        Self { config, codec }
    }

    /// Scan `root` into a package document.
    ///
    /// Only a missing or non-directory root is an error; failures below the
    /// root are recorded on the affected node.
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome> {
        if !root.exists() {
            return Err(TreepackError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(TreepackError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let absolute = dunce::canonicalize(root).map_err(|e| TreepackError::io(root, e))?;
        let engine = IgnoreEngine::for_root(&absolute, &self.config);
        info!(
            "Scanning {} ({} mode)",
            absolute.display(),
            if engine.uses_pattern_file() {
                "pattern-file"
            } else {
                "configuration"
            }
        );

        let name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| absolute.display().to_string());

        let mut root_node = DirectoryNode {
            name,
            path: Some(absolute.display().to_string()),
            generated_at: Some(now_timestamp()),
            ..Default::default()
        };

        let mut walk = Walk {
            engine: &engine,
            codec: &self.codec,
            stats: ScanStats::default(),
        };
        walk.fill(&absolute, &mut root_node);

        let stats = walk.stats;
        info!(
            "Scanned {} directories, {} files, ignored {}",
            stats.directories, stats.files, stats.ignored
        );

        Ok(ScanOutcome {
            root: root_node,
            stats,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EntryKind {
    Directory,
    File,
    Other,
}

struct ListedEntry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
}

struct Walk<'a> {
    engine: &'a IgnoreEngine,
    codec: &'a ContentCodec,
    stats: ScanStats,
}

impl Walk<'_> {
    fn fill(&mut self, dir: &Path, node: &mut DirectoryNode) {
        let entries = match list_sorted(dir) {
            Ok((entries, error)) => {
                if let Some(error) = error {
                    warn!("Incomplete listing: {}", error);
                    node.error = Some(error);
                }
                entries
            },
            Err(error) => {
                warn!("Error scanning {}", error);
                node.error = Some(error.to_string());
                return;
            },
        };

        for entry in entries {
            let is_dir = entry.kind == EntryKind::Directory;
            let verdict = self.engine.check(&entry.path, is_dir);
            if verdict.is_ignored() {
                debug!("Ignoring {}: {:?}", entry.path.display(), verdict);
                self.stats.ignored += 1;
                continue;
            }

            match entry.kind {
                EntryKind::File => {
                    self.stats.files += 1;
                    node.contents.push(Node::File(self.file_node(&entry)));
                },
                EntryKind::Directory => {
                    self.stats.directories += 1;
                    let mut child = DirectoryNode::new(entry.name);
                    self.fill(&entry.path, &mut child);
                    node.contents.push(Node::Directory(child));
                },
                EntryKind::Other => {
                    debug!("Skipping symlink or special entry {}", entry.path.display());
                },
            }
        }
    }

    fn file_node(&self, entry: &ListedEntry) -> FileNode {
        match fs::metadata(&entry.path) {
            Ok(metadata) => {
                let size = metadata.len();
                let modified = metadata.modified().ok().map(format_timestamp);
                let contents = self.codec.capture(&entry.path, size);
                FileNode::new(entry.name.clone(), size, modified, contents)
            },
            Err(e) => {
                let error = TreepackError::io(&entry.path, e);
                warn!("Could not get info for file {}", error);
                FileNode::failed(entry.name.clone(), error.to_string())
            },
        }
    }
}

/// List a directory in document order: directories first, then by lowercased
/// name, with the exact name as tie-break.
///
/// Symlinks are not followed and come back as [`EntryKind::Other`]. Entry-level
/// errors do not discard the readable entries; the last one is returned
/// alongside them.
fn list_sorted(dir: &Path) -> Result<(Vec<ListedEntry>, Option<String>)> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by(|a, b| {
            let a_name = a.file_name().to_string_lossy();
            let b_name = b.file_name().to_string_lossy();
            a.file_type()
                .is_file()
                .cmp(&b.file_type().is_file())
                .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
                .then_with(|| a_name.cmp(&b_name))
        });

    let mut entries = Vec::new();
    let mut error = None;
    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            // The directory itself could not be opened
            Err(e) if e.path() == Some(dir) => {
                return Err(TreepackError::io(dir, std::io::Error::from(e)));
            },
            Err(e) => {
                error = Some(e.to_string());
                continue;
            },
        };

        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        entries.push(ListedEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
            kind,
        });
    }

    Ok((entries, error))
}
