//! Package extraction
//!
//! Rebuilds a directory tree from a package document. Failures on individual
//! entries are counted and collected while the remaining siblings are still
//! processed; only fatal document errors abort the run.

use crate::core::error::{Result, TreepackError};
use crate::core::types::{DirectoryNode, FileNode, Node};
use crate::package::codec;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Counters for one extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    /// Directories created (pre-existing ones left alone are not counted)
    pub directories: usize,
    /// Files written
    pub files: usize,
    /// Entries that failed
    pub errors: usize,
}

/// A single entry that could not be extracted
#[derive(Debug, Clone)]
pub struct ExtractFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Result of an extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractOutcome {
    pub stats: ExtractStats,
    pub failures: Vec<ExtractFailure>,
}

impl ExtractOutcome {
    fn record(&mut self, path: &Path, error: TreepackError) {
        warn!("Error processing {}: {}", path.display(), error);
        self.stats.errors += 1;
        self.failures.push(ExtractFailure {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }
}

/// Materializes package documents onto disk
#[derive(Debug, Clone, Default)]
pub struct TreeExtractor {
    overwrite: bool,
}

impl TreeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recreate entries that already exist instead of leaving them untouched
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Extract the children of `root` into `destination`.
    ///
    /// The destination is created if needed; failing to create it is an
    /// error, as is any fatal content block error.
    pub fn extract(&self, root: &DirectoryNode, destination: &Path) -> Result<ExtractOutcome> {
        info!("Extracting '{}' to {}", root.name, destination.display());

        let mut outcome = ExtractOutcome::default();
        self.create_directory(destination, &mut outcome)?;
        self.extract_children(&root.contents, destination, &mut outcome)?;

        info!(
            "Extracted {} directories, {} files, {} errors",
            outcome.stats.directories, outcome.stats.files, outcome.stats.errors
        );
        Ok(outcome)
    }

    fn extract_children(
        &self,
        nodes: &[Node],
        parent: &Path,
        outcome: &mut ExtractOutcome,
    ) -> Result<()> {
        for node in nodes {
            match node {
                Node::Directory(dir) => {
                    let path = match child_path(parent, &dir.name) {
                        Ok(path) => path,
                        Err(e) => {
                            outcome.record(parent, e);
                            continue;
                        },
                    };
                    match self.create_directory(&path, outcome) {
                        Ok(()) => self.extract_children(&dir.contents, &path, outcome)?,
                        Err(e) => outcome.record(&path, e),
                    }
                },
                Node::File(file) => {
                    let path = match child_path(parent, &file.name) {
                        Ok(path) => path,
                        Err(e) => {
                            outcome.record(parent, e);
                            continue;
                        },
                    };
                    match self.extract_file(file, &path) {
                        Ok(true) => outcome.stats.files += 1,
                        Ok(false) => {},
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => outcome.record(&path, e),
                    }
                },
                Node::Unknown => {
                    warn!("Skipping entry of unknown type in {}", parent.display());
                },
            }
        }
        Ok(())
    }

    fn create_directory(&self, path: &Path, outcome: &mut ExtractOutcome) -> Result<()> {
        if path.is_dir() && !self.overwrite {
            debug!("Directory already exists: {}", path.display());
            return Ok(());
        }

        debug!("Creating directory: {}", path.display());
        fs::create_dir_all(path).map_err(|e| TreepackError::io(path, e))?;
        outcome.stats.directories += 1;
        Ok(())
    }

    /// Returns `false` when an existing file was left untouched
    fn extract_file(&self, file: &FileNode, path: &Path) -> Result<bool> {
        if path.exists() && !self.overwrite {
            debug!("File already exists, skipping: {}", path.display());
            return Ok(false);
        }

        debug!("Creating file: {}", path.display());
        codec::materialize(file, path)?;
        Ok(true)
    }
}

/// Join an entry name onto its parent, refusing names that would escape it
fn child_path(parent: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(parent.join(name)),
        _ => Err(TreepackError::UnsafeEntryName {
            name: name.to_string(),
            parent: parent.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ContentBlock;
    use crate::package::codec::encode_bytes;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn text_file(name: &str, data: &str) -> Node {
        Node::File(FileNode::new(
            name,
            data.len() as u64,
            None,
            Some(encode_bytes(data.as_bytes(), false)),
        ))
    }

    fn sample() -> DirectoryNode {
        let mut sub = DirectoryNode::new("sub");
        sub.contents.push(text_file("b.txt", "bee"));
        let mut root = DirectoryNode::new("root");
        root.contents.push(Node::Directory(sub));
        root.contents.push(text_file("a.txt", "hello"));
        root
    }

    #[test]
    fn test_extract_creates_tree() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let dest = temp_dir.path().join("out");

        let outcome = TreeExtractor::new().extract(&sample(), &dest)?;

        assert_eq!(fs::read_to_string(dest.join("a.txt"))?, "hello");
        assert_eq!(fs::read_to_string(dest.join("sub/b.txt"))?, "bee");
        assert_eq!(
            outcome.stats,
            ExtractStats {
                directories: 2,
                files: 2,
                errors: 0
            }
        );
        Ok(())
    }

    #[test]
    fn test_existing_entries_untouched_without_overwrite() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let dest = temp_dir.path();
        fs::write(dest.join("a.txt"), "local edit")?;

        let outcome = TreeExtractor::new().extract(&sample(), dest)?;
        assert_eq!(fs::read_to_string(dest.join("a.txt"))?, "local edit");
        assert_eq!(outcome.stats.files, 1);
        assert_eq!(outcome.stats.directories, 1);

        let outcome = TreeExtractor::new()
            .with_overwrite(true)
            .extract(&sample(), dest)?;
        assert_eq!(fs::read_to_string(dest.join("a.txt"))?, "hello");
        assert_eq!(outcome.stats.files, 2);
        Ok(())
    }

    #[test]
    fn test_failures_do_not_stop_siblings() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let dest = temp_dir.path().join("out");

        let mut root = DirectoryNode::new("root");
        root.contents.push(Node::File(FileNode::new(
            "bad.txt",
            4,
            None,
            Some(ContentBlock::Text {
                encoding: "latin-1".to_string(),
                data: "☃☃".to_string(),
            }),
        )));
        root.contents.push(Node::Unknown);
        root.contents.push(text_file("../escape.txt", "x"));
        root.contents.push(text_file("good.txt", "ok"));

        let outcome = TreeExtractor::new().extract(&root, &dest)?;

        assert_eq!(fs::read_to_string(dest.join("good.txt"))?, "ok");
        assert!(!temp_dir.path().join("escape.txt").exists());
        assert_eq!(outcome.stats.errors, 2);
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.stats.files, 1);
        Ok(())
    }

    #[test]
    fn test_unsupported_encoding_aborts() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut root = DirectoryNode::new("root");
        root.contents.push(Node::File(FileNode::new(
            "x.bin",
            2,
            None,
            Some(ContentBlock::Binary {
                encoding: "hex".to_string(),
                data: "0000".to_string(),
            }),
        )));

        let err = TreeExtractor::new()
            .extract(&root, temp_dir.path())
            .unwrap_err();
        assert!(matches!(err, TreepackError::UnsupportedEncoding { .. }));
        Ok(())
    }

    #[test]
    fn test_destination_that_is_a_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let dest = temp_dir.path().join("occupied");
        fs::write(&dest, "file")?;

        assert!(TreeExtractor::new().extract(&sample(), &dest).is_err());
        Ok(())
    }

    #[test]
    fn test_child_path_rejects_traversal() {
        let parent = Path::new("/out");
        assert!(child_path(parent, "ok.txt").is_ok());
        assert!(child_path(parent, "..").is_err());
        assert!(child_path(parent, "a/b").is_err());
        assert!(child_path(parent, "/etc").is_err());
        assert!(child_path(parent, "").is_err());
    }
}
