//! Package document data model
//!
//! A package is a tree of [`Node`]s rooted at a [`DirectoryNode`]. The serde
//! attributes here define the persisted JSON shape: nodes are internally tagged
//! by `"type"`, directory children and captured file bytes both live under
//! `"contents"`.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A single entry in a package tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Directory(DirectoryNode),
    File(FileNode),
    /// Any node whose `type` is not recognised. Kept so a single odd entry does
    /// not invalidate the whole document.
    #[serde(other)]
    Unknown,
}

impl Node {
    /// Entry name, if the node is a known kind
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Directory(dir) => Some(&dir.name),
            Node::File(file) => Some(&file.name),
            Node::Unknown => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            Node::Directory(dir) => Some(dir),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }
}

/// A directory and its ordered children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub name: String,
    /// Absolute path of the scanned root. Root only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Scan timestamp. Root only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// Children, directories first, then case-insensitive by name
    #[serde(default)]
    pub contents: Vec<Node>,
    /// Listing failure recorded instead of aborting the walk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DirectoryNode {
    /// Create an empty nested directory node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Look up a direct child by exact name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.contents.iter().find(|node| node.name() == Some(name))
    }

    /// Resolve a `/`-separated path relative to this directory
    pub fn find(&self, relative: &str) -> Option<&Node> {
        let mut parts = relative.split('/').filter(|part| !part.is_empty());
        let first = parts.next()?;
        let mut current = self.child(first)?;
        for part in parts {
            current = current.as_directory()?.child(part)?;
        }
        Some(current)
    }

    /// Count of files below this directory, recursively
    pub fn file_count(&self) -> usize {
        self.contents
            .iter()
            .map(|node| match node {
                Node::File(_) => 1,
                Node::Directory(dir) => dir.file_count(),
                Node::Unknown => 0,
            })
            .sum()
    }

    /// Count of directories below this directory, recursively
    pub fn directory_count(&self) -> usize {
        self.contents
            .iter()
            .map(|node| match node {
                Node::Directory(dir) => 1 + dir.directory_count(),
                _ => 0,
            })
            .sum()
    }
}

/// A file's metadata and, when captured, its bytes
///
/// At most one of `contents` and `error` is set. Neither being set means the
/// capture policy skipped the bytes, or the file was empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    /// On-disk size at scan time, whether or not contents were captured
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// Lowercased extension including the leading dot
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileNode {
    /// A file whose metadata was read successfully
    pub fn new(
        name: impl Into<String>,
        size: u64,
        modified: Option<String>,
        contents: Option<ContentBlock>,
    ) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            size,
            modified,
            extension,
            contents,
            error: None,
        }
    }

    /// A file whose metadata could not be read
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            extension,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Captured representation of a file's bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        #[serde(default = "default_text_encoding")]
        encoding: String,
        #[serde(default)]
        data: String,
    },
    Binary {
        #[serde(default)]
        encoding: String,
        #[serde(default)]
        data: String,
    },
    /// Reading failed at scan time
    Error {
        #[serde(default)]
        error: String,
    },
}

fn default_text_encoding() -> String {
    "utf-8".to_string()
}

/// Lowercased extension with its leading dot, `None` for names without one.
///
/// Dotfiles such as `.bashrc` and names ending in a dot have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Render a filesystem time the way package documents store it
pub fn format_timestamp(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Current time in package timestamp format
pub fn now_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse a package timestamp. Accepts RFC 3339 and naive ISO-8601 (local time).
pub fn parse_timestamp(value: &str) -> Option<SystemTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.into());
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(SystemTime::from)
}
