//! Package document persistence
//!
//! A package is stored as pretty-printed JSON (2-space indent). Loading checks
//! the top-level shape before deserializing so a wrong file fails with a
//! diagnostic naming it.

use crate::core::error::{Result, TreepackError};
use crate::core::types::DirectoryNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Serializes the root with its `"type": "directory"` tag without cloning it
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RootRef<'a> {
    Directory(&'a DirectoryNode),
}

/// Render a package document as pretty JSON
pub fn to_json(root: &DirectoryNode) -> Result<String> {
    Ok(serde_json::to_string_pretty(&RootRef::Directory(root))?)
}

/// Write a package document, creating parent directories as needed
pub fn save_package(root: &DirectoryNode, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TreepackError::io(parent, e))?;
        }
    }

    let json = to_json(root)?;
    fs::write(path, json).map_err(|e| TreepackError::io(path, e))
}

/// Parse a package document. `origin` is only used in diagnostics.
pub fn from_json(text: &str, origin: &Path) -> Result<DirectoryNode> {
    let value = parse_unbounded(text)
        .map_err(|e| TreepackError::invalid_package(origin, format!("not valid JSON: {}", e)))?;

    let Some(object) = value.as_object() else {
        return Err(TreepackError::invalid_package(
            origin,
            "expected a directory structure at the top level",
        ));
    };

    match object.get("type").and_then(Value::as_str) {
        Some("directory") => {},
        Some(other) => {
            return Err(TreepackError::invalid_package(
                origin,
                format!("top-level type is '{}', expected 'directory'", other),
            ))
        },
        None => {
            return Err(TreepackError::invalid_package(
                origin,
                "missing top-level type, expected 'directory'",
            ))
        },
    }

    serde_json::from_value(value).map_err(|e| TreepackError::invalid_package(origin, e.to_string()))
}

/// Parse JSON without serde_json's nesting limit.
///
/// Every directory level nests twice (the node and its `contents` array), so
/// the default limit of 128 would cap trees at about 63 levels.
fn parse_unbounded(text: &str) -> serde_json::Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Read and parse a package document from disk
pub fn load_package(path: &Path) -> Result<DirectoryNode> {
    let text = fs::read_to_string(path).map_err(|e| TreepackError::io(path, e))?;
    from_json(&text, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ContentBlock, FileNode, Node};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> DirectoryNode {
        let mut root = DirectoryNode::new("project");
        root.path = Some("/work/project".to_string());
        root.generated_at = Some("2024-05-01T09:00:00.000000+00:00".to_string());
        root.contents.push(Node::Directory(DirectoryNode::new("sub")));
        root.contents.push(Node::File(FileNode::new(
            "a.txt",
            5,
            None,
            Some(ContentBlock::Text {
                encoding: "utf-8".to_string(),
                data: "hello".to_string(),
            }),
        )));
        root
    }

    #[test]
    fn test_root_is_tagged_and_indented() -> Result<()> {
        let json = to_json(&sample())?;
        assert!(json.starts_with("{\n  \"type\": \"directory\",\n  \"name\": \"project\""));
        assert!(json.contains("\"generated_at\""));
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("out").join("pkg.json");

        save_package(&sample(), &path)?;
        assert_eq!(load_package(&path)?, sample());
        Ok(())
    }

    #[test]
    fn test_rejects_non_directory_root() {
        let err = from_json(r#"{"name": "a.txt", "type": "file"}"#, Path::new("p.json"))
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("'file'"));

        let err = from_json("[1, 2]", Path::new("p.json")).unwrap_err();
        assert!(matches!(err, TreepackError::InvalidPackage { .. }));

        let err = from_json("{\"name\": \"x\"}", Path::new("p.json")).unwrap_err();
        assert!(err.to_string().contains("missing top-level type"));
    }

    #[test]
    fn test_deep_document_loads() -> Result<()> {
        let mut node = DirectoryNode::new("d149");
        node.contents.push(Node::File(FileNode::new("leaf.txt", 0, None, None)));
        for level in (0..149).rev() {
            let mut parent = DirectoryNode::new(format!("d{}", level));
            parent.contents.push(Node::Directory(node));
            node = parent;
        }

        let json = to_json(&node)?;
        let loaded = from_json(&json, Path::new("deep.json"))?;
        assert_eq!(loaded.directory_count(), 149);
        assert_eq!(loaded.file_count(), 1);
        Ok(())
    }

    #[test]
    fn test_rejects_trailing_data() {
        let text = r#"{"type": "directory", "name": "x"} []"#;
        let err = from_json(text, Path::new("p.json")).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = from_json("{\"type\": \"directory\"", Path::new("broken.json")).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
