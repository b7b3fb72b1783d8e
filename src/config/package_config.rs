//! Packaging configuration
//!
//! Loaded from a JSON file (`config.json` by default). Every field is optional
//! in the file: an absent field keeps its built-in default, a field of the wrong
//! type keeps its default and logs a warning. List fields replace the default
//! list wholesale when present.

use crate::core::error::{Result, TreepackError};
use crate::package::codec::CapturePolicy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

/// Default upper bound for captured file contents (10 MiB)
pub const DEFAULT_MAX_CONTENT_SIZE: u64 = 10 * 1024 * 1024;

const DEFAULT_NO_CAPTURE_EXTENSIONS: &[&str] = &[
    ".exe", ".dll", ".so", ".dylib", ".bin", ".img", ".iso", ".zip", ".rar", ".7z", ".tar",
    ".gz", ".bz2", ".xz", ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".mp3",
    ".mp4", ".avi", ".mkv", ".wav", ".flac", ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff",
    ".webp", ".ico",
];

const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    ".pyc", ".pyo", ".pyd", ".so", ".dll", ".dylib", ".o", ".obj", ".exe", ".bin", ".log",
    ".tmp", ".temp", ".cache", ".bak", ".swp", ".swo", "~", ".DS_Store", "Thumbs.db",
];

const DEFAULT_IGNORE_FILE_PATTERNS: &[&str] =
    &["*.tmp", "*.temp", "*.log", "*.cache", "*.bak", ".*", "#*#", "*~"];

const DEFAULT_IGNORE_FOLDER_PATTERNS: &[&str] = &[
    "__pycache__",
    "*.egg-info",
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    "CVS",
    ".vscode",
    ".idea",
    "node_modules",
    "venv",
    "env",
    ".env",
    "virtualenv",
    ".venv",
    "build",
    "dist",
    "target",
    "bin",
    "obj",
    ".pytest_cache",
    ".coverage",
    ".tox",
    ".mypy_cache",
    "outputs",
];

const DEFAULT_IGNORE_PATHS: &[&str] = &[
    ".gitignore",
    ".gitattributes",
    "LICENSE",
    "setup.py",
    "setup.cfg",
    "pyproject.toml",
    "Pipfile",
    "Pipfile.lock",
];

/// Configuration for scanning and content capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Capture file bytes at all
    pub capture_contents: bool,
    /// Files larger than this are recorded without contents
    pub max_content_size: u64,
    /// When non-empty, only these extensions are captured
    pub capture_extensions: Vec<String>,
    /// Extensions never captured
    pub no_capture_extensions: Vec<String>,
    /// Case-insensitive name suffixes excluding files from the scan
    pub ignore_extensions: Vec<String>,
    /// Globs matched against entry names
    pub ignore_file_patterns: Vec<String>,
    /// Globs matched against directory names
    pub ignore_folder_patterns: Vec<String>,
    /// Exact names, or suffixes of the full path
    pub ignore_paths: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            capture_contents: true,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            capture_extensions: Vec::new(),
            no_capture_extensions: to_strings(DEFAULT_NO_CAPTURE_EXTENSIONS),
            ignore_extensions: to_strings(DEFAULT_IGNORE_EXTENSIONS),
            ignore_file_patterns: to_strings(DEFAULT_IGNORE_FILE_PATTERNS),
            ignore_folder_patterns: to_strings(DEFAULT_IGNORE_FOLDER_PATTERNS),
            ignore_paths: to_strings(DEFAULT_IGNORE_PATHS),
        }
    }
}

impl PackageConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TreepackError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            TreepackError::configuration(format!(
                "Invalid JSON in config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::from_value(&value))
    }

    /// Load configuration, writing the defaults to `path` first if it does not exist
    pub fn load_or_bootstrap(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let config = Self::default();
        config.save(path)?;
        info!("Created default configuration at {}", path.display());
        Ok(config)
    }

    /// Load configuration if `path` exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to disk as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| TreepackError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            TreepackError::configuration(format!(
                "Failed to save config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Build a configuration from parsed JSON, falling back per field
    pub fn from_value(value: &Value) -> Self {
        let mut config = Self::default();

        let Some(map) = value.as_object() else {
            warn!("Configuration is not a JSON object, using defaults");
            return config;
        };

        if let Some(raw) = map.get("capture_contents") {
            match raw.as_bool() {
                Some(flag) => config.capture_contents = flag,
                None => warn!("'capture_contents' in config should be a boolean, using default"),
            }
        }

        if let Some(raw) = map.get("max_content_size") {
            match raw.as_u64().filter(|size| *size > 0) {
                Some(size) => config.max_content_size = size,
                None => warn!(
                    "'max_content_size' in config should be a positive integer, using default"
                ),
            }
        }

        override_list(map, "capture_extensions", &mut config.capture_extensions);
        override_list(map, "no_capture_extensions", &mut config.no_capture_extensions);
        override_list(map, "ignore_extensions", &mut config.ignore_extensions);
        override_list(map, "ignore_file_patterns", &mut config.ignore_file_patterns);
        override_list(map, "ignore_folder_patterns", &mut config.ignore_folder_patterns);
        override_list(map, "ignore_paths", &mut config.ignore_paths);

        config
    }

    /// Content capture settings for the codec
    pub fn capture_policy(&self) -> CapturePolicy {
        CapturePolicy {
            capture_contents: self.capture_contents,
            max_content_size: self.max_content_size,
            capture_extensions: lowercase_all(&self.capture_extensions),
            no_capture_extensions: lowercase_all(&self.no_capture_extensions),
        }
    }
}

fn override_list(map: &Map<String, Value>, key: &str, target: &mut Vec<String>) {
    let Some(raw) = map.get(key) else {
        return;
    };

    let parsed = raw.as_array().and_then(|items| {
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
    });

    match parsed {
        Some(list) => *target = list,
        None => warn!("'{}' in config should be a list of strings, using default", key),
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|item| item.to_lowercase()).collect()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = PackageConfig::default();

        assert!(config.capture_contents);
        assert_eq!(config.max_content_size, 10_485_760);
        assert!(config.capture_extensions.is_empty());
        assert!(config.ignore_folder_patterns.contains(&".git".to_string()));
        assert!(config.ignore_paths.contains(&"LICENSE".to_string()));
    }

    #[test]
    fn test_lists_replace_defaults() {
        let config = PackageConfig::from_value(&json!({
            "ignore_folder_patterns": ["cache"],
            "ignore_extensions": []
        }));

        assert_eq!(config.ignore_folder_patterns, vec!["cache".to_string()]);
        assert!(config.ignore_extensions.is_empty());
        // Untouched fields keep their defaults
        assert_eq!(config.ignore_paths, PackageConfig::default().ignore_paths);
    }

    #[test]
    fn test_wrong_types_fall_back() {
        let config = PackageConfig::from_value(&json!({
            "capture_contents": "yes",
            "max_content_size": -4,
            "ignore_paths": "LICENSE",
            "ignore_file_patterns": ["*.tmp", 3]
        }));

        assert_eq!(config, PackageConfig::default());
    }

    #[test]
    fn test_valid_scalars() {
        let config = PackageConfig::from_value(&json!({
            "capture_contents": false,
            "max_content_size": 2048
        }));

        assert!(!config.capture_contents);
        assert_eq!(config.max_content_size, 2048);
    }

    #[test]
    fn test_non_object_uses_defaults() {
        assert_eq!(
            PackageConfig::from_value(&json!([1, 2, 3])),
            PackageConfig::default()
        );
    }

    #[test]
    fn test_bootstrap_writes_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("config.json");

        let config = PackageConfig::load_or_bootstrap(&path)?;
        assert!(path.exists());
        assert_eq!(config, PackageConfig::default());

        let reloaded = PackageConfig::load(&path)?;
        assert_eq!(reloaded, config);
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json")?;

        let err = PackageConfig::load(&path).unwrap_err();
        assert!(matches!(err, TreepackError::ConfigurationError { .. }));
        assert!(err.to_string().contains("config.json"));
        Ok(())
    }

    #[test]
    fn test_capture_policy_lowercases() {
        let config = PackageConfig {
            capture_extensions: vec![".TXT".to_string()],
            ..Default::default()
        };
        assert_eq!(config.capture_policy().capture_extensions, vec![".txt"]);
    }
}
