//! Per-scan ignore strategy
//!
//! An [`IgnoreEngine`] is chosen once per scan root: if the root holds a
//! pattern file, only that file (plus a couple of essential names) decides what
//! is skipped; otherwise the static configuration lists do. The two are never
//! combined for the same entry.

use crate::config::PackageConfig;
use crate::ignore::parser::{PatternFile, PATTERN_FILE_NAME};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Names ignored in pattern-file mode regardless of the file's content
pub const ESSENTIAL_IGNORES: &[&str] = &[".git", "__pycache__"];

/// Result of ignore checking
#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreResult {
    /// Entry should be skipped
    Ignored(String), // Reason for ignoring
    /// Entry should be included
    Included,
}

impl IgnoreResult {
    pub fn is_ignored(&self) -> bool {
        matches!(self, IgnoreResult::Ignored(_))
    }
}

/// Static filter lists, with globs compiled once
#[derive(Debug, Clone)]
pub struct ConfiguredFilters {
    ignore_extensions: Vec<String>,
    file_patterns: Vec<Pattern>,
    folder_patterns: Vec<Pattern>,
    ignore_paths: Vec<String>,
}

impl ConfiguredFilters {
    pub fn from_config(config: &PackageConfig) -> Self {
        Self {
            ignore_extensions: config
                .ignore_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            file_patterns: compile_all(&config.ignore_file_patterns, "ignore_file_patterns"),
            folder_patterns: compile_all(&config.ignore_folder_patterns, "ignore_folder_patterns"),
            ignore_paths: config.ignore_paths.clone(),
        }
    }

    fn check(&self, path: &Path, name: &str, is_dir: bool) -> IgnoreResult {
        if !is_dir {
            let lowered = name.to_lowercase();
            if let Some(ext) = self
                .ignore_extensions
                .iter()
                .find(|ext| lowered.ends_with(ext.as_str()))
            {
                return IgnoreResult::Ignored(format!("extension {}", ext));
            }
        }

        if let Some(pattern) = self.file_patterns.iter().find(|p| p.matches(name)) {
            return IgnoreResult::Ignored(format!("file pattern {}", pattern.as_str()));
        }

        if is_dir {
            if let Some(pattern) = self.folder_patterns.iter().find(|p| p.matches(name)) {
                return IgnoreResult::Ignored(format!("folder pattern {}", pattern.as_str()));
            }
        }

        let full_path = path.to_string_lossy();
        if let Some(ignored) = self
            .ignore_paths
            .iter()
            .find(|ignored| name == ignored.as_str() || full_path.ends_with(ignored.as_str()))
        {
            return IgnoreResult::Ignored(format!("path {}", ignored));
        }

        IgnoreResult::Included
    }
}

/// The active filtering strategy for one scan
#[derive(Debug, Clone)]
pub enum IgnoreMode {
    /// A pattern file was found at the scan root
    PatternFile(PatternFile),
    /// No pattern file; configured lists apply
    Configuration(ConfiguredFilters),
}

/// Ignore decisions for every entry under one scan root
#[derive(Debug, Clone)]
pub struct IgnoreEngine {
    root: PathBuf,
    mode: IgnoreMode,
}

impl IgnoreEngine {
    /// Select the strategy for `root` by probing for a pattern file there.
    ///
    /// An unreadable pattern file is logged and the configuration lists are
    /// used instead.
    pub fn for_root(root: &Path, config: &PackageConfig) -> Self {
        let pattern_path = root.join(PATTERN_FILE_NAME);
        if pattern_path.is_file() {
            match PatternFile::from_file(&pattern_path) {
                Ok(patterns) => {
                    debug!(
                        "Using {} at {} ({} patterns)",
                        PATTERN_FILE_NAME,
                        root.display(),
                        patterns.patterns().len()
                    );
                    return Self::with_patterns(root, patterns);
                },
                Err(e) => {
                    warn!("Failed to read {}: {}", pattern_path.display(), e);
                },
            }
        }

        Self::with_config(root, config)
    }

    /// Engine in pattern-file mode with already parsed patterns
    pub fn with_patterns(root: &Path, patterns: PatternFile) -> Self {
        Self {
            root: root.to_path_buf(),
            mode: IgnoreMode::PatternFile(patterns),
        }
    }

    /// Engine in configuration mode
    pub fn with_config(root: &Path, config: &PackageConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            mode: IgnoreMode::Configuration(ConfiguredFilters::from_config(config)),
        }
    }

    pub fn mode(&self) -> &IgnoreMode {
        &self.mode
    }

    pub fn uses_pattern_file(&self) -> bool {
        matches!(self.mode, IgnoreMode::PatternFile(_))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decide whether an entry under the root is skipped
    pub fn check(&self, path: &Path, is_dir: bool) -> IgnoreResult {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match &self.mode {
            IgnoreMode::PatternFile(patterns) => {
                if ESSENTIAL_IGNORES.contains(&name.as_str()) {
                    return IgnoreResult::Ignored(format!("essential {}", name));
                }
                let relative = self.relative_path(path);
                match patterns.matching_pattern(&name, &relative, is_dir) {
                    Some(pattern) => IgnoreResult::Ignored(format!("pattern {}", pattern.original)),
                    None => IgnoreResult::Included,
                }
            },
            IgnoreMode::Configuration(filters) => filters.check(path, &name, is_dir),
        }
    }

    /// Shorthand for [`IgnoreEngine::check`] when the reason is not needed
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        self.check(path, is_dir).is_ignored()
    }

    /// Root-relative path with `/` separators
    pub fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        normalize_separators(relative)
    }
}

/// Render a path with `/` separators regardless of platform
pub fn normalize_separators(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn compile_all(patterns: &[String], key: &str) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|raw| match Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Invalid glob '{}' in {}: {}", raw, key, e);
                None
            },
        })
        .collect()
}
