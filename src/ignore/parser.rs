//! Pattern-file parser for `.gitignore`-style ignore files
//!
//! Only the subset the packager honours is interpreted: blank lines and `#`
//! comments are skipped, a trailing `/` makes a pattern directory-only, and a
//! pattern matches when either the entry's base name or its root-relative path
//! matches the glob. Negation lines (`!pattern`) are parsed and kept but never
//! applied.

use crate::core::error::{Result, TreepackError};
use glob::{Pattern, PatternError};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the pattern file probed at the scan root
pub const PATTERN_FILE_NAME: &str = ".gitignore";

/// A compiled pattern from a pattern file
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// The original line, trimmed
    pub original: String,
    /// The compiled glob pattern
    pub pattern: Pattern,
    /// Type of pattern (normal or negation)
    pub pattern_type: PatternType,
    /// Whether this pattern only matches directories
    pub directory_only: bool,
}

/// Type of ignore pattern
#[derive(Debug, Clone, PartialEq)]
pub enum PatternType {
    /// Normal ignore pattern
    Ignore,
    /// Negation pattern (starts with !). Recognised, never applied.
    Negation,
}

/// Parsed contents of a pattern file
#[derive(Debug, Clone, Default)]
pub struct PatternFile {
    patterns: Vec<CompiledPattern>,
}

impl PatternFile {
    /// Parse a pattern file from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TreepackError::io(path, e))?;
        Ok(Self::from_content(&content))
    }

    /// Parse pattern file content. Invalid globs are skipped with a warning.
    pub fn from_content(content: &str) -> Self {
        let mut patterns = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            match parse_line(line) {
                Ok(Some(pattern)) => patterns.push(pattern),
                Ok(None) => {}, // Empty line or comment
                Err(e) => {
                    warn!(
                        "Invalid ignore pattern on line {}: {} ({})",
                        line_num + 1,
                        line.trim(),
                        e
                    );
                },
            }
        }

        let negations = patterns
            .iter()
            .filter(|p| p.pattern_type == PatternType::Negation)
            .count();
        if negations > 0 {
            debug!("{} negation pattern(s) recognised but not applied", negations);
        }

        Self { patterns }
    }

    /// Return the first ignore pattern matching the entry, if any.
    ///
    /// `relative_path` is relative to the scan root with `/` separators.
    pub fn matching_pattern(
        &self,
        name: &str,
        relative_path: &str,
        is_dir: bool,
    ) -> Option<&CompiledPattern> {
        self.patterns
            .iter()
            .filter(|p| p.pattern_type == PatternType::Ignore)
            .find(|p| matches_pattern(p, name, relative_path, is_dir))
    }

    /// Check if an entry should be ignored
    pub fn is_ignored(&self, name: &str, relative_path: &str, is_dir: bool) -> bool {
        self.matching_pattern(name, relative_path, is_dir).is_some()
    }

    /// Get all patterns, negations included
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }
}

/// Check if a pattern matches an entry
fn matches_pattern(
    pattern: &CompiledPattern,
    name: &str,
    relative_path: &str,
    is_dir: bool,
) -> bool {
    // Directory-only patterns only match directories
    if pattern.directory_only && !is_dir {
        return false;
    }

    pattern.pattern.matches(name) || pattern.pattern.matches(relative_path)
}

/// Parse a single line from a pattern file
fn parse_line(line: &str) -> std::result::Result<Option<CompiledPattern>, PatternError> {
    let line = line.trim();

    // Skip empty lines and comments
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (pattern_type, pattern_str) = match line.strip_prefix('!') {
        Some(rest) => (PatternType::Negation, rest),
        None => (PatternType::Ignore, line),
    };

    let (directory_only, clean_pattern) = match pattern_str.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, pattern_str),
    };

    if clean_pattern.is_empty() {
        return Ok(None);
    }

    let compiled = Pattern::new(&clean_pattern.replace('\\', "/"))?;

    Ok(Some(CompiledPattern {
        original: line.to_string(),
        pattern: compiled,
        pattern_type,
        directory_only,
    }))
}
