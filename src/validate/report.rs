//! Validation report

use crate::core::error::{Result, TreepackError};
use crate::core::types::now_timestamp;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Counters gathered while comparing two trees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    pub total_files_original: usize,
    pub total_files_extracted: usize,
    pub total_dirs_original: usize,
    pub total_dirs_extracted: usize,
    pub files_matched: usize,
    pub files_size_mismatch: usize,
    pub files_content_mismatch: usize,
    pub files_missing: usize,
    pub files_extra: usize,
    pub dirs_matched: usize,
    pub dirs_missing: usize,
    pub dirs_extra: usize,
}

/// Outcome of comparing an original tree against its extracted copy
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub timestamp: String,
    pub original_path: PathBuf,
    pub extracted_path: PathBuf,
    pub validation_passed: bool,
    pub statistics: ValidationStats,
    /// Failures; any entry fails validation
    pub errors: Vec<String>,
    /// Extras and skipped comparisons; never fail validation alone
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub(crate) fn new(original: &Path, extracted: &Path) -> Self {
        Self {
            timestamp: now_timestamp(),
            original_path: original.to_path_buf(),
            extracted_path: extracted.to_path_buf(),
            validation_passed: false,
            statistics: ValidationStats::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.validation_passed
    }

    pub(crate) fn error(&mut self, message: String) {
        error!("{}", message);
        self.errors.push(message);
    }

    pub(crate) fn warning(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Write the report as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| TreepackError::io(path, e))
    }
}
