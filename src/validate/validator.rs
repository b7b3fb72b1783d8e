//! Tree comparison with size tolerance for binary files
//!
//! Both trees are listed from disk independently of any package document. Only
//! the original is filtered by the ignore engine; the extracted copy is taken
//! as is, so anything it has beyond the original shows up as an extra.

use crate::config::PackageConfig;
use crate::core::hash::{hash_file, ContentHash};
use crate::ignore::checker::IgnoreEngine;
use crate::ignore::scanner::{DirRecord, FileRecord, FilteredFileScanner};
use crate::package::codec::is_known_binary;
use crate::validate::report::ValidationReport;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files above this size are never hashed
pub const HASH_SIZE_LIMIT: u64 = 50 * 1024 * 1024;
/// Binary files above this size are never hashed
pub const BINARY_HASH_SIZE_LIMIT: u64 = 1024 * 1024;
/// Smallest size drift accepted for a binary file
pub const MIN_BINARY_TOLERANCE: u64 = 500;

/// Allowed size difference: zero for text, `max(500, 1%)` for binary files
pub fn size_tolerance(relative_path: &str, original_size: u64) -> u64 {
    if is_known_binary(relative_path) {
        MIN_BINARY_TOLERANCE.max(original_size / 100)
    } else {
        0
    }
}

/// Whether a file is small enough to hash
pub fn should_compare_content(relative_path: &str, size: u64) -> bool {
    if size > HASH_SIZE_LIMIT {
        return false;
    }
    !(is_known_binary(relative_path) && size > BINARY_HASH_SIZE_LIMIT)
}

/// Compares an original tree with an extracted copy
#[derive(Debug, Clone)]
pub struct TreeValidator {
    original: PathBuf,
    extracted: PathBuf,
    config: PackageConfig,
}

impl TreeValidator {
    pub fn new(original: impl Into<PathBuf>, extracted: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
            extracted: extracted.into(),
            config: PackageConfig::default(),
        }
    }

    /// Configuration for the ignore engine applied to the original tree
    pub fn with_config(mut self, config: PackageConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the comparison. Never fails; problems end up in the report.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new(&self.original, &self.extracted);
        info!(
            "Validating {} against {}",
            self.extracted.display(),
            self.original.display()
        );

        if !self.original.exists() {
            report.error(format!(
                "Original directory does not exist: {}",
                self.original.display()
            ));
            return report;
        }
        if !self.extracted.exists() {
            report.error(format!(
                "Extracted directory does not exist: {}",
                self.extracted.display()
            ));
            return report;
        }

        let engine = IgnoreEngine::for_root(&self.original, &self.config);
        let original = FilteredFileScanner::new(&engine).scan_directory(&self.original);
        let extracted = FilteredFileScanner::unfiltered().scan_directory(&self.extracted);

        for message in original.errors.into_iter().chain(extracted.errors) {
            report.error(message);
        }

        let dirs_match = compare_directories(&original.dirs, &extracted.dirs, &mut report);
        let files_match = compare_files(&original.files, &extracted.files, &mut report);

        report.validation_passed = dirs_match && files_match && report.errors.is_empty();
        info!(
            "Validation {} ({} errors, {} warnings)",
            if report.validation_passed {
                "passed"
            } else {
                "failed"
            },
            report.errors.len(),
            report.warnings.len()
        );
        report
    }
}

fn compare_directories(
    original: &BTreeMap<String, DirRecord>,
    extracted: &BTreeMap<String, DirRecord>,
    report: &mut ValidationReport,
) -> bool {
    report.statistics.total_dirs_original = original.len();
    report.statistics.total_dirs_extracted = extracted.len();

    let all: BTreeSet<&String> = original.keys().chain(extracted.keys()).collect();
    let mut dirs_match = true;

    for key in all {
        match (original.contains_key(key), extracted.contains_key(key)) {
            (true, true) => {
                debug!("Directory match: {}", key);
                report.statistics.dirs_matched += 1;
            },
            (true, false) => {
                report.error(format!("Directory missing in extracted: {}", key));
                report.statistics.dirs_missing += 1;
                dirs_match = false;
            },
            _ => {
                report.warning(format!("Extra directory in extracted: {}", key));
                report.statistics.dirs_extra += 1;
            },
        }
    }

    dirs_match
}

fn compare_files(
    original: &BTreeMap<String, FileRecord>,
    extracted: &BTreeMap<String, FileRecord>,
    report: &mut ValidationReport,
) -> bool {
    report.statistics.total_files_original = original.len();
    report.statistics.total_files_extracted = extracted.len();

    let all: BTreeSet<&String> = original.keys().chain(extracted.keys()).collect();
    let mut files_match = true;

    for key in all {
        match (original.get(key), extracted.get(key)) {
            (Some(orig), Some(extr)) => {
                if !compare_pair(key, orig, extr, report) {
                    files_match = false;
                }
            },
            (Some(_), None) => {
                report.error(format!("File missing in extracted: {}", key));
                report.statistics.files_missing += 1;
                files_match = false;
            },
            _ => {
                report.warning(format!("Extra file in extracted: {}", key));
                report.statistics.files_extra += 1;
            },
        }
    }

    files_match
}

/// Compare one file present in both trees; `false` on any mismatch
fn compare_pair(
    key: &str,
    orig: &FileRecord,
    extr: &FileRecord,
    report: &mut ValidationReport,
) -> bool {
    let mut matched = true;
    let size_diff = orig.size.abs_diff(extr.size);
    let tolerance = size_tolerance(key, orig.size);

    if size_diff > tolerance {
        report.error(format!(
            "Size mismatch for {}: original={}, extracted={}, diff={}",
            key, orig.size, extr.size, size_diff
        ));
        report.statistics.files_size_mismatch += 1;
        matched = false;
    } else if size_diff > 0 {
        debug!("Size match (within tolerance): {} (diff: {} bytes)", key, size_diff);
    } else {
        debug!("Size match: {} ({} bytes)", key, orig.size);
    }

    if !should_compare_content(key, orig.size) {
        report.warning(format!(
            "Skipping content comparison for large file: {} ({} bytes)",
            key, orig.size
        ));
        report.statistics.files_matched += 1;
        return matched;
    }

    let (Some(orig_hash), Some(extr_hash)) = (
        hash_or_warn(&orig.path, report),
        hash_or_warn(&extr.path, report),
    ) else {
        return matched;
    };

    if orig_hash == extr_hash {
        debug!("Content match: {}", key);
        report.statistics.files_matched += 1;
    } else if is_known_binary(key) && size_diff <= tolerance {
        debug!("Binary file content acceptable: {} (size within tolerance)", key);
        report.statistics.files_matched += 1;
    } else {
        report.error(format!("Content mismatch for {}", key));
        report.statistics.files_content_mismatch += 1;
        matched = false;
    }

    matched
}

fn hash_or_warn(path: &Path, report: &mut ValidationReport) -> Option<ContentHash> {
    match hash_file(path) {
        Ok(hash) => Some(hash),
        Err(e) => {
            report.warning(format!(
                "Could not calculate hash for {}: {}",
                path.display(),
                e
            ));
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("notes.txt", 50_000, 0)]
    #[case("image.png", 10_000, 500)]
    #[case("image.png", 50_000, 500)]
    #[case("video.MP4", 1_000_000, 10_000)]
    fn test_size_tolerance(#[case] path: &str, #[case] size: u64, #[case] expected: u64) {
        assert_eq!(size_tolerance(path, size), expected);
    }

    #[rstest]
    #[case("a.txt", 40 * 1024 * 1024, true)]
    #[case("a.txt", 60 * 1024 * 1024, false)]
    #[case("a.zip", 900 * 1024, true)]
    #[case("a.zip", 2 * 1024 * 1024, false)]
    fn test_should_compare_content(#[case] path: &str, #[case] size: u64, #[case] expected: bool) {
        assert_eq!(should_compare_content(path, size), expected);
    }

    fn two_roots() -> anyhow::Result<(TempDir, PathBuf, PathBuf)> {
        let temp_dir = TempDir::new()?;
        let original = temp_dir.path().join("original");
        let extracted = temp_dir.path().join("extracted");
        fs::create_dir_all(&original)?;
        fs::create_dir_all(&extracted)?;
        Ok((temp_dir, original, extracted))
    }

    #[test]
    fn test_identical_trees_pass() -> anyhow::Result<()> {
        let (_guard, original, extracted) = two_roots()?;
        for root in [&original, &extracted] {
            fs::create_dir(root.join("src"))?;
            fs::write(root.join("src/main.rs"), "fn main() {}")?;
        }

        let report = TreeValidator::new(&original, &extracted).validate();
        assert!(report.passed(), "errors: {:?}", report.errors);
        assert_eq!(report.statistics.files_matched, 1);
        assert_eq!(report.statistics.dirs_matched, 1);
        Ok(())
    }

    #[test]
    fn test_text_content_mismatch_fails() -> anyhow::Result<()> {
        let (_guard, original, extracted) = two_roots()?;
        fs::write(original.join("a.txt"), "hello")?;
        fs::write(extracted.join("a.txt"), "jello")?;

        let report = TreeValidator::new(&original, &extracted).validate();
        assert!(!report.passed());
        assert_eq!(report.statistics.files_content_mismatch, 1);
        assert_eq!(report.statistics.files_size_mismatch, 0);
        Ok(())
    }

    #[test]
    fn test_missing_and_extra() -> anyhow::Result<()> {
        let (_guard, original, extracted) = two_roots()?;
        fs::create_dir(original.join("docs"))?;
        fs::write(original.join("gone.txt"), "x")?;
        fs::create_dir(extracted.join("junk"))?;
        fs::write(extracted.join("new.txt"), "y")?;

        let report = TreeValidator::new(&original, &extracted).validate();
        let stats = &report.statistics;
        assert_eq!(stats.dirs_missing, 1);
        assert_eq!(stats.dirs_extra, 1);
        assert_eq!(stats.files_missing, 1);
        assert_eq!(stats.files_extra, 1);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 2);
        assert!(!report.passed());
        Ok(())
    }

    #[test]
    fn test_extras_alone_only_warn() -> anyhow::Result<()> {
        let (_guard, original, extracted) = two_roots()?;
        fs::write(extracted.join("bonus.txt"), "y")?;

        let report = TreeValidator::new(&original, &extracted).validate();
        assert!(report.passed());
        assert_eq!(report.warnings.len(), 1);
        Ok(())
    }

    #[test]
    fn test_ignore_engine_filters_original_only() -> anyhow::Result<()> {
        let (_guard, original, extracted) = two_roots()?;
        fs::create_dir(original.join(".git"))?;
        fs::write(original.join(".git/HEAD"), "ref")?;
        fs::create_dir(extracted.join(".git"))?;
        fs::write(extracted.join(".git/HEAD"), "ref")?;

        let report = TreeValidator::new(&original, &extracted).validate();
        // .git is skipped in the original, so the copy's .git is extra
        assert_eq!(report.statistics.total_dirs_original, 0);
        assert_eq!(report.statistics.dirs_extra, 1);
        assert_eq!(report.statistics.files_extra, 1);
        assert!(report.passed());
        Ok(())
    }

    #[test]
    fn test_missing_root_fails() {
        let report = TreeValidator::new("/no/such/original", "/no/such/copy").validate();
        assert!(!report.passed());
        assert!(report.errors[0].contains("/no/such/original"));
    }
}
