//! Verifying an extracted tree against its original

pub mod report;
pub mod validator;

pub use report::{ValidationReport, ValidationStats};
pub use validator::{should_compare_content, size_tolerance, TreeValidator};
