//! Core types and utilities for Treepack
//!
//! This module contains the package data model, error handling,
//! and content hashing used throughout the system.

pub mod error;
pub mod hash;
pub mod types;

// Re-export commonly used items
pub use error::{Result, TreepackError};
pub use hash::{hash_bytes, hash_file, ContentHash};
pub use types::{ContentBlock, DirectoryNode, FileNode, Node};
