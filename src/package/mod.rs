//! Packaging a directory tree into a document and back
//!
//! - [`serializer`] walks a directory into a [`DirectoryNode`](crate::core::DirectoryNode)
//! - [`codec`] captures and materializes file contents
//! - [`document`] persists package documents as JSON
//! - [`extractor`] rebuilds a tree on disk from a document

pub mod codec;
pub mod document;
pub mod extractor;
pub mod serializer;

// Re-export commonly used items
pub use codec::{is_known_binary, CapturePolicy, ContentCodec, TextEncoding};
pub use document::{load_package, save_package};
pub use extractor::{ExtractFailure, ExtractOutcome, ExtractStats, TreeExtractor};
pub use serializer::{ScanOutcome, ScanStats, TreeSerializer};
