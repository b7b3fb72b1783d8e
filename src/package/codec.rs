//! Content capture and materialization
//!
//! Capturing turns a file's bytes into a [`ContentBlock`]: UTF-8 text when
//! possible, then a legacy single-byte encoding, and base64 otherwise. Files
//! with a known binary extension skip the text attempts. Materializing writes a
//! block back to disk byte for byte.

use crate::core::error::{Result, TreepackError};
use crate::core::types::{extension_of, parse_timestamp, ContentBlock, FileNode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Extensions always captured as base64 and compared with size tolerance
pub const KNOWN_BINARY_EXTENSIONS: &[&str] = &[
    // Office documents
    ".xlsx", ".xls", ".doc", ".docx", ".ppt", ".pptx", ".pdf",
    // Archives
    ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz",
    // Executables and libraries
    ".exe", ".dll", ".so", ".dylib", ".bin", ".img", ".iso",
    // Audio and video
    ".mp3", ".mp4", ".avi", ".mkv", ".wav", ".flac",
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp", ".ico",
    // Data containers
    ".sqlite", ".db", ".parquet", ".pkl",
];

/// Block encoding name for binary data
pub const BASE64_ENCODING: &str = "base64";

/// Whether a file name ends with a known binary extension (case-insensitive)
pub fn is_known_binary(name: &str) -> bool {
    let lowered = name.to_lowercase();
    KNOWN_BINARY_EXTENSIONS
        .iter()
        .any(|ext| lowered.ends_with(ext))
}

/// Text encodings a content block may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Cp1252,
    Iso8859_1,
}

impl TextEncoding {
    /// Tried in order after UTF-8 fails
    pub const FALLBACKS: [TextEncoding; 3] = [
        TextEncoding::Latin1,
        TextEncoding::Cp1252,
        TextEncoding::Iso8859_1,
    ];

    /// Name written into content blocks
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Cp1252 => "cp1252",
            TextEncoding::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Resolve a block's declared encoding, tolerating common aliases
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Some(TextEncoding::Utf8),
            "latin-1" | "latin1" | "l1" => Some(TextEncoding::Latin1),
            "cp1252" | "windows-1252" => Some(TextEncoding::Cp1252),
            "iso-8859-1" | "iso8859-1" => Some(TextEncoding::Iso8859_1),
            _ => None,
        }
    }

    /// Strict decode; `None` when the bytes are not valid in this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                Some(encoding_rs::mem::decode_latin1(bytes).into_owned())
            },
            TextEncoding::Cp1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }

    /// Strict encode; `None` when the text has characters this encoding lacks
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Some(text.as_bytes().to_vec()),
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                if encoding_rs::mem::is_str_latin1(text) {
                    Some(encoding_rs::mem::encode_latin1_lossy(text).into_owned())
                } else {
                    None
                }
            },
            TextEncoding::Cp1252 => {
                let (bytes, _, had_unmappable) = encoding_rs::WINDOWS_1252.encode(text);
                if had_unmappable {
                    None
                } else {
                    Some(bytes.into_owned())
                }
            },
        }
    }
}

/// Which files get their bytes captured
#[derive(Debug, Clone, PartialEq)]
pub struct CapturePolicy {
    pub capture_contents: bool,
    pub max_content_size: u64,
    /// Lowercased; when non-empty only these extensions are captured
    pub capture_extensions: Vec<String>,
    /// Lowercased; never captured
    pub no_capture_extensions: Vec<String>,
}

impl Default for CapturePolicy {
    fn default() -> Self {
        crate::config::PackageConfig::default().capture_policy()
    }
}

impl CapturePolicy {
    /// Apply the four capture checks. Files without an extension compare as "".
    pub fn allows(&self, size: u64, extension: Option<&str>) -> bool {
        if !self.capture_contents {
            return false;
        }
        if size > self.max_content_size {
            return false;
        }

        let extension = extension.unwrap_or("");
        if !self.capture_extensions.is_empty()
            && !self.capture_extensions.iter().any(|ext| ext == extension)
        {
            return false;
        }
        !self.no_capture_extensions.iter().any(|ext| ext == extension)
    }
}

/// Captures file contents according to a [`CapturePolicy`]
#[derive(Debug, Clone, Default)]
pub struct ContentCodec {
    policy: CapturePolicy,
}

impl ContentCodec {
    pub fn new(policy: CapturePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CapturePolicy {
        &self.policy
    }

    /// Capture a file's contents, or `None` when policy skips it or it is empty.
    ///
    /// Read failures are returned as an error block, never raised.
    pub fn capture(&self, path: &Path, size: u64) -> Option<ContentBlock> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&name);

        if !self.policy.allows(size, extension.as_deref()) {
            debug!("Not capturing contents of {} ({} bytes)", path.display(), size);
            return None;
        }
        if size == 0 {
            return None;
        }

        Some(encode_file(path, is_known_binary(&name)))
    }
}

/// Read a file and encode it as a content block
pub fn encode_file(path: &Path, known_binary: bool) -> ContentBlock {
    match fs::read(path) {
        Ok(bytes) => encode_bytes(&bytes, known_binary),
        Err(e) => {
            let error = TreepackError::io(path, e);
            warn!("Could not read contents of {}", error);
            ContentBlock::Error {
                error: error.to_string(),
            }
        },
    }
}

/// Encode bytes: UTF-8, then each fallback encoding, then base64
pub fn encode_bytes(bytes: &[u8], known_binary: bool) -> ContentBlock {
    if !known_binary {
        let attempts = std::iter::once(TextEncoding::Utf8).chain(TextEncoding::FALLBACKS);
        for encoding in attempts {
            if let Some(data) = encoding.decode(bytes) {
                return ContentBlock::Text {
                    encoding: encoding.label().to_string(),
                    data,
                };
            }
        }
    }

    ContentBlock::Binary {
        encoding: BASE64_ENCODING.to_string(),
        data: STANDARD.encode(bytes),
    }
}

/// Decode a content block back into the bytes to write
pub fn decode_block(block: &ContentBlock, path: &Path) -> Result<Vec<u8>> {
    match block {
        ContentBlock::Text { encoding, data } => {
            let text_encoding =
                TextEncoding::from_label(encoding).ok_or_else(|| TreepackError::UnsupportedEncoding {
                    kind: "text".to_string(),
                    encoding: encoding.clone(),
                    path: path.to_path_buf(),
                })?;
            text_encoding
                .encode(data)
                .ok_or_else(|| TreepackError::UnencodableText {
                    encoding: encoding.clone(),
                    path: path.to_path_buf(),
                })
        },
        ContentBlock::Binary { encoding, data } => {
            if encoding != BASE64_ENCODING {
                return Err(TreepackError::UnsupportedEncoding {
                    kind: "binary".to_string(),
                    encoding: encoding.clone(),
                    path: path.to_path_buf(),
                });
            }
            STANDARD
                .decode(data)
                .map_err(|e| TreepackError::InvalidBase64 {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
        },
        ContentBlock::Error { .. } => {
            debug!(
                "Original file had a read error, creating empty file: {}",
                path.display()
            );
            Ok(Vec::new())
        },
    }
}

/// Write a file node to `path` and restore its modification time.
///
/// Nodes without contents (skipped, empty, or failed at scan time) become
/// empty files.
pub fn materialize(file: &FileNode, path: &Path) -> Result<()> {
    let bytes = match &file.contents {
        Some(block) => decode_block(block, path)?,
        None => Vec::new(),
    };

    fs::write(path, &bytes).map_err(|e| TreepackError::io(path, e))?;

    if let Some(modified) = file.modified.as_deref().and_then(parse_timestamp) {
        if let Err(e) = set_modified(path, modified) {
            debug!("Could not set modification time on {}: {}", path.display(), e);
        }
    }

    Ok(())
}

fn set_modified(path: &Path, time: SystemTime) -> std::io::Result<()> {
    fs::File::options().write(true).open(path)?.set_modified(time)
}
