//! Error types for archive extraction, CSV parsing and row validation.
//!
//! Structural archive problems abort an extraction with an [`ArchiveError`].
//! Problems confined to a single entry ([`EntryIssue`]) or a single CSV row
//! ([`RowWidthMismatch`]) are recovered locally: they are logged and reported
//! alongside a successful result.

use std::fmt;

use crate::archive::CompressionMethod;

/// Fatal failure of a whole extraction call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// The input envelope could not be decoded into bytes.
    #[error("invalid archive encoding: {0}")]
    InvalidEncoding(String),

    /// No End of Central Directory signature in the trailing search window.
    #[error(
        "not a ZIP archive: End of Central Directory record not found in the last {searched} bytes"
    )]
    MissingEndOfCentralDirectory {
        /// Number of trailing bytes that were scanned.
        searched: usize,
    },

    /// A central directory record did not start with `PK\x01\x02`.
    #[error("corrupt central directory entry #{index} at offset {offset:#x}: bad signature")]
    CorruptCentralDirectoryEntry { index: usize, offset: usize },

    /// The local file header referenced by the central directory is invalid.
    #[error("corrupt local file header for '{name}' at offset {offset:#x}")]
    CorruptLocalFileHeader { name: String, offset: usize },

    /// A read would have gone past the end of the buffer.
    #[error("read of {len} bytes at offset {offset:#x} exceeds archive size of {buffer_len} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    /// The archive uses a ZIP feature this extractor refuses to handle.
    #[error("unsupported ZIP feature: {0}")]
    Unsupported(UnsupportedFeature),
}

/// ZIP features that are rejected instead of being parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedFeature {
    Encryption { name: String },
    MultiDisk,
    Zip64,
    UnicodeFileName { name: String },
}

impl fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encryption { name } => write!(f, "entry '{}' is encrypted", name),
            Self::MultiDisk => write!(f, "multi-disk archives"),
            Self::Zip64 => write!(f, "ZIP64 extensions"),
            Self::UnicodeFileName { name } => {
                write!(f, "entry '{}' sets the Unicode filename flag", name)
            }
        }
    }
}

/// Non-fatal problem with a single archive entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryIssue {
    /// The entry was skipped.
    #[error("'{name}': unsupported compression method {}", .method.as_u16())]
    UnsupportedCompressionMethod {
        name: String,
        method: CompressionMethod,
    },

    /// Inflate failed; the raw payload was returned instead.
    #[error("'{name}': decompression failed ({reason}), returning raw payload")]
    DecompressionFailure { name: String, reason: String },

    /// The content length differs from the size declared in the directory.
    #[error("'{name}': declared size {declared} bytes, got {actual} bytes")]
    SizeMismatch {
        name: String,
        declared: u32,
        actual: usize,
    },
}

/// A CSV row whose width differs from the header; the row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row} has {found} fields, expected {expected}")]
pub struct RowWidthMismatch {
    /// 1-based row number among the tokenized rows, the header being row 1.
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// Failure of a whole CSV parse.
///
/// The tokenizer always terminates, so the only way to get one is an
/// input size limit configured by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("CSV input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

/// Malformed required-field list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field #{index} has an empty name")]
    EmptyFieldName { index: usize },

    #[error("required field '{0}' is listed more than once")]
    DuplicateField(String),
}

/// Result alias for archive operations.
pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;
