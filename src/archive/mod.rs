//! ZIP archive parsing and extraction.
//!
//! This module reads ZIP archives that are already fully in memory,
//! typically decoded from a base64 envelope, without an archive library.
//!
//! ## Architecture
//!
//! - [`reader`]: bounds-checked little-endian reads over the buffer
//! - [`structures`]: data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: locating the EOCD, walking the Central Directory, resolving Local File Headers
//! - [`extractor`]: decoding entries into [`ArchiveEntry`] values
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end, optionally followed by a comment
//!
//! ## Supported Features
//!
//! - STORED (no compression) method
//! - DEFLATE compression method
//!
//! ## Limitations
//!
//! These are rejected with [`ArchiveError::Unsupported`](crate::ArchiveError::Unsupported):
//!
//! - Encryption
//! - Multi-disk archives
//! - ZIP64 extensions
//! - The UTF-8 filename flag (general purpose bit 11)
//!
//! Entries using any other compression method are skipped and reported.

mod extractor;
mod parser;
pub mod reader;
mod structures;

pub use extractor::{Extraction, decode_base64, extract, extract_bytes};
pub use parser::ZipParser;
pub use structures::*;
