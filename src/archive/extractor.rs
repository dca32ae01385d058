use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::DeflateDecoder;

use crate::error::{ArchiveError, EntryIssue, Result};

use super::parser::ZipParser;
use super::structures::{
    ArchiveEntry, CentralDirectoryRecord, CompressionMethod, EntryContent,
};

/// Result of a successful extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted files in central directory order.
    pub entries: Vec<ArchiveEntry>,
    /// Problems that were recovered from while extracting.
    pub issues: Vec<EntryIssue>,
}

/// Extract every file from a base64-encoded ZIP archive.
///
/// Whitespace inside the base64 text (line wrapping, trailing newline) is
/// ignored.
pub fn extract(base64: &str) -> Result<Extraction> {
    let bytes = decode_base64(base64)?;
    extract_bytes(&bytes)
}

/// Extract every file from a raw ZIP archive held in memory.
pub fn extract_bytes(data: &[u8]) -> Result<Extraction> {
    let parser = ZipParser::new(data);
    let records = parser.central_directory()?;
    log::debug!("central directory lists {} records", records.len());

    let mut extraction = Extraction::default();
    for record in &records {
        if record.is_directory() {
            continue;
        }

        // Payload bounds are structural: a record pointing outside the
        // buffer means the directory cannot be trusted.
        let payload = parser.entry_payload(record)?;

        match decode_entry(record, payload) {
            Ok(entry) => {
                if let EntryContent::PartiallyRecovered { reason, .. } = &entry.content {
                    report(
                        &mut extraction.issues,
                        EntryIssue::DecompressionFailure {
                            name: entry.name.clone(),
                            reason: reason.clone(),
                        },
                    );
                }
                if entry.has_size_mismatch() {
                    report(
                        &mut extraction.issues,
                        EntryIssue::SizeMismatch {
                            name: entry.name.clone(),
                            declared: entry.declared_uncompressed_size,
                            actual: entry.bytes().len(),
                        },
                    );
                }
                extraction.entries.push(entry);
            }
            Err(issue) => report(&mut extraction.issues, issue),
        }
    }

    Ok(extraction)
}

/// Decode a standard base64 envelope into raw archive bytes.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ArchiveError::InvalidEncoding(e.to_string()))
}

/// Turn a record's payload into an entry.
///
/// An `Err` means the entry is dropped; a failed inflate still produces an
/// entry, with its issue reported separately by [`extract_bytes`].
fn decode_entry(
    record: &CentralDirectoryRecord,
    payload: &[u8],
) -> std::result::Result<ArchiveEntry, EntryIssue> {
    let content = match record.compression_method {
        CompressionMethod::Stored => EntryContent::Complete(payload.to_vec()),
        CompressionMethod::Deflate => match inflate(payload, record.uncompressed_size) {
            Ok(bytes) => EntryContent::Complete(bytes),
            Err(e) => EntryContent::PartiallyRecovered {
                raw_bytes: payload.to_vec(),
                reason: e.to_string(),
            },
        },
        method @ CompressionMethod::Unsupported(_) => {
            return Err(EntryIssue::UnsupportedCompressionMethod {
                name: record.file_name.clone(),
                method,
            });
        }
    };

    Ok(ArchiveEntry {
        name: record.file_name.clone(),
        content,
        declared_uncompressed_size: record.uncompressed_size,
        declared_compressed_size: record.compressed_size,
        compression_method: record.compression_method,
    })
}

/// Raw (headerless) DEFLATE decompression.
fn inflate(payload: &[u8], size_hint: u32) -> std::io::Result<Vec<u8>> {
    // The declared size is untrusted; cap the preallocation.
    let mut out = Vec::with_capacity((size_hint as usize).min(16 * 1024 * 1024));
    DeflateDecoder::new(payload).read_to_end(&mut out)?;
    Ok(out)
}

fn report(issues: &mut Vec<EntryIssue>, issue: EntryIssue) {
    log::warn!("{}", issue);
    issues.push(issue);
}
