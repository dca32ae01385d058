//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures from a
//! fully decoded in-memory buffer.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the buffer's end
//! 2. Walk the Central Directory to get metadata for all files
//! 3. For extraction, read each file's Local File Header to locate its data
//!
//! Every read goes through [`BinaryReader`], so offsets taken from the archive
//! are never trusted without a bounds check.

use crate::error::{ArchiveError, Result};

use super::reader::BinaryReader;
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

/// Low-level ZIP parser over a byte buffer.
///
/// Typically used through [`extract`](super::extract) rather than directly.
///
/// ## Example
///
/// ```ignore
/// let parser = ZipParser::new(&bytes);
/// for record in parser.central_directory()? {
///     let payload = parser.entry_payload(&record)?;
/// }
/// ```
pub struct ZipParser<'a> {
    data: &'a [u8],
}

impl<'a> ZipParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// The EOCD may be followed by an archive comment of up to 65535 bytes,
    /// so the trailing `22 + 65535` bytes are scanned backwards for the
    /// signature. The first match from the end wins.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in the buffer).
    ///
    /// # Errors
    ///
    /// [`ArchiveError::MissingEndOfCentralDirectory`] when no signature is
    /// present, meaning the buffer is not a ZIP archive.
    pub fn find_eocd(&self) -> Result<(EndOfCentralDirectory, usize)> {
        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE).min(self.data.len());
        let search_start = self.data.len() - search_size;

        if self.data.len() >= EndOfCentralDirectory::SIZE {
            let last = self.data.len() - EndOfCentralDirectory::SIZE;
            for i in (search_start..=last).rev() {
                if &self.data[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                    log::debug!("EOCD found at offset {:#x}", i);
                    let eocd = EndOfCentralDirectory::read_at(self.data, i)?;
                    return Ok((eocd, i));
                }
            }
        }

        Err(ArchiveError::MissingEndOfCentralDirectory {
            searched: search_size,
        })
    }

    /// Walk the Central Directory.
    ///
    /// Exactly `total_entries` records are read, starting at the offset
    /// declared by the EOCD. Directory records are included; filtering them
    /// is left to the caller.
    ///
    /// # Errors
    ///
    /// Fails on a bad record signature, on any unsupported ZIP feature, and on
    /// any record that runs past the end of the buffer.
    pub fn central_directory(&self) -> Result<Vec<CentralDirectoryRecord>> {
        let (eocd, _) = self.find_eocd()?;
        eocd.check_supported()?;

        let mut records = Vec::with_capacity(eocd.total_entries as usize);
        let mut offset = eocd.cd_offset as usize;

        for index in 0..eocd.total_entries as usize {
            let record = self.parse_cdfh(index, offset)?;
            record.check_supported()?;
            offset = record.next_offset;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse the Central Directory File Header starting at `offset`.
    fn parse_cdfh(&self, index: usize, offset: usize) -> Result<CentralDirectoryRecord> {
        let mut reader = BinaryReader::at(self.data, offset)?;

        // Read and verify the signature (PK\x01\x02)
        let sig = reader
            .read_bytes(CDFH_SIGNATURE.len())
            .map_err(|_| ArchiveError::CorruptCentralDirectoryEntry { index, offset })?;
        if sig != CDFH_SIGNATURE {
            return Err(ArchiveError::CorruptCentralDirectoryEntry { index, offset });
        }

        // Fixed-size fields, all at absolute offsets within the record
        let flags = reader.peek_u16_le(offset + 8)?;
        let compression_method = reader.peek_u16_le(offset + 10)?;
        let compressed_size = reader.peek_u32_le(offset + 20)?;
        let uncompressed_size = reader.peek_u32_le(offset + 24)?;
        let file_name_length = reader.peek_u16_le(offset + 28)? as usize;
        let extra_field_length = reader.peek_u16_le(offset + 30)? as usize;
        let file_comment_length = reader.peek_u16_le(offset + 32)? as usize;
        let lfh_offset = reader.peek_u32_le(offset + 42)?;

        // Variable-length file name follows the fixed header
        reader.seek(offset + CDFH_MIN_SIZE)?;
        let file_name_bytes = reader.read_bytes(file_name_length)?;
        // Use lossy conversion to handle non-UTF8 filenames gracefully
        let file_name = String::from_utf8_lossy(file_name_bytes).into_owned();

        // The extra field and comment must also fit in the buffer
        reader.skip(extra_field_length)?;
        reader.skip(file_comment_length)?;

        Ok(CentralDirectoryRecord {
            file_name,
            flags,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            lfh_offset,
            next_offset: reader.position(),
        })
    }

    /// Get the actual data offset for a record.
    ///
    /// The Local File Header (LFH) has variable-length fields (filename,
    /// extra field) that may differ from the Central Directory entry.
    /// This method reads the LFH to calculate where the actual file
    /// data begins.
    pub fn data_offset(&self, record: &CentralDirectoryRecord) -> Result<usize> {
        let lfh_offset = record.lfh_offset as usize;
        let mut reader = BinaryReader::at(self.data, lfh_offset)?;

        // Verify LFH signature (PK\x03\x04)
        let corrupt = || ArchiveError::CorruptLocalFileHeader {
            name: record.file_name.clone(),
            offset: lfh_offset,
        };
        let sig = reader
            .read_bytes(LFH_SIGNATURE.len())
            .map_err(|_| corrupt())?;
        if sig != LFH_SIGNATURE {
            return Err(corrupt());
        }

        // Read the variable field lengths from fixed positions in LFH
        let file_name_length = reader.peek_u16_le(lfh_offset + 26)? as usize;
        let extra_field_length = reader.peek_u16_le(lfh_offset + 28)? as usize;

        // Data starts after: LFH (30 bytes) + filename + extra field
        Ok(lfh_offset + LFH_SIZE + file_name_length + extra_field_length)
    }

    /// Slice exactly `compressed_size` bytes of payload for a record.
    pub fn entry_payload(&self, record: &CentralDirectoryRecord) -> Result<&'a [u8]> {
        let data_offset = self.data_offset(record)?;
        let mut reader = BinaryReader::at(self.data, data_offset)?;
        reader.read_bytes(record.compressed_size as usize)
    }
}
