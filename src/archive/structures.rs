use std::fmt;

use crate::error::{ArchiveError, Result, UnsupportedFeature};

use super::reader::BinaryReader;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unsupported(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unsupported(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unsupported(v) => *v,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompressionMethod::Stored => "Stored",
            CompressionMethod::Deflate => "Deflate",
            CompressionMethod::Unsupported(_) => "Unsupported",
        }
    }
}

/// Listing label; unsupported methods carry their numeric code.
impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMethod::Unsupported(code) => f.pad(&format!("Unsupported({})", code)),
            method => f.pad(method.name()),
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    /// Parse the record starting at `offset`, which must hold the signature.
    pub fn read_at(data: &[u8], offset: usize) -> Result<Self> {
        let mut reader = BinaryReader::at(data, offset)?;
        reader.skip(Self::SIGNATURE.len())?;

        Ok(Self {
            disk_number: reader.read_u16_le()?,
            disk_with_cd: reader.read_u16_le()?,
            disk_entries: reader.read_u16_le()?,
            total_entries: reader.read_u16_le()?,
            cd_size: reader.read_u32_le()?,
            cd_offset: reader.read_u32_le()?,
            comment_len: reader.read_u16_le()?,
        })
    }

    pub fn is_zip64(&self) -> bool {
        self.disk_entries == 0xFFFF
            || self.total_entries == 0xFFFF
            || self.cd_size == 0xFFFFFFFF
            || self.cd_offset == 0xFFFFFFFF
    }

    pub fn is_multi_disk(&self) -> bool {
        self.disk_number != 0 || self.disk_with_cd != 0 || self.disk_entries != self.total_entries
    }

    /// Reject archive layouts the extractor does not handle.
    pub fn check_supported(&self) -> Result<()> {
        if self.is_zip64() {
            return Err(ArchiveError::Unsupported(UnsupportedFeature::Zip64));
        }
        if self.is_multi_disk() {
            return Err(ArchiveError::Unsupported(UnsupportedFeature::MultiDisk));
        }
        Ok(())
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// General purpose flag: entry is encrypted.
pub const FLAG_ENCRYPTED: u16 = 1 << 0;
/// General purpose flag: name and comment are UTF-8 (language encoding flag).
pub const FLAG_UTF8_NAME: u16 = 1 << 11;

/// One parsed central directory record.
#[derive(Debug, Clone)]
pub struct CentralDirectoryRecord {
    pub file_name: String,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub lfh_offset: u32,
    /// Offset of the record that follows this one.
    pub next_offset: usize,
}

impl CentralDirectoryRecord {
    /// Directory entries end with '/'
    pub fn is_directory(&self) -> bool {
        self.file_name.ends_with('/')
    }

    pub fn check_supported(&self) -> Result<()> {
        if self.flags & FLAG_ENCRYPTED != 0 {
            return Err(ArchiveError::Unsupported(UnsupportedFeature::Encryption {
                name: self.file_name.clone(),
            }));
        }
        if self.flags & FLAG_UTF8_NAME != 0 {
            return Err(ArchiveError::Unsupported(
                UnsupportedFeature::UnicodeFileName {
                    name: self.file_name.clone(),
                },
            ));
        }
        if self.compressed_size == 0xFFFFFFFF
            || self.uncompressed_size == 0xFFFFFFFF
            || self.lfh_offset == 0xFFFFFFFF
        {
            return Err(ArchiveError::Unsupported(UnsupportedFeature::Zip64));
        }
        Ok(())
    }
}

/// Payload of an extracted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    /// Stored bytes, or successfully inflated bytes.
    Complete(Vec<u8>),
    /// Inflate failed; these are the still-compressed bytes from the archive.
    PartiallyRecovered { raw_bytes: Vec<u8>, reason: String },
}

impl EntryContent {
    pub fn bytes(&self) -> &[u8] {
        match self {
            EntryContent::Complete(bytes) => bytes,
            EntryContent::PartiallyRecovered { raw_bytes, .. } => raw_bytes,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, EntryContent::Complete(_))
    }
}

/// A file extracted from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub content: EntryContent,
    pub declared_uncompressed_size: u32,
    pub declared_compressed_size: u32,
    pub compression_method: CompressionMethod,
}

impl ArchiveEntry {
    pub fn bytes(&self) -> &[u8] {
        self.content.bytes()
    }

    /// Whether the content length disagrees with the declared uncompressed size.
    pub fn has_size_mismatch(&self) -> bool {
        self.bytes().len() != self.declared_uncompressed_size as usize
    }
}
