//! Shared test utilities for integration tests.
//!
//! [`ZipBuilder`] writes archives byte by byte following the same layout the
//! extractor reads, so tests can produce exactly the structures they need
//! (directories, unknown methods, flags, comments, broken payloads).
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::DeflateEncoder;

/// One entry to be written by [`ZipBuilder`].
#[derive(Debug, Clone)]
pub struct FixtureEntry {
    pub name: String,
    pub method: u16,
    pub flags: u16,
    pub payload: Vec<u8>,
    pub uncompressed_size: u32,
    pub crc32: u32,
    /// Extra field bytes written only in the local file header.
    pub local_extra: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ZipBuilder {
    entries: Vec<FixtureEntry>,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.raw(name, 0, data.to_vec(), data.len() as u32, crc32(data))
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.raw(name, 8, deflate(data), data.len() as u32, crc32(data))
    }

    pub fn directory(self, name: &str) -> Self {
        assert!(name.ends_with('/'));
        self.raw(name, 0, Vec::new(), 0, 0)
    }

    /// Entry with an arbitrary method code and payload.
    pub fn raw(
        mut self,
        name: &str,
        method: u16,
        payload: Vec<u8>,
        uncompressed_size: u32,
        crc32: u32,
    ) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_string(),
            method,
            flags: 0,
            payload,
            uncompressed_size,
            crc32,
            local_extra: Vec::new(),
        });
        self
    }

    /// Set general purpose flags on the most recently added entry.
    pub fn flags(mut self, flags: u16) -> Self {
        self.entries.last_mut().expect("no entry to flag").flags = flags;
        self
    }

    /// Give the most recently added entry a local-only extra field.
    pub fn local_extra(mut self, extra: &[u8]) -> Self {
        self.entries.last_mut().expect("no entry").local_extra = extra.to_vec();
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            offsets.push(out.len() as u32);
            out.extend_from_slice(b"PK\x03\x04");
            put_u16(&mut out, 20); // version needed
            put_u16(&mut out, entry.flags);
            put_u16(&mut out, entry.method);
            put_u16(&mut out, 0); // mod time
            put_u16(&mut out, 0x21); // mod date (1980-01-01)
            put_u32(&mut out, entry.crc32);
            put_u32(&mut out, entry.payload.len() as u32);
            put_u32(&mut out, entry.uncompressed_size);
            put_u16(&mut out, entry.name.len() as u16);
            put_u16(&mut out, entry.local_extra.len() as u16);
            out.extend_from_slice(entry.name.as_bytes());
            out.extend_from_slice(&entry.local_extra);
            out.extend_from_slice(&entry.payload);
        }

        let cd_offset = out.len() as u32;
        for (entry, offset) in self.entries.iter().zip(&offsets) {
            out.extend_from_slice(b"PK\x01\x02");
            put_u16(&mut out, 20); // version made by
            put_u16(&mut out, 20); // version needed
            put_u16(&mut out, entry.flags);
            put_u16(&mut out, entry.method);
            put_u16(&mut out, 0);
            put_u16(&mut out, 0x21);
            put_u32(&mut out, entry.crc32);
            put_u32(&mut out, entry.payload.len() as u32);
            put_u32(&mut out, entry.uncompressed_size);
            put_u16(&mut out, entry.name.len() as u16);
            put_u16(&mut out, 0); // extra length
            put_u16(&mut out, 0); // comment length
            put_u16(&mut out, 0); // disk number start
            put_u16(&mut out, 0); // internal attributes
            let external = if entry.name.ends_with('/') { 0x10 } else { 0 };
            put_u32(&mut out, external);
            put_u32(&mut out, *offset);
            out.extend_from_slice(entry.name.as_bytes());
        }
        let cd_size = out.len() as u32 - cd_offset;

        out.extend_from_slice(b"PK\x05\x06");
        put_u16(&mut out, 0);
        put_u16(&mut out, 0);
        put_u16(&mut out, self.entries.len() as u16);
        put_u16(&mut out, self.entries.len() as u16);
        put_u32(&mut out, cd_size);
        put_u32(&mut out, cd_offset);
        put_u16(&mut out, self.comment.len() as u16);
        out.extend_from_slice(&self.comment);
        out
    }

    pub fn build_base64(&self) -> String {
        STANDARD.encode(self.build())
    }
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(data);
    crc.sum()
}

/// Offset of the EOCD in an archive built without a comment.
pub fn eocd_offset(archive: &[u8]) -> usize {
    archive.len() - 22
}

/// Central directory offset of an archive built without a comment.
pub fn cd_offset(archive: &[u8]) -> usize {
    let eocd = eocd_offset(archive);
    u32::from_le_bytes(archive[eocd + 16..eocd + 20].try_into().unwrap()) as usize
}

pub fn patch_u16(archive: &mut [u8], offset: usize, value: u16) {
    archive[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub fn patch_u32(archive: &mut [u8], offset: usize, value: u32) {
    archive[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}
