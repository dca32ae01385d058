//! Bounds-checked little-endian reader over an in-memory archive.
//!
//! Every fixed-offset access the parser makes goes through [`BinaryReader`],
//! so a lying length or offset field turns into [`ArchiveError::OutOfBounds`]
//! instead of a panic or a silent short read.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{ArchiveError, Result};

/// Cursor over a byte buffer with checked reads.
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Create a reader positioned at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self> {
        let mut reader = Self::new(data);
        reader.seek(offset)?;
        Ok(reader)
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    /// Move the cursor to an absolute offset. Seeking to the very end is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.len() {
            return Err(self.out_of_bounds(offset, 0));
        }
        self.cursor.set_position(offset as u64);
        Ok(())
    }

    /// Advance the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.cursor.set_position((self.position() + n) as u64);
        Ok(())
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.ensure(2)?;
        self.cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| self.out_of_bounds(self.position(), 2))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.ensure(4)?;
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| self.out_of_bounds(self.position(), 4))
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + n) as u64);
        Ok(&data[start..start + n])
    }

    /// Read a u16 at `offset` without moving the cursor.
    pub fn peek_u16_le(&self, offset: usize) -> Result<u16> {
        let mut probe = BinaryReader::at(*self.cursor.get_ref(), offset)?;
        probe.read_u16_le()
    }

    /// Read a u32 at `offset` without moving the cursor.
    pub fn peek_u32_le(&self, offset: usize) -> Result<u32> {
        let mut probe = BinaryReader::at(*self.cursor.get_ref(), offset)?;
        probe.read_u32_le()
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(self.out_of_bounds(self.position(), n));
        }
        Ok(())
    }

    fn out_of_bounds(&self, offset: usize, len: usize) -> ArchiveError {
        ArchiveError::OutOfBounds {
            offset,
            len,
            buffer_len: self.len(),
        }
    }
}
