//! Bounds-checked little-endian access to in-memory archive data.
//!
//! The HDA format addresses everything through absolute file offsets, so the
//! reader is a seekable cursor over a borrowed slice. Reads that would leave
//! the slice fail with [`HdaError::TruncatedArchive`] instead of panicking.

use crate::error::{HdaError, Result};

/// A seekable little-endian reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: u64,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current absolute position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Move to an absolute position. Seeking past the end is allowed; the
    /// next read reports the truncation.
    pub fn seek(&mut self, position: u64) {
        self.position = position;
    }

    /// Total length of the underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the underlying data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes left after the current position.
    pub fn remaining(&self) -> usize {
        available_from(self.data, self.position)
    }

    /// Borrow `len` bytes at an absolute offset without moving the cursor.
    pub fn slice_at(&self, offset: u64, len: usize) -> Result<&'a [u8]> {
        slice_at(self.data, offset, len)
    }

    /// Read `len` bytes and advance.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = slice_at(self.data, self.position, len)?;
        self.position += len as u64;
        Ok(bytes)
    }

    /// Read a little-endian u32 and advance.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian u32 at an absolute offset without moving the
    /// cursor.
    pub fn peek_u32_at(&self, offset: u64) -> Result<u32> {
        let bytes = self.slice_at(offset, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Overwrite a little-endian u32 at an absolute offset of a mutable buffer.
pub fn write_u32_at(data: &mut [u8], offset: u64, value: u32) -> Result<()> {
    let available = available_from(data, offset);
    if available < 4 {
        return Err(HdaError::truncated(offset, 4, available));
    }
    let start = offset as usize;
    data[start..start + 4].copy_from_slice(&value.to_le_bytes());
    Ok(())
}

/// Read a little-endian u32 at an absolute offset of a buffer.
pub fn read_u32_at(data: &[u8], offset: u64) -> Result<u32> {
    ByteReader::new(data).peek_u32_at(offset)
}

fn available_from(data: &[u8], offset: u64) -> usize {
    usize::try_from(offset)
        .ok()
        .and_then(|start| data.len().checked_sub(start))
        .unwrap_or(0)
}

fn slice_at(data: &[u8], offset: u64, len: usize) -> Result<&[u8]> {
    let start = usize::try_from(offset)
        .ok()
        .filter(|&start| start <= data.len())
        .ok_or_else(|| HdaError::truncated(offset, len, 0))?;
    let available = data.len() - start;
    if available < len {
        return Err(HdaError::truncated(offset, len, available));
    }
    Ok(&data[start..start + len])
}
