//! HDA archive writing.
//!
//! Archives are always written in the same layout:
//!
//! ```text
//! 0x00  u32 0x10, 12 zero bytes
//! 0x10  directory, one u32 per entry, padded to 16 bytes
//! ....  per entry: 16-byte header, payload, padding to 16 bytes
//! ```
//!
//! Directory slots are relative to 0x10. Entries are stored, never
//! compressed.

use crate::header::EntryHeader;
use hdarc_core::error::{HdaError, Result};
use std::io::Write;

/// Absolute offset of the directory in written archives.
pub const BASE_OFFSET: u32 = 0x10;

/// Alignment of the directory, every entry and the file end.
pub const ALIGNMENT: u64 = 16;

/// Round `value` up to the next multiple of [`ALIGNMENT`].
pub fn align16(value: u64) -> u64 {
    (value + (ALIGNMENT - 1)) & !(ALIGNMENT - 1)
}

/// Computed placement of every entry in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory slot values, relative to [`BASE_OFFSET`].
    pub slots: Vec<u32>,
    /// Total archive size in bytes.
    pub total_size: u64,
}

impl Layout {
    /// Lay out entries of the given payload sizes.
    pub fn new(sizes: &[usize]) -> Result<Self> {
        let mut slots = Vec::with_capacity(sizes.len());
        let mut offset = align16(sizes.len() as u64 * 4);

        for &size in sizes {
            slots.push(checked_u32(offset)?);
            offset = align16(offset + EntryHeader::SIZE as u64 + size as u64);
        }

        let total_size = BASE_OFFSET as u64 + offset;
        checked_u32(total_size)?;
        Ok(Self { slots, total_size })
    }
}

fn checked_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| HdaError::too_large(value))
}

/// Write a complete archive holding `blobs` in order.
///
/// Returns the number of bytes written.
pub fn write_archive<W: Write, B: AsRef<[u8]>>(writer: &mut W, blobs: &[B]) -> Result<u64> {
    let sizes: Vec<usize> = blobs.iter().map(|blob| blob.as_ref().len()).collect();
    let layout = Layout::new(&sizes)?;

    let mut out = CountingWriter::new(writer);

    out.write_all(&BASE_OFFSET.to_le_bytes())?;
    out.pad_to(BASE_OFFSET as u64)?;
    for slot in &layout.slots {
        out.write_all(&slot.to_le_bytes())?;
    }

    for (blob, &slot) in blobs.iter().zip(&layout.slots) {
        let blob = blob.as_ref();
        out.pad_to(BASE_OFFSET as u64 + slot as u64)?;
        // sizes already fit: the layout rejected anything past u32
        EntryHeader::stored(blob.len() as u32).write(&mut out)?;
        out.write_all(blob)?;
    }

    out.pad_to(layout.total_size)?;
    out.flush()?;
    Ok(out.written)
}

/// Pack blobs into an archive in memory.
pub fn pack<B: AsRef<[u8]>>(blobs: &[B]) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    write_archive(&mut data, blobs)?;
    Ok(data)
}

/// Tracks the write position so padding can be computed.
struct CountingWriter<'w, W: Write> {
    inner: &'w mut W,
    written: u64,
}

impl<'w, W: Write> CountingWriter<'w, W> {
    fn new(inner: &'w mut W) -> Self {
        Self { inner, written: 0 }
    }

    /// Write zeros up to absolute position `target`.
    fn pad_to(&mut self, target: u64) -> std::io::Result<()> {
        const ZEROS: [u8; ALIGNMENT as usize] = [0; ALIGNMENT as usize];
        while self.written < target {
            let len = (target - self.written).min(ZEROS.len() as u64) as usize;
            self.write_all(&ZEROS[..len])?;
        }
        Ok(())
    }
}

impl<W: Write> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// HDA archive writer.
///
/// The directory precedes all payloads and its size depends on the entry
/// count, so entries are collected and the archive is written by
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct HdaWriter<W: Write> {
    writer: W,
    blobs: Vec<Vec<u8>>,
}

impl<W: Write> HdaWriter<W> {
    /// Create a new writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            blobs: Vec::new(),
        }
    }

    /// Queue an entry. Returns its directory index.
    pub fn add_entry(&mut self, data: impl Into<Vec<u8>>) -> usize {
        self.blobs.push(data.into());
        self.blobs.len() - 1
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Check if no entries are queued.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Write the archive and return the inner writer.
    pub fn finish(mut self) -> Result<W> {
        write_archive(&mut self.writer, &self.blobs)?;
        Ok(self.writer)
    }
}
