//! The 16-byte header in front of every archive entry.

use hdarc_core::cursor::ByteReader;
use hdarc_core::error::Result;
use hdarc_core::{Entry, EntryMethod};
use std::io::Write;

/// Entry header.
///
/// Layout (little-endian u32 words):
///
/// ```text
/// +0  flag              1 = compressed, anything else = stored
/// +4  decompressed_len
/// +8  compressed_len    payload bytes following the header
/// +12 reserved          always 0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    /// Compression flag.
    pub flag: u32,
    /// Size of the entry once decoded.
    pub decompressed_len: u32,
    /// Size of the payload as stored.
    pub compressed_len: u32,
    /// Unused word.
    pub reserved: u32,
}

impl EntryHeader {
    /// Encoded size in bytes.
    pub const SIZE: usize = 16;

    /// Header for an uncompressed payload of `len` bytes.
    pub fn stored(len: u32) -> Self {
        Self {
            flag: EntryMethod::Stored.flag(),
            decompressed_len: len,
            compressed_len: len,
            reserved: 0,
        }
    }

    /// Read a header at the reader's current position.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            flag: reader.read_u32()?,
            decompressed_len: reader.read_u32()?,
            compressed_len: reader.read_u32()?,
            reserved: reader.read_u32()?,
        })
    }

    /// Serialize to the on-disk layout.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.flag.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.decompressed_len.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.compressed_len.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.reserved.to_le_bytes());
        bytes
    }

    /// Write the header.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Storage method selected by the flag word.
    pub fn method(&self) -> EntryMethod {
        EntryMethod::from_flag(self.flag)
    }

    /// Convert to an [`Entry`] for the header found at absolute `offset`.
    pub fn to_entry(&self, index: usize, offset: u64) -> Entry {
        Entry {
            index,
            name: Entry::file_name(index),
            offset,
            method: self.method(),
            size: self.decompressed_len as u64,
            compressed_size: self.compressed_len as u64,
            reserved: self.reserved,
        }
    }
}
