//! HDA archive reading.
//!
//! An archive starts with the absolute offset of its directory (`base`).
//! The directory is a run of u32 offsets relative to `base`, each pointing
//! at an entry header. There is no entry count: the directory is taken to
//! end where the first entry begins, or earlier at a zero slot.

use crate::header::EntryHeader;
use hdarc_codec::decompress_with_limit;
use hdarc_core::Entry;
use hdarc_core::cursor::ByteReader;
use hdarc_core::error::{HdaError, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// HDA archive reader over an in-memory archive.
#[derive(Debug, Clone)]
pub struct HdaReader<'a> {
    data: &'a [u8],
    base_offset: u64,
    directory_end: u64,
    entries: Vec<Entry>,
}

impl<'a> HdaReader<'a> {
    /// Parse the directory and all entry headers.
    ///
    /// Every entry's payload is bounds-checked here, so extraction can only
    /// fail on the payload contents.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);
        let base_offset = reader.read_u32()? as u64;

        reader.seek(base_offset);
        let mut offset = reader.read_u32()? as u64;
        let first_entry = base_offset + offset;

        let mut entries = Vec::new();
        while reader.position() < first_entry + 4 {
            let header_offset = base_offset + offset;
            let entry = read_entry(data, entries.len(), header_offset)?;
            entries.push(entry);

            offset = reader.read_u32()? as u64;
            if offset == 0 && reader.position() - 4 > base_offset {
                break;
            }
        }

        Ok(Self {
            data,
            base_offset,
            directory_end: reader.position(),
            entries,
        })
    }

    /// Get entries in directory order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Get an entry by directory index.
    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute offset of the directory.
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Position just past the last directory slot read.
    pub fn directory_end(&self) -> u64 {
        self.directory_end
    }

    /// Borrow an entry's payload as stored.
    pub fn payload(&self, entry: &Entry) -> Result<&'a [u8]> {
        ByteReader::new(self.data).slice_at(entry.data_offset(), payload_len(entry)?)
    }

    /// Extract an entry, decompressing it if needed.
    ///
    /// A compressed entry must decode to exactly its declared size.
    pub fn extract(&self, entry: &Entry) -> Result<Vec<u8>> {
        let data = self.extract_unchecked(entry)?;
        if entry.is_compressed() && data.len() as u64 != entry.size {
            return Err(HdaError::length_mismatch(
                entry.index,
                entry.size,
                data.len() as u64,
            ));
        }
        Ok(data)
    }

    /// Extract an entry without checking the decoded size.
    pub fn extract_unchecked(&self, entry: &Entry) -> Result<Vec<u8>> {
        let payload = self.payload(entry)?;
        if entry.is_compressed() {
            let capacity = usize::try_from(entry.size).unwrap_or(payload.len());
            decompress_with_limit(payload, capacity)
        } else {
            Ok(payload.to_vec())
        }
    }

    /// Extract every entry in directory order.
    pub fn extract_all(&self) -> Result<Vec<Vec<u8>>> {
        self.entries.iter().map(|entry| self.extract(entry)).collect()
    }

    /// Extract every entry, decoding entries in parallel (requires the
    /// `parallel` feature). Output order matches [`extract_all`](Self::extract_all).
    #[cfg(feature = "parallel")]
    pub fn extract_all_parallel(&self) -> Result<Vec<Vec<u8>>> {
        self.entries
            .par_iter()
            .map(|entry| self.extract(entry))
            .collect()
    }
}

/// Read the header at `offset` and check that its payload is in range.
fn read_entry(data: &[u8], index: usize, offset: u64) -> Result<Entry> {
    let mut reader = ByteReader::new(data);
    reader.seek(offset);
    let header = EntryHeader::read(&mut reader)?;
    let entry = header.to_entry(index, offset);
    reader.slice_at(entry.data_offset(), payload_len(&entry)?)?;
    Ok(entry)
}

fn payload_len(entry: &Entry) -> Result<usize> {
    usize::try_from(entry.compressed_size)
        .map_err(|_| HdaError::truncated(entry.data_offset(), usize::MAX, 0))
}

/// Unpack an archive into `(name, data)` pairs in directory order.
pub fn unpack(data: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let reader = HdaReader::new(data)?;
    reader
        .entries()
        .iter()
        .map(|entry| Ok((entry.name.clone(), reader.extract(entry)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdarc_core::EntryMethod;

    /// Assemble an archive from a base offset, raw directory slots and
    /// `(header offset, header, payload)` triples.
    fn build(base: u32, slots: &[u32], entries: &[(u32, EntryHeader, &[u8])]) -> Vec<u8> {
        let mut data = vec![0u8; base as usize];
        data[0..4].copy_from_slice(&base.to_le_bytes());
        for slot in slots {
            data.extend_from_slice(&slot.to_le_bytes());
        }
        for (offset, header, payload) in entries {
            let start = (base + offset) as usize;
            let end = start + EntryHeader::SIZE + payload.len();
            if data.len() < end {
                data.resize(end, 0);
            }
            data[start..start + EntryHeader::SIZE].copy_from_slice(&header.to_bytes());
            data[start + EntryHeader::SIZE..end].copy_from_slice(payload);
        }
        data
    }

    #[test]
    fn test_read_stored_entries() {
        let data = build(
            0x10,
            &[0x10, 0x30, 0, 0],
            &[
                (0x10, EntryHeader::stored(3), &b"abc"[..]),
                (0x30, EntryHeader::stored(5), &b"hello"[..]),
            ],
        );
        let reader = HdaReader::new(&data).unwrap();

        assert_eq!(reader.len(), 2);
        assert_eq!(reader.base_offset(), 0x10);
        assert_eq!(reader.entries()[1].offset, 0x40);
        assert_eq!(
            reader.extract_all().unwrap(),
            vec![b"abc".to_vec(), b"hello".to_vec()]
        );
    }

    #[test]
    fn test_directory_stops_at_first_entry() {
        // two slots, no padding; the second read lands on the flag word of
        // entry 0, which is nonzero
        let compressed = [0x01, b'a', b'b', b'c', b'd'];
        let header = EntryHeader {
            flag: 1,
            decompressed_len: 4,
            compressed_len: compressed.len() as u32,
            reserved: 0,
        };
        let data = build(
            0x10,
            &[0x08, 0x20],
            &[
                (0x08, header, &compressed[..]),
                (0x20, EntryHeader::stored(2), &b"xy"[..]),
            ],
        );
        let reader = HdaReader::new(&data).unwrap();

        assert_eq!(reader.len(), 2);
        assert_eq!(reader.directory_end(), 0x10 + 0x08 + 4);
        assert_eq!(reader.extract(&reader.entries()[0]).unwrap(), b"abcd");
        assert_eq!(reader.extract(&reader.entries()[1]).unwrap(), b"xy");
    }

    #[test]
    fn test_zero_first_offset_is_empty() {
        let data = build(0x10, &[0], &[]);
        let reader = HdaReader::new(&data).unwrap();
        assert!(reader.is_empty());
        assert_eq!(reader.directory_end(), 0x14);
    }

    #[test]
    fn test_length_mismatch() {
        let compressed = [0x01, b'a', b'b', b'c', b'd'];
        let header = EntryHeader {
            flag: 1,
            decompressed_len: 10,
            compressed_len: compressed.len() as u32,
            reserved: 0,
        };
        let data = build(0x10, &[0x10, 0, 0, 0], &[(0x10, header, &compressed[..])]);
        let reader = HdaReader::new(&data).unwrap();
        let entry = &reader.entries()[0];

        assert!(matches!(
            reader.extract(entry),
            Err(HdaError::LengthMismatch {
                index: 0,
                expected: 10,
                actual: 4
            })
        ));
        assert_eq!(reader.extract_unchecked(entry).unwrap(), b"abcd");
    }

    #[test]
    fn test_huge_declared_length() {
        let compressed = [0x01, b'a', b'b', b'c', b'd'];
        let header = EntryHeader {
            flag: 1,
            decompressed_len: u32::MAX,
            compressed_len: compressed.len() as u32,
            reserved: 0,
        };
        let data = build(0x10, &[0x10, 0, 0, 0], &[(0x10, header, &compressed[..])]);
        assert!(data.len() < 0x40);
        let reader = HdaReader::new(&data).unwrap();

        assert!(matches!(
            reader.extract(&reader.entries()[0]),
            Err(HdaError::LengthMismatch {
                expected: 0xFFFF_FFFF,
                actual: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_stored_size_not_checked() {
        let header = EntryHeader {
            decompressed_len: 99,
            ..EntryHeader::stored(3)
        };
        let data = build(0x10, &[0x10, 0, 0, 0], &[(0x10, header, &b"abc"[..])]);
        let reader = HdaReader::new(&data).unwrap();
        assert_eq!(reader.entries()[0].method, EntryMethod::Stored);
        assert_eq!(reader.extract(&reader.entries()[0]).unwrap(), b"abc");
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = build(
            0x10,
            &[0x10, 0, 0, 0],
            &[(0x10, EntryHeader::stored(8), &b"12345678"[..])],
        );
        data.truncate(data.len() - 3);
        assert!(matches!(
            HdaReader::new(&data),
            Err(HdaError::TruncatedArchive {
                offset: 0x30,
                needed: 8,
                available: 5
            })
        ));
    }

    #[test]
    fn test_base_offset_out_of_range() {
        let data = [0xFF, 0xFF, 0x00, 0x00, 0, 0, 0, 0];
        assert!(matches!(
            HdaReader::new(&data),
            Err(HdaError::TruncatedArchive { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(HdaReader::new(&[]).is_err());
    }

    #[test]
    fn test_unpack_names() {
        let data = build(
            0x10,
            &[0x10, 0x30, 0, 0],
            &[
                (0x10, EntryHeader::stored(1), &b"a"[..]),
                (0x30, EntryHeader::stored(1), &b"b"[..]),
            ],
        );
        let blobs = unpack(&data).unwrap();
        assert_eq!(blobs[0].0, "File_00000.bin");
        assert_eq!(blobs[1], ("File_00001.bin".to_string(), b"b".to_vec()));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_extract_all_parallel_matches_serial() {
        let data = build(
            0x10,
            &[0x10, 0x30, 0x50, 0],
            &[
                (0x10, EntryHeader::stored(2), &b"p0"[..]),
                (0x30, EntryHeader::stored(2), &b"p1"[..]),
                (0x50, EntryHeader::stored(2), &b"p2"[..]),
            ],
        );
        let reader = HdaReader::new(&data).unwrap();
        assert_eq!(
            reader.extract_all_parallel().unwrap(),
            reader.extract_all().unwrap()
        );
    }
}
