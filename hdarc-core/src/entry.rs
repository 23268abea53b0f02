//! Archive entry metadata.
//!
//! HDA entries carry no names, timestamps or attributes: an entry is known
//! only by its position in the directory. Extracted entries are named after
//! that position (`File_00000.bin`, `File_00001.bin`, ...).

/// Storage method of an entry, as recorded in the first header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMethod {
    /// Payload is stored verbatim.
    #[default]
    Stored,
    /// Payload is an LZ compressed stream.
    Compressed,
}

impl EntryMethod {
    /// Interpret a header flag word. Only the value 1 marks compression;
    /// every other value is read as stored.
    pub fn from_flag(flag: u32) -> Self {
        if flag == 1 {
            Self::Compressed
        } else {
            Self::Stored
        }
    }

    /// The flag word written for this method.
    pub fn flag(&self) -> u32 {
        match self {
            Self::Stored => 0,
            Self::Compressed => 1,
        }
    }

    /// Get the method name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stored => "Stored",
            Self::Compressed => "LZ",
        }
    }
}

impl std::fmt::Display for EntryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An entry in an HDA archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Position of the entry in the directory.
    pub index: usize,
    /// Output name derived from the index.
    pub name: String,
    /// Absolute offset of the 16-byte entry header.
    pub offset: u64,
    /// Storage method.
    pub method: EntryMethod,
    /// Declared decompressed size in bytes.
    pub size: u64,
    /// Payload size in bytes.
    pub compressed_size: u64,
    /// Fourth header word, zero in every known archive.
    pub reserved: u32,
}

impl Entry {
    /// Size of the fixed header preceding each payload.
    pub const HEADER_SIZE: u64 = 16;

    /// Create a stored entry.
    pub fn stored(index: usize, offset: u64, size: u64) -> Self {
        Self {
            index,
            name: Self::file_name(index),
            offset,
            method: EntryMethod::Stored,
            size,
            compressed_size: size,
            reserved: 0,
        }
    }

    /// Output file name for the entry at `index`.
    pub fn file_name(index: usize) -> String {
        format!("File_{:05}.bin", index)
    }

    /// Absolute offset of the first payload byte.
    pub fn data_offset(&self) -> u64 {
        self.offset + Self::HEADER_SIZE
    }

    /// Check if the payload has to go through the decompressor.
    pub fn is_compressed(&self) -> bool {
        self.method == EntryMethod::Compressed
    }

    /// Get the compression ratio (compressed/uncompressed).
    pub fn compression_ratio(&self) -> f64 {
        if self.size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.size as f64
        }
    }

    /// Get the space savings as a percentage.
    pub fn space_savings(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            (1.0 - self.compression_ratio()) * 100.0
        }
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:#010x} {:>6} {:>10} {:>10} {:>6.1}% {}",
            self.offset,
            self.method.name(),
            self.size,
            self.compressed_size,
            self.space_savings(),
            self.name
        )
    }
}
