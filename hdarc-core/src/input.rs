//! Whole-file input for archive and executable processing.
//!
//! Every hdarc operation works on a complete in-memory buffer. With the
//! `mmap` feature the buffer is a read-only memory mapping, which avoids
//! copying multi-megabyte disc archives; without it the file is read into a
//! `Vec<u8>`.
//!
//! # Safety
//!
//! A mapped file must not be modified by another process while it is open.
//! The mapping is read-only and lives only for one command.

use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

#[derive(Debug)]
enum Backing {
    Owned(Vec<u8>),
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
}

/// The complete contents of an input file.
#[derive(Debug)]
pub struct InputFile {
    backing: Backing,
}

impl InputFile {
    /// Open a file and make its contents available as a byte slice.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(file)
    }

    #[cfg(feature = "mmap")]
    fn from_file(file: File) -> Result<Self> {
        // Zero-length mappings are rejected on some platforms.
        if file.metadata()?.len() == 0 {
            return Ok(Self::from_vec(Vec::new()));
        }
        // SAFETY: the mapping is read-only and callers are documented not to
        // modify the file while it is open.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            backing: Backing::Mapped(mmap),
        })
    }

    #[cfg(not(feature = "mmap"))]
    fn from_file(mut file: File) -> Result<Self> {
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Self::from_vec(data))
    }

    /// Wrap an owned buffer.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            backing: Backing::Owned(data),
        }
    }

    /// Read everything from a reader (e.g. stdin).
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_vec(data))
    }

    /// Whether the contents are memory-mapped.
    pub fn is_mapped(&self) -> bool {
        match self.backing {
            Backing::Owned(_) => false,
            #[cfg(feature = "mmap")]
            Backing::Mapped(_) => true,
        }
    }

    /// Get the contents as a slice.
    pub fn as_slice(&self) -> &[u8] {
        match &self.backing {
            Backing::Owned(data) => data.as_slice(),
            #[cfg(feature = "mmap")]
            Backing::Mapped(mmap) => &mmap[..],
        }
    }
}

impl Deref for InputFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for InputFile {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
