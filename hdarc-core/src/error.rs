//! Error types for hdarc operations.
//!
//! Every failure the codec and the container can detect maps onto one of a
//! small number of data-integrity conditions. None of them are transient, so
//! callers should propagate rather than retry.

use std::io;
use thiserror::Error;

/// The main error type for hdarc operations.
#[derive(Debug, Error)]
pub enum HdaError {
    /// I/O error from the underlying file system.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Compressed data is corrupt: a control byte implies reading past the
    /// end of the input, or a back-reference points before the start of the
    /// decoded output.
    #[error("Malformed compressed stream at offset {offset:#x}: {message}")]
    MalformedStream {
        /// Input offset where decoding failed.
        offset: u64,
        /// Description of the problem.
        message: String,
    },

    /// A directory offset, entry header or payload lies outside the archive.
    #[error("Truncated archive at offset {offset:#x}: need {needed} bytes, have {available}")]
    TruncatedArchive {
        /// Absolute file offset of the failed read.
        offset: u64,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes actually available from `offset`.
        available: usize,
    },

    /// A decompressed entry does not have the length its header declares.
    #[error("Length mismatch in entry {index}: header declares {expected} bytes, decoded {actual}")]
    LengthMismatch {
        /// Index of the entry in the directory.
        index: usize,
        /// Declared decompressed length.
        expected: u64,
        /// Number of bytes actually produced.
        actual: u64,
    },

    /// A caller-supplied setting is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The archive being built would not fit the 32-bit offsets of the format.
    #[error("Archive too large: {size} bytes exceeds the 32-bit offset range")]
    ArchiveTooLarge {
        /// Size in bytes the archive would have had.
        size: u64,
    },
}

/// Result type alias for hdarc operations.
pub type Result<T> = std::result::Result<T, HdaError>;

impl HdaError {
    /// Create a malformed stream error.
    pub fn malformed(offset: u64, message: impl Into<String>) -> Self {
        Self::MalformedStream {
            offset,
            message: message.into(),
        }
    }

    /// Create a truncated archive error.
    pub fn truncated(offset: u64, needed: usize, available: usize) -> Self {
        Self::TruncatedArchive {
            offset,
            needed,
            available,
        }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(index: usize, expected: u64, actual: u64) -> Self {
        Self::LengthMismatch {
            index,
            expected,
            actual,
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an archive too large error.
    pub fn too_large(size: u64) -> Self {
        Self::ArchiveTooLarge { size }
    }

    /// Whether the error describes corrupt input data rather than an I/O
    /// failure or a size limit.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedStream { .. } | Self::TruncatedArchive { .. } | Self::LengthMismatch { .. }
        )
    }
}
