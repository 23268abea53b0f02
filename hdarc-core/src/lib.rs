//! # hdarc Core
//!
//! Core components shared by the hdarc crates:
//!
//! - [`error`]: the error taxonomy ([`HdaError`]) used by codec and container
//! - [`entry`]: archive entry metadata
//! - [`cursor`]: bounds-checked little-endian reads over in-memory data
//! - [`input`]: whole-file input, memory-mapped with the `mmap` feature
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ hdarc-cli      unpack / pack / list / ...    │
//! ├─────────────────────────────────────────────┤
//! │ hdarc-archive  HDA directory + entries, LBA  │
//! ├─────────────────────────────────────────────┤
//! │ hdarc-codec    LZ decompressor               │
//! ├─────────────────────────────────────────────┤
//! │ hdarc-core     errors, entries, byte cursor  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hdarc_core::cursor::ByteReader;
//!
//! let data = [0x10, 0x00, 0x00, 0x00];
//! let mut reader = ByteReader::new(&data);
//! assert_eq!(reader.read_u32().unwrap(), 0x10);
//! assert!(reader.read_u32().is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cursor;
pub mod entry;
pub mod error;
pub mod input;

// Re-exports for convenience
pub use cursor::ByteReader;
pub use entry::{Entry, EntryMethod};
pub use error::{HdaError, Result};
pub use input::InputFile;
