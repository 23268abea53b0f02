//! # hdarc Archive
//!
//! Reading and writing of HDA resource archives, plus patching of the
//! sector table that the game executable uses to find them on disc.
//!
//! - [`reader`]: directory walk and entry extraction
//! - [`writer`]: archive creation (entries are stored uncompressed)
//! - [`header`]: the 16-byte entry header
//! - [`lba`]: executable sector table patching after a resize
//!
//! ## Example
//!
//! ```rust
//! use hdarc_archive::{HdaReader, pack};
//!
//! let archive = pack(&[&b"first"[..], &b"second"[..]]).unwrap();
//! let reader = HdaReader::new(&archive).unwrap();
//!
//! assert_eq!(reader.len(), 2);
//! assert_eq!(reader.entries()[1].name, "File_00001.bin");
//! assert_eq!(reader.extract(&reader.entries()[1]).unwrap(), b"second");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod header;
pub mod lba;
pub mod reader;
pub mod writer;

// Re-exports
pub use header::EntryHeader;
pub use lba::{LbaPatchReport, LbaTableConfig, patch_lba_table};
pub use reader::{HdaReader, unpack};
pub use writer::{HdaWriter, Layout, pack, write_archive};
