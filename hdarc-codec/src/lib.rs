//! # hdarc Codec
//!
//! Decoder for the LZ compression found inside HDA resource archives.
//!
//! The format is a byte-oriented LZ77 variant: every instruction starts with
//! a control byte whose range selects a literal run or one of three
//! back-reference encodings (see [`instruction`]). The back-reference
//! history is the entire output, and streams end either on an in-band
//! end-of-stream marker or when the input is used up.
//!
//! Only decompression is provided. Archives written by hdarc store their
//! entries uncompressed.
//!
//! ## Example
//!
//! ```rust
//! use hdarc_codec::decompress;
//!
//! // literal "abcd", then copy 4 bytes from distance 4, then end marker
//! let stream = [0x01, b'a', b'b', b'c', b'd', 0x6C, 0x00, 0x11, 0x00, 0x00];
//! let data = decompress(&stream).unwrap();
//! assert_eq!(data, b"abcdabcd");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod instruction;

// Re-exports
pub use decode::{Decoder, Termination, decompress, decompress_with_limit, max_decoded_len};
pub use instruction::{Instruction, InstructionReader};
