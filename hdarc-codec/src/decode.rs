//! HDA stream decompression.
//!
//! The decoder has no window limit: every back-reference is resolved
//! against the complete output produced so far.

use crate::instruction::{Instruction, InstructionReader};
use hdarc_core::error::{HdaError, Result};

/// How a finished stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The end-of-stream marker was reached.
    Marker,
    /// The input ran out exactly on an instruction boundary.
    Exhausted,
}

/// HDA stream decompressor.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Instruction source.
    reader: InstructionReader<'a>,
    /// Decoded output, also the back-reference history.
    output: Vec<u8>,
    /// Set once decoding has stopped.
    termination: Option<Termination>,
}

impl<'a> Decoder<'a> {
    /// Create a decoder over a compressed stream.
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_capacity(input, input.len().saturating_mul(2))
    }

    /// Create a decoder with an output capacity hint.
    ///
    /// The hint is clamped to [`max_decoded_len`] of the input, so an
    /// untrusted size never reserves more than the stream can produce.
    pub fn with_capacity(input: &'a [u8], capacity: usize) -> Self {
        Self {
            reader: InstructionReader::new(input),
            output: Vec::with_capacity(capacity.min(max_decoded_len(input.len()))),
            termination: None,
        }
    }

    /// Decode the whole stream.
    pub fn run(&mut self) -> Result<Termination> {
        if let Some(termination) = self.termination {
            return Ok(termination);
        }

        loop {
            match self.reader.next_instruction()? {
                Some(Instruction::Literal(bytes)) => self.output.extend_from_slice(bytes),
                Some(Instruction::Copy {
                    distance,
                    length,
                    tail,
                }) => {
                    self.copy_match(distance, length)?;
                    self.output.extend_from_slice(tail);
                }
                Some(Instruction::End) => {
                    self.termination = Some(Termination::Marker);
                    return Ok(Termination::Marker);
                }
                None => {
                    self.termination = Some(Termination::Exhausted);
                    return Ok(Termination::Exhausted);
                }
            }
        }
    }

    /// Copy `length` bytes starting `distance` bytes back.
    ///
    /// The copy runs byte by byte so that `distance < length` repeats the
    /// most recent bytes.
    fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        if distance == 0 || distance > self.output.len() {
            return Err(HdaError::malformed(
                self.reader.position() as u64,
                format!(
                    "back-reference distance {} exceeds output length {}",
                    distance,
                    self.output.len()
                ),
            ));
        }

        self.output.reserve(length);
        let mut src = self.output.len() - distance;
        for _ in 0..length {
            let byte = self.output[src];
            self.output.push(byte);
            src += 1;
        }

        Ok(())
    }

    /// Number of input bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.reader.position()
    }

    /// How decoding stopped, if it has.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Check if decoding is finished.
    pub fn is_done(&self) -> bool {
        self.termination.is_some()
    }

    /// Get the decoded output.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Take the decoded output.
    pub fn into_output(self) -> Vec<u8> {
        self.output
    }
}

/// Upper bound on the output of a stream of `input_len` bytes.
///
/// Every escaped length byte adds at most 0xFF to a copy; no other
/// instruction yields more output than that per input byte.
pub fn max_decoded_len(input_len: usize) -> usize {
    input_len.saturating_mul(0xFF).saturating_add(0x112)
}

/// Decompress a complete HDA stream.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = Decoder::new(input);
    decoder.run()?;
    Ok(decoder.into_output())
}

/// Decompress a stream whose decoded size is known in advance.
///
/// `expected_len` only sizes the output buffer; checking the produced length
/// is left to the caller.
pub fn decompress_with_limit(input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut decoder = Decoder::with_capacity(input, expected_len);
    decoder.run()?;
    Ok(decoder.into_output())
}
