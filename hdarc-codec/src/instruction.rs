//! Instruction parsing for the HDA compressed stream.
//!
//! Stream format:
//! - A sequence of instructions, each starting with a control byte
//! - 0x00-0x0F: literal run of `control + 3` bytes; control 0 reads one
//!   extra byte `e` and copies `e + 0x12` bytes instead
//! - 0x10-0x1F: long back-reference, distance `0x4001..=0xBFFF`; a zero
//!   distance field marks the end of the stream
//! - 0x20-0x3F: mid back-reference, distance `1..=0x4000`
//! - 0x40-0xFF: short back-reference, distance `1..=0x800`, length 1-8
//! - Every back-reference carries a 0-3 byte literal tail
//! - A zero length field (0x10 and 0x20 forms) switches to a length escape:
//!   each zero byte adds 255, the first nonzero byte ends the escape

use hdarc_core::error::{HdaError, Result};

/// Extra length added to the escape byte of a zero-length literal run.
const LITERAL_ESCAPE_BIAS: usize = 0x12;

/// Terminator bias of the length escape in the long (0x10-0x1F) form.
const LONG_ESCAPE_BIAS: usize = 7;

/// Terminator bias of the length escape in the mid (0x20-0x3F) form.
const MID_ESCAPE_BIAS: usize = 0x1F;

/// Bias applied to every long back-reference distance.
const LONG_DISTANCE_BIAS: usize = 0x4000;

/// One decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<'a> {
    /// Bytes copied verbatim from the input.
    Literal(&'a [u8]),
    /// Copy of earlier output followed by a short literal tail.
    Copy {
        /// Distance back from the current write position.
        distance: usize,
        /// Number of bytes to copy.
        length: usize,
        /// Literal bytes appended after the copy.
        tail: &'a [u8],
    },
    /// End-of-stream marker.
    End,
}

/// Splits a compressed stream into [`Instruction`]s.
#[derive(Debug, Clone)]
pub struct InstructionReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> InstructionReader<'a> {
    /// Create a reader at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Number of input bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if all input has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Parse the next instruction, or `None` once the input is exhausted.
    pub fn next_instruction(&mut self) -> Result<Option<Instruction<'a>>> {
        if self.is_exhausted() {
            return Ok(None);
        }

        let control = self.read_byte()?;
        let instruction = match control {
            0x00..=0x0F => {
                let length = if control == 0 {
                    self.read_byte()? as usize + LITERAL_ESCAPE_BIAS
                } else {
                    control as usize + 3
                };
                Instruction::Literal(self.read_slice(length)?)
            }
            0x10..=0x1F => {
                let high = ((control & 0x08) as usize) << 11;
                let length = self.read_length((control & 0x07) as usize + 2, LONG_ESCAPE_BIAS)?;
                let (field, tail_len) = self.read_distance_field()?;
                let raw = field | high;
                if raw == 0 {
                    return Ok(Some(Instruction::End));
                }
                Instruction::Copy {
                    distance: raw + LONG_DISTANCE_BIAS,
                    length,
                    tail: self.read_slice(tail_len)?,
                }
            }
            0x20..=0x3F => {
                let length = self.read_length((control & 0x1F) as usize + 2, MID_ESCAPE_BIAS)?;
                let (field, tail_len) = self.read_distance_field()?;
                Instruction::Copy {
                    distance: field + 1,
                    length,
                    tail: self.read_slice(tail_len)?,
                }
            }
            0x40..=0xFF => {
                let length = (control >> 5) as usize + 1;
                let low = ((control >> 2) & 0x07) as usize;
                let high = self.read_byte()? as usize;
                Instruction::Copy {
                    distance: (low | (high << 3)) + 1,
                    length,
                    tail: self.read_slice((control & 0x03) as usize)?,
                }
            }
        };

        Ok(Some(instruction))
    }

    /// Resolve a length field, reading an escape when the field is at its
    /// minimum of 2.
    fn read_length(&mut self, field: usize, bias: usize) -> Result<usize> {
        if field != 2 {
            return Ok(field);
        }

        let mut length = field;
        loop {
            let byte = self.read_byte()?;
            if byte != 0 {
                return Ok(length + byte as usize + bias);
            }
            length += 0xFF;
        }
    }

    /// Read the two-byte distance field shared by the long and mid forms.
    ///
    /// Returns the 14-bit distance value and the tail length packed into the
    /// low two bits of the first byte.
    fn read_distance_field(&mut self) -> Result<(usize, usize)> {
        let b0 = self.read_byte()? as usize;
        let b1 = self.read_byte()? as usize;
        Ok(((b0 >> 2) | (b1 << 6), b0 & 0x03))
    }

    fn read_byte(&mut self) -> Result<u8> {
        match self.input.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(HdaError::malformed(
                self.pos as u64,
                "unexpected end of input",
            )),
        }
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.input.len() - self.pos;
        if len > available {
            return Err(HdaError::malformed(
                self.pos as u64,
                format!("{} literal bytes needed, {} remain", len, available),
            ));
        }
        let slice = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(input: &[u8]) -> Instruction<'_> {
        let mut reader = InstructionReader::new(input);
        let instruction = reader.next_instruction().unwrap().unwrap();
        assert!(reader.is_exhausted(), "instruction left unread input");
        instruction
    }

    #[test]
    fn test_short_literal() {
        assert_eq!(single(b"\x02ABCDE"), Instruction::Literal(b"ABCDE"));
    }

    #[test]
    fn test_escaped_literal() {
        let mut input = vec![0x00, 0x00];
        input.extend_from_slice(&[0x55; 0x12]);
        assert_eq!(single(&input), Instruction::Literal(&[0x55; 0x12]));
    }

    #[test]
    fn test_short_copy_fields() {
        // length 3 + 1, low distance bits 5, tail 2
        let control = (3 << 5) | (5 << 2) | 2;
        let input = [control, 0x01, b'x', b'y'];
        assert_eq!(
            single(&input),
            Instruction::Copy {
                distance: (5 | (1 << 3)) + 1,
                length: 4,
                tail: b"xy",
            }
        );
    }

    #[test]
    fn test_mid_copy_fields() {
        // length field 3 + 2, distance field 0x123, tail 1
        let b0 = ((0x123 & 0x3F) << 2) as u8 | 1;
        let b1 = (0x123 >> 6) as u8;
        let input = [0x23, b0, b1, b'!'];
        assert_eq!(
            single(&input),
            Instruction::Copy {
                distance: 0x124,
                length: 5,
                tail: b"!",
            }
        );
    }

    #[test]
    fn test_mid_copy_length_escape() {
        // two zero bytes then 0x05: 2 + 255 * 2 + 5 + 0x1F
        let input = [0x20, 0x00, 0x00, 0x05, 0x04, 0x00];
        assert_eq!(
            single(&input),
            Instruction::Copy {
                distance: 2,
                length: 2 + 510 + 5 + 0x1F,
                tail: b"",
            }
        );
    }

    #[test]
    fn test_long_copy_high_bit() {
        // bit 3 of the control byte supplies distance bit 14
        let input = [0x19, 0x04, 0x00];
        assert_eq!(
            single(&input),
            Instruction::Copy {
                distance: (1 | 0x4000) + 0x4000,
                length: 3,
                tail: b"",
            }
        );
    }

    #[test]
    fn test_long_copy_length_escape() {
        let input = [0x10, 0x01, 0x04, 0x00];
        assert_eq!(
            single(&input),
            Instruction::Copy {
                distance: 0x4001,
                length: 2 + 1 + 7,
                tail: b"",
            }
        );
    }

    #[test]
    fn test_end_marker() {
        let mut reader = InstructionReader::new(&[0x11, 0x00, 0x00, 0xFF, 0xFF]);
        assert_eq!(reader.next_instruction().unwrap(), Some(Instruction::End));
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_end_marker_tail_bits_ignored() {
        // tail bits live in the low two bits of b0 and are not part of the
        // distance, so this is still the end marker
        assert_eq!(single(&[0x11, 0x03, 0x00]), Instruction::End);
    }

    #[test]
    fn test_exhausted_input() {
        let mut reader = InstructionReader::new(&[]);
        assert_eq!(reader.next_instruction().unwrap(), None);
    }

    #[test]
    fn test_truncated_literal() {
        let mut reader = InstructionReader::new(&[0x05, 1, 2, 3]);
        let err = reader.next_instruction().unwrap_err();
        assert!(matches!(err, HdaError::MalformedStream { offset: 1, .. }));
    }

    #[test]
    fn test_truncated_escape() {
        let mut reader = InstructionReader::new(&[0x20, 0x00, 0x00]);
        assert!(matches!(
            reader.next_instruction(),
            Err(HdaError::MalformedStream { offset: 3, .. })
        ));
    }

    #[test]
    fn test_truncated_distance() {
        let mut reader = InstructionReader::new(&[0x40]);
        assert!(reader.next_instruction().is_err());
    }
}
