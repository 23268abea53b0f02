//! Sector table patching for the game executable.
//!
//! The executable locates every file on the disc through a table of
//! `(start, end)` LBA pairs. When an archive is repacked to a different
//! size, its end sector changes and every file stored after it moves by
//! the same number of sectors. [`patch_lba_table`] applies both updates.

use hdarc_core::cursor::{ByteReader, read_u32_at, write_u32_at};
use hdarc_core::error::{HdaError, Result};

/// Location and geometry of the sector table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LbaTableConfig {
    /// File offset of the first table pair.
    pub table_start: u64,
    /// File offset just past the table.
    pub table_end: u64,
    /// Data bytes per disc sector.
    pub bytes_per_sector: u32,
}

impl LbaTableConfig {
    /// Table start in the retail executable.
    pub const DEFAULT_TABLE_START: u64 = 0x162460;
    /// Table end in the retail executable.
    pub const DEFAULT_TABLE_END: u64 = 0x162D30;
    /// User-data bytes in a Mode 2 Form 1 sector.
    pub const DEFAULT_BYTES_PER_SECTOR: u32 = 0x800;

    /// Number of sectors needed for `size` bytes.
    pub fn sectors_for(&self, size: u32) -> u32 {
        size.div_ceil(self.bytes_per_sector)
    }
}

impl Default for LbaTableConfig {
    fn default() -> Self {
        Self {
            table_start: Self::DEFAULT_TABLE_START,
            table_end: Self::DEFAULT_TABLE_END,
            bytes_per_sector: Self::DEFAULT_BYTES_PER_SECTOR,
        }
    }
}

/// Outcome of a table patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LbaPatchReport {
    /// Whether a pair starting at the requested LBA was found.
    pub found: bool,
    /// Number of pairs in the table.
    pub entries: usize,
    /// Pairs moved by a nonzero sector difference.
    pub entries_shifted: usize,
    /// New end sector of the resized file, if found.
    pub new_end: Option<u32>,
    /// Sector difference applied to the pairs after the resized file.
    pub difference: i32,
}

/// Resize the file starting at `lba` to `new_size` bytes and shift every
/// later table pair.
///
/// Arithmetic wraps at 32 bits. Not finding `lba` leaves the table
/// unchanged and is reported through [`LbaPatchReport::found`].
pub fn patch_lba_table(
    elf: &mut [u8],
    lba: u32,
    new_size: u32,
    config: &LbaTableConfig,
) -> Result<LbaPatchReport> {
    if config.bytes_per_sector == 0 {
        return Err(HdaError::invalid_config("bytes per sector must be nonzero"));
    }

    // the last pair may extend past table_end when the range is not a
    // multiple of 8
    let pairs = config.table_end.saturating_sub(config.table_start).div_ceil(8);
    let table_len = pairs
        .checked_mul(8)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| {
            let available = usize::try_from(config.table_start)
                .map_or(0, |start| elf.len().saturating_sub(start));
            HdaError::truncated(config.table_start, usize::MAX, available)
        })?;
    ByteReader::new(elf).slice_at(config.table_start, table_len)?;

    let mut report = LbaPatchReport::default();
    let mut position = config.table_start;

    while position < config.table_end {
        let start = read_u32_at(elf, position)?;
        let end = read_u32_at(elf, position + 4)?;

        write_u32_at(elf, position, start.wrapping_add_signed(report.difference))?;
        write_u32_at(elf, position + 4, end.wrapping_add_signed(report.difference))?;
        if report.difference != 0 {
            report.entries_shifted += 1;
        }

        if start == lba {
            let new_end = start
                .wrapping_add(config.sectors_for(new_size))
                .wrapping_sub(1);
            write_u32_at(elf, position + 4, new_end)?;

            report.found = true;
            report.new_end = Some(new_end);
            report.difference = new_end.wrapping_sub(end) as i32;
        }

        report.entries += 1;
        position += 8;
    }

    Ok(report)
}
