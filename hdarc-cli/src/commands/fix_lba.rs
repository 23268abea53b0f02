//! LBA table fix command implementation.

use hdarc_archive::{LbaTableConfig, patch_lba_table};
use std::path::Path;
use tracing::{debug, info, warn};

/// Options for patching the LBA table.
pub struct FixLbaOptions {
    pub lba: u32,
    pub new_size: u32,
    pub config: LbaTableConfig,
}

pub fn cmd_fix_lba(elf: &Path, options: &FixLbaOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut data = std::fs::read(elf)?;
    debug!(
        "LBA table {:#x}..{:#x}, {} bytes per sector",
        options.config.table_start, options.config.table_end, options.config.bytes_per_sector
    );

    let report = patch_lba_table(&mut data, options.lba, options.new_size, &options.config)?;
    if !report.found {
        warn!(
            "LBA {} was not found in the table of {} entries; {} left unchanged",
            options.lba,
            report.entries,
            elf.display()
        );
        return Ok(());
    }

    std::fs::write(elf, &data)?;
    info!(
        "LBA {} now ends at {}, {} later entries shifted by {} sectors",
        options.lba,
        report.new_end.unwrap_or_default(),
        report.entries_shifted,
        report.difference
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elf_with_table(pairs: &[(u32, u32)]) -> Vec<u8> {
        let mut data = vec![0u8; 0x10];
        for (start, end) in pairs {
            data.extend_from_slice(&start.to_le_bytes());
            data.extend_from_slice(&end.to_le_bytes());
        }
        data
    }

    fn options(lba: u32, new_size: u32) -> FixLbaOptions {
        FixLbaOptions {
            lba,
            new_size,
            config: LbaTableConfig {
                table_start: 0x10,
                table_end: 0x28,
                bytes_per_sector: 0x800,
            },
        }
    }

    #[test]
    fn test_fix_lba_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let elf = dir.path().join("SLUS_202.51");
        std::fs::write(&elf, elf_with_table(&[(20, 24), (25, 30), (31, 31)])).unwrap();

        cmd_fix_lba(&elf, &options(25, 0x800 * 8)).unwrap();

        assert_eq!(
            std::fs::read(&elf).unwrap(),
            elf_with_table(&[(20, 24), (25, 32), (33, 33)])
        );
    }

    #[test]
    fn test_unknown_lba_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let elf = dir.path().join("SLUS_202.51");
        let original = elf_with_table(&[(20, 24), (25, 30), (31, 31)]);
        std::fs::write(&elf, &original).unwrap();

        cmd_fix_lba(&elf, &options(99, 1)).unwrap();
        assert_eq!(std::fs::read(&elf).unwrap(), original);
    }

    #[test]
    fn test_zero_sector_size_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let elf = dir.path().join("SLUS_202.51");
        let original = elf_with_table(&[(20, 24)]);
        std::fs::write(&elf, &original).unwrap();

        let mut opts = options(20, 1);
        opts.config.bytes_per_sector = 0;
        let err = cmd_fix_lba(&elf, &opts).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<hdarc_core::HdaError>(),
            Some(hdarc_core::HdaError::InvalidConfig(_))
        ));
        assert_eq!(std::fs::read(&elf).unwrap(), original);
    }
}
