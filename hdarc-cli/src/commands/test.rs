//! Test command implementation.

use hdarc_archive::HdaReader;
use hdarc_core::InputFile;
use std::path::Path;
use tracing::debug;

pub fn cmd_test(archive: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let input = InputFile::open(archive)?;
    let reader = HdaReader::new(&input)?;

    println!("Testing {} ({} entries)", archive.display(), reader.len());

    // all entries decode in parallel first; the per-entry pass below only
    // runs to report which entries failed
    if reader.extract_all_parallel().is_ok() {
        if verbose {
            for entry in reader.entries() {
                println!("  OK: {}", entry.name);
            }
        }
        println!();
        println!("All entries OK");
        return Ok(());
    }
    debug!("Parallel decode failed, checking entries one by one");

    let mut ok_count = 0usize;
    let mut errors: Vec<(String, String)> = Vec::new();

    for entry in reader.entries() {
        match reader.extract(entry) {
            Ok(_) => {
                ok_count += 1;
                if verbose {
                    println!("  OK: {}", entry.name);
                }
            }
            Err(e) => {
                errors.push((entry.name.clone(), e.to_string()));
                if verbose {
                    println!("  FAILED: {} - {}", entry.name, e);
                }
            }
        }
    }

    println!();
    println!("Test results:");
    println!("  Total entries: {}", reader.len());
    println!("  OK: {}", ok_count);
    println!("  Failed: {}", errors.len());

    if !verbose {
        println!();
        println!("Errors:");
        for (name, err) in &errors {
            println!("  {}: {}", name, err);
        }
    }

    Err(format!("{} of {} entries failed", errors.len(), reader.len()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdarc_archive::{EntryHeader, pack};

    #[test]
    fn test_valid_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("DATA.HDA");
        std::fs::write(&archive, pack(&[&b"abc"[..], &b""[..]]).unwrap()).unwrap();
        cmd_test(&archive, true).unwrap();
    }

    #[test]
    fn test_corrupt_entry_fails() {
        // back-reference before the start of the output
        let stream = [0x40, 0x00];
        let header = EntryHeader {
            flag: 1,
            decompressed_len: 1,
            compressed_len: stream.len() as u32,
            reserved: 0,
        };
        let mut data = vec![0u8; 0x20];
        data[0] = 0x10;
        data[0x10] = 0x10;
        data.extend_from_slice(&header.to_bytes());
        data.extend_from_slice(&stream);

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("BAD.HDA");
        std::fs::write(&archive, data).unwrap();

        let err = cmd_test(&archive, false).unwrap_err();
        assert_eq!(err.to_string(), "1 of 1 entries failed");
    }

    #[test]
    fn test_truncated_archive_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("SHORT.HDA");
        std::fs::write(&archive, [0x10, 0, 0, 0]).unwrap();
        assert!(cmd_test(&archive, false).is_err());
    }
}
