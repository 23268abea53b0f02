//! Unpack command implementation.

use crate::utils::{create_progress_bar, filter_entries};
use hdarc_archive::HdaReader;
use hdarc_core::{Entry, InputFile};
use std::path::Path;
use tracing::{debug, info, warn};

/// Options for unpacking an archive.
pub struct UnpackOptions<'a> {
    pub output: &'a Path,
    pub include: &'a [String],
    pub exclude: &'a [String],
    pub lenient: bool,
    pub progress: bool,
    pub verbose: bool,
}

pub fn cmd_unpack(archive: &Path, options: &UnpackOptions) -> Result<(), Box<dyn std::error::Error>> {
    let input = InputFile::open(archive)?;
    let reader = HdaReader::new(&input)?;
    debug!(
        "Directory at {:#x}, {} entries, ends at {:#x}",
        reader.base_offset(),
        reader.len(),
        reader.directory_end()
    );

    info!(
        "Extracting {} to {}",
        archive.display(),
        options.output.display()
    );
    std::fs::create_dir_all(options.output)?;

    let selected = filter_entries(reader.entries(), options.include, options.exclude);
    let pb = create_progress_bar(selected.len() as u64, options.progress);
    pb.set_message("entries");

    for entry in &selected {
        let data = extract_entry(&reader, entry, options.lenient)?;
        std::fs::write(options.output.join(&entry.name), &data)?;
        if options.verbose {
            pb.println(format!("  Extracted: {} ({} bytes)", entry.name, data.len()));
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    info!("Extracted {} of {} entries", selected.len(), reader.len());
    Ok(())
}

/// Extract one entry; in lenient mode a size mismatch is only a warning.
fn extract_entry(reader: &HdaReader<'_>, entry: &Entry, lenient: bool) -> hdarc_core::Result<Vec<u8>> {
    if !lenient {
        return reader.extract(entry);
    }

    let data = reader.extract_unchecked(entry)?;
    if entry.is_compressed() && data.len() as u64 != entry.size {
        warn!(
            "{}: header declares {} bytes, decoded {}",
            entry.name,
            entry.size,
            data.len()
        );
    }
    Ok(data)
}
