//! Pack command implementation.

use crate::utils::collect_input_files;
use hdarc_archive::HdaWriter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn cmd_pack(archive: &Path, input_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let files = collect_input_files(input_dir)?;
    info!(
        "Packing {} files from {} into {}",
        files.len(),
        input_dir.display(),
        archive.display()
    );

    pack_files(archive, &files)?;

    info!("Created {} with {} entries", archive.display(), files.len());
    Ok(())
}

/// Write `files` into a new archive in the given order. Nothing is created
/// unless every input could be read.
fn pack_files(archive: &Path, files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut blobs = Vec::with_capacity(files.len());
    for path in files {
        let data = std::fs::read(path)?;
        debug!("  Adding: {} ({} bytes)", path.display(), data.len());
        blobs.push(data);
    }

    let mut writer = HdaWriter::new(BufWriter::new(File::create(archive)?));
    for data in blobs {
        writer.add_entry(data);
    }

    let mut out = writer.finish()?;
    out.flush()?;
    Ok(())
}
