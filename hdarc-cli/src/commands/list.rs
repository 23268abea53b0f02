//! List command implementation.

use crate::utils::{filter_entries, format_entries};
use hdarc_archive::HdaReader;
use hdarc_core::{Entry, InputFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON serializable entry data for archive listings.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    index: usize,
    name: String,
    offset: u64,
    size: u64,
    compressed_size: u64,
    ratio: f64,
    method: String,
    reserved: u32,
}

impl EntryJson {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            index: entry.index,
            name: entry.name.clone(),
            offset: entry.offset,
            size: entry.size,
            compressed_size: entry.compressed_size,
            ratio: entry.compression_ratio(),
            method: entry.method.name().to_string(),
            reserved: entry.reserved,
        }
    }
}

/// JSON output for archive listing.
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveListJson {
    archive: String,
    base_offset: u64,
    directory_end: u64,
    entries: Vec<EntryJson>,
}

/// Options for listing archive contents.
pub struct ListOptions<'a> {
    pub verbose: bool,
    pub json: bool,
    pub include: &'a [String],
    pub exclude: &'a [String],
}

pub fn cmd_list(archive: &Path, options: &ListOptions) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_list(archive, options)?);
    Ok(())
}

/// Render the listing, either as a table or as JSON.
fn render_list(archive: &Path, options: &ListOptions) -> Result<String, Box<dyn std::error::Error>> {
    let input = InputFile::open(archive)?;
    let reader = HdaReader::new(&input)?;
    let filtered = filter_entries(reader.entries(), options.include, options.exclude);

    if options.json {
        let listing = ArchiveListJson {
            archive: archive.display().to_string(),
            base_offset: reader.base_offset(),
            directory_end: reader.directory_end(),
            entries: filtered.iter().map(EntryJson::from_entry).collect(),
        };
        return Ok(serde_json::to_string_pretty(&listing)?);
    }

    let mut out = format!(
        "Archive: {} ({} entries, directory at {:#x})\n",
        archive.display(),
        reader.len(),
        reader.base_offset()
    );
    out.push_str(&format_entries(&filtered, options.verbose));
    Ok(out)
}
