//! Utility functions for the CLI.

use glob::Pattern;
use hdarc_core::Entry;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Check if a name matches the filter patterns.
/// - If include patterns are specified, the name must match at least one
/// - If exclude patterns are specified, the name must not match any
pub fn matches_filters(name: &str, include: &[String], exclude: &[String]) -> bool {
    let matches = |pattern: &String| Pattern::new(pattern).is_ok_and(|p| p.matches(name));

    if exclude.iter().any(matches) {
        return false;
    }

    include.is_empty() || include.iter().any(matches)
}

/// Filter entries based on include/exclude patterns.
pub fn filter_entries(entries: &[Entry], include: &[String], exclude: &[String]) -> Vec<Entry> {
    if include.is_empty() && exclude.is_empty() {
        return entries.to_vec();
    }

    entries
        .iter()
        .filter(|e| matches_filters(&e.name, include, exclude))
        .cloned()
        .collect()
}

/// Format entries as a table, one line per entry.
pub fn format_entries(entries: &[Entry], verbose: bool) -> String {
    let mut out = String::new();
    if !verbose {
        for entry in entries {
            let _ = writeln!(out, "{}", entry.name);
        }
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10} {:>6} {:>10} {:>10} {:>7} Name",
        "Offset", "Method", "Size", "Stored", "Saved",
    );
    let _ = writeln!(out, "{}", "-".repeat(64));

    let mut total_size = 0u64;
    let mut total_stored = 0u64;

    for entry in entries {
        let _ = writeln!(out, "{}", entry);
        total_size += entry.size;
        total_stored += entry.compressed_size;
    }

    let _ = writeln!(out, "{}", "-".repeat(64));
    let total_savings = if total_size > 0 {
        (1.0 - total_stored as f64 / total_size as f64) * 100.0
    } else {
        0.0
    };
    let _ = write!(
        out,
        "{:<10} {:>6} {:>10} {:>10} {:>6.1}% {} entries",
        "",
        "",
        total_size,
        total_stored,
        total_savings,
        entries.len()
    );
    out
}

/// Regular files directly inside `dir`, sorted by file name.
pub fn collect_input_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Parse an unsigned number, decimal or `0x`-prefixed hex.
pub fn parse_u64(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}

/// Parse an unsigned 32-bit number, decimal or `0x`-prefixed hex.
pub fn parse_u32(s: &str) -> Result<u32, String> {
    let value = parse_u64(s)?;
    u32::try_from(value).map_err(|_| format!("{} does not fit in 32 bits", value))
}

/// Parse a disc sector size, which must be nonzero.
pub fn parse_sector_size(s: &str) -> Result<u32, String> {
    match parse_u32(s)? {
        0 => Err("sector size must be nonzero".to_string()),
        size => Ok(size),
    }
}
