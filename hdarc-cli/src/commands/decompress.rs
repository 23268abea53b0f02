//! Decompress command implementation.

use hdarc_codec::{Decoder, Termination};
use hdarc_core::InputFile;
use std::path::Path;
use tracing::{debug, info, warn};

pub fn cmd_decompress(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = if input == Path::new("-") {
        InputFile::from_reader(&mut std::io::stdin().lock())?
    } else {
        InputFile::open(input)?
    };
    let consumed = write_decoded(&data, output)?;

    info!(
        "Decompressed {} ({} bytes) to {}",
        input.display(),
        consumed,
        output.display()
    );
    Ok(())
}

/// Decode `data` into `output`. Returns the number of input bytes used.
fn write_decoded(data: &[u8], output: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let mut decoder = Decoder::new(data);

    match decoder.run()? {
        Termination::Marker if decoder.consumed() < data.len() => warn!(
            "End marker at offset {:#x}, ignoring {} trailing bytes",
            decoder.consumed(),
            data.len() - decoder.consumed()
        ),
        Termination::Marker => {}
        Termination::Exhausted => info!("No end marker, stream ends with the input"),
    }

    let consumed = decoder.consumed();
    let decoded = decoder.into_output();
    std::fs::write(output, &decoded)?;
    debug!("Wrote {} decoded bytes", decoded.len());
    Ok(consumed)
}
