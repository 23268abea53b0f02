//! hdarc CLI - HDA archive toolkit
//!
//! Unpacks, repacks and inspects the resource archives of Harvest Moon: Save
//! the Homeland, and patches the executable's sector table afterwards.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{
    FixLbaOptions, ListOptions, UnpackOptions, cmd_decompress, cmd_fix_lba, cmd_list, cmd_pack,
    cmd_test, cmd_unpack,
};
use hdarc_archive::LbaTableConfig;
use hdarc_core::HdaError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use utils::{parse_sector_size, parse_u32, parse_u64};

#[derive(Parser)]
#[command(name = "hdarc")]
#[command(author, version, about = "HDA resource archive toolkit")]
#[command(long_about = "
hdarc reads and writes the HDA resource archives used by Harvest Moon: Save
the Homeland, including their LZ-compressed entries.

Examples:
  hdarc list DATA.HDA
  hdarc list --json DATA.HDA
  hdarc unpack DATA.HDA -o data
  hdarc unpack DATA.HDA -o data --include 'File_0001*'
  hdarc pack NEW.HDA data
  hdarc test DATA.HDA
  hdarc decompress entry.lz entry.bin
  hdarc fix-lba SLUS_202.51 541 1234567

Set RUST_LOG to control log output (for example RUST_LOG=debug).
")]
struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every entry of an archive as File_NNNNN.bin
    #[command(alias = "x")]
    Unpack {
        /// Archive file to extract
        archive: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Include only entries matching pattern (glob syntax: File_000*)
        #[arg(short = 'I', long)]
        include: Vec<String>,

        /// Exclude entries matching pattern (glob syntax)
        #[arg(short = 'X', long)]
        exclude: Vec<String>,

        /// Keep entries whose decoded size differs from the header
        #[arg(long)]
        lenient: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Create an archive from the files of a directory
    #[command(alias = "c")]
    Pack {
        /// Output archive file
        archive: PathBuf,

        /// Directory whose regular files become the entries, in name order
        input_dir: PathBuf,
    },

    /// List contents of an archive
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Include only entries matching pattern (glob syntax)
        #[arg(short = 'I', long)]
        include: Vec<String>,

        /// Exclude entries matching pattern (glob syntax)
        #[arg(short = 'X', long)]
        exclude: Vec<String>,
    },

    /// Test archive integrity
    #[command(alias = "t")]
    Test {
        /// Archive file to test
        archive: PathBuf,
    },

    /// Decompress a raw compressed stream
    Decompress {
        /// Compressed input file, or `-` for stdin
        input: PathBuf,

        /// Decompressed output file
        output: PathBuf,
    },

    /// Recalculate the executable's LBA table after resizing a disc file
    FixLba {
        /// Executable to patch in place
        elf: PathBuf,

        /// Start LBA of the resized file (decimal, or hex with 0x)
        #[arg(value_parser = parse_u32)]
        lba: u32,

        /// New size of the file in bytes
        #[arg(value_parser = parse_u32)]
        new_size: u32,

        /// File offset of the LBA table
        #[arg(long, value_parser = parse_u64, default_value_t = LbaTableConfig::DEFAULT_TABLE_START)]
        table_start: u64,

        /// File offset just past the LBA table
        #[arg(long, value_parser = parse_u64, default_value_t = LbaTableConfig::DEFAULT_TABLE_END)]
        table_end: u64,

        /// Bytes per disc sector
        #[arg(long, value_parser = parse_sector_size, default_value_t = LbaTableConfig::DEFAULT_BYTES_PER_SECTOR)]
        sector_size: u32,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Unpack {
            archive,
            output,
            include,
            exclude,
            lenient,
            progress,
        } => cmd_unpack(
            &archive,
            &UnpackOptions {
                output: &output,
                include: &include,
                exclude: &exclude,
                lenient,
                progress,
                verbose: cli.verbose,
            },
        ),
        Commands::Pack { archive, input_dir } => cmd_pack(&archive, &input_dir),
        Commands::List {
            archive,
            json,
            include,
            exclude,
        } => cmd_list(
            &archive,
            &ListOptions {
                verbose: cli.verbose,
                json,
                include: &include,
                exclude: &exclude,
            },
        ),
        Commands::Test { archive } => cmd_test(&archive, cli.verbose),
        Commands::Decompress { input, output } => cmd_decompress(&input, &output),
        Commands::FixLba {
            elf,
            lba,
            new_size,
            table_start,
            table_end,
            sector_size,
        } => cmd_fix_lba(
            &elf,
            &FixLbaOptions {
                lba,
                new_size,
                config: LbaTableConfig {
                    table_start,
                    table_end,
                    bytes_per_sector: sector_size,
                },
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if e.downcast_ref::<HdaError>().is_some_and(HdaError::is_data_error) {
            eprintln!("The input is damaged or is not an HDA archive.");
        }
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
