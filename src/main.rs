//! # Raspa CLI
//!
//! Command-line interface for extracting raster images from printer captures.
//!
//! ## Usage
//!
//! ```bash
//! # Extract every image into out/<unix-seconds>/1.bmp, 2.bmp, ...
//! raspa extract capture.prn
//!
//! # PNG output into a fixed directory
//! raspa extract --format png --out-dir images --no-timestamp capture.prn
//!
//! # Abort on the first malformed region
//! raspa extract --strict --fail-fast capture.prn
//!
//! # List image regions without writing anything
//! raspa scan capture.prn
//! raspa scan --json capture.prn
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use raspa::{
    RaspaError,
    extract::{self, ErrorPolicy, ExtractConfig},
    packed::Validation,
    raster::{ImageEncoder, OutputFormat, ReconstructConfig, RowScan},
    source::{DEFAULT_MAX_MAP, InputMap},
};

/// Raspa - Dot-matrix printer raster extractor
#[derive(Parser, Debug)]
#[command(name = "raspa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract every image in a capture file
    Extract {
        /// Capture file to read
        file: PathBuf,

        /// Base output directory
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,

        /// Write directly into the output directory instead of a timestamped subdirectory
        #[arg(long)]
        no_timestamp: bool,

        /// Output image format (bmp or png)
        #[arg(long, default_value = "bmp")]
        format: OutputFormat,

        /// Reject records with invalid field values
        #[arg(long)]
        strict: bool,

        /// Abort on the first malformed image region
        #[arg(long)]
        fail_fast: bool,

        /// Resume the row search after each row's payload
        #[arg(long)]
        skip_payload: bool,

        /// Maximum number of bytes to map from the file
        #[arg(long, default_value_t = DEFAULT_MAX_MAP)]
        max_map: usize,
    },

    /// List the image regions in a capture file
    Scan {
        /// Capture file to read
        file: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Resume the row search after each row's payload
        #[arg(long)]
        skip_payload: bool,

        /// Maximum number of bytes to map from the file
        #[arg(long, default_value_t = DEFAULT_MAX_MAP)]
        max_map: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn row_scan(skip_payload: bool) -> RowScan {
    if skip_payload {
        RowScan::SkipPayload
    } else {
        RowScan::Overlapping
    }
}

fn run(cli: Cli) -> Result<(), RaspaError> {
    match cli.command {
        Commands::Extract {
            file,
            out_dir,
            no_timestamp,
            format,
            strict,
            fail_fast,
            skip_payload,
            max_map,
        } => {
            let config = ExtractConfig {
                validation: if strict { Validation::Strict } else { Validation::Warn },
                policy: if fail_fast { ErrorPolicy::FailFast } else { ErrorPolicy::BestEffort },
                row_scan: row_scan(skip_payload),
                format,
            };

            let input = InputMap::open(&file, max_map)?;
            let out_dir = extract::output_dir(&out_dir, !no_timestamp)?;
            println!("Writing images to {}", out_dir.display());

            let encoder = ImageEncoder::new(config.format);
            let summary = extract::extract_images(&input, &out_dir, &encoder, &config)?;

            println!(
                "{} image(s) found: {} written, {} skipped, {} faulty, {} diagnostic(s)",
                summary.images_seen,
                summary.images_written,
                summary.images_skipped,
                summary.faults,
                summary.diagnostics
            );
            Ok(())
        }

        Commands::Scan {
            file,
            json,
            skip_payload,
            max_map,
        } => {
            let input = InputMap::open(&file, max_map)?;
            let config = ReconstructConfig {
                validation: Validation::Warn,
                row_scan: row_scan(skip_payload),
            };
            let reports = extract::survey(&input, config);

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
                return Ok(());
            }

            if reports.is_empty() {
                println!("No images found in {}", file.display());
                return Ok(());
            }

            for report in &reports {
                println!("{}", report);
                for diagnostic in &report.diagnostics {
                    println!("        {}", diagnostic);
                }
            }
            Ok(())
        }
    }
}
