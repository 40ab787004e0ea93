//! wavgen - Generates resampled/requantized WAV variants.
//!
//! Loads one source file and writes the full (sample rate x subtype)
//! matrix of variants next to it, for exercising an audio loader against
//! every encoding it claims to support. Combinations the container
//! cannot represent are logged and skipped.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use grainlab_audio::{Subtype, variants};

/// Generate resampled/requantized WAV variants of a source file.
#[derive(Parser, Debug)]
#[command(name = "wavgen")]
#[command(about = "Generate sample-rate/bit-depth WAV variants of a source file")]
struct Args {
    /// Source WAV file
    input: PathBuf,

    /// Output directory (default: the source file's directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Target sample rates
    #[arg(long, value_delimiter = ',', default_values_t = variants::SAMPLE_RATES)]
    rates: Vec<u32>,

    /// Target subtypes (PCM_U8, PCM_16, PCM_24, PCM_32, FLOAT, DOUBLE)
    #[arg(long, value_delimiter = ',', default_values_t = Subtype::DEFAULT_SET)]
    subtypes: Vec<Subtype>,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => args
            .input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let report = variants::generate(&args.input, &out_dir, &args.rates, &args.subtypes)?;
    info!(
        "{} attempts, {} written, {} skipped",
        report.attempts,
        report.written.len(),
        report.skipped.len()
    );
    Ok(())
}
