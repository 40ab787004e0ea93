//! modelexport - Exports the trained EmbedNet checkpoint to ONNX.
//!
//! Loads the checkpoint, runs one forward pass on the deterministic
//! reference input and writes three files: the ONNX model and raw
//! dumps of the input/output tensors for cross-validation in other
//! runtimes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Export the trained EmbedNet checkpoint to ONNX.
#[derive(Parser, Debug)]
#[command(name = "modelexport")]
#[command(about = "Export the EmbedNet checkpoint to ONNX with reference dumps")]
struct Args {
    /// Trained checkpoint (.pth, .pt or .safetensors)
    #[arg(default_value = "test_model.pth")]
    weights: PathBuf,

    /// Output directory (default: the checkpoint's directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Seed for the reference input tensor
    #[arg(long, default_value_t = 42)]
    seed: u64,

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
            .weights
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let artifacts = grainlab_embednet::exporter::run(&args.weights, &out_dir, args.seed)?;
    info!(
        "exported {} (output shape {:?})",
        artifacts.onnx.display(),
        artifacts.output_shape
    );
    Ok(())
}
