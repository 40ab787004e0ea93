//! The end-to-end export pipeline.
//!
//! One run: load the checkpoint, rebuild the network, run a single
//! forward pass on the deterministic reference input, then write the
//! ONNX file next to two raw tensor dumps. Re-running with the same
//! checkpoint and seed reproduces all three files byte for byte.

use std::fs;
use std::path::{Path, PathBuf};

use candle_core::{Device, Module};
use prost::Message;
use tracing::info;

use crate::{EmbedNet, EmbedNetConfig, EmbedNetError, dump, onnx, weights};

/// File name of the input tensor dump.
pub const INPUT_DUMP: &str = "test_input.data";
/// File name of the output tensor dump.
pub const OUTPUT_DUMP: &str = "test_output.data";

/// Files written by one export run.
#[derive(Debug)]
pub struct ExportArtifacts {
    pub onnx: PathBuf,
    pub input_dump: PathBuf,
    pub output_dump: PathBuf,
    /// Shape of the forward-pass output.
    pub output_shape: Vec<usize>,
}

/// Runs the full export: `weights_path` in, three files into `out_dir`.
///
/// The ONNX file takes the checkpoint's stem (`test_model.pth` becomes
/// `test_model.onnx`); the dumps have fixed names.
pub fn run(
    weights_path: &Path,
    out_dir: &Path,
    seed: u64,
) -> Result<ExportArtifacts, EmbedNetError> {
    let device = Device::Cpu;
    let cfg = EmbedNetConfig::default();

    let vb = weights::load(weights_path, &device)?;
    let model = EmbedNet::new(cfg, vb)?;

    let input = dump::fixed_input(&cfg, seed, &device)?;
    let output = model.forward(&input)?;
    let output_shape = output.dims().to_vec();

    let stem = weights_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    let onnx_path = out_dir.join(format!("{stem}.onnx"));
    let proto = onnx::model_to_proto(&model)?;
    fs::write(&onnx_path, proto.encode_to_vec())?;
    info!("wrote {}", onnx_path.display());

    let input_dump = out_dir.join(INPUT_DUMP);
    dump::write_raw_f32(&input_dump, &input)?;
    info!("wrote {}", input_dump.display());

    let output_dump = out_dir.join(OUTPUT_DUMP);
    dump::write_raw_f32(&output_dump, &output)?;
    info!("wrote {}", output_dump.display());

    Ok(ExportArtifacts {
        onnx: onnx_path,
        input_dump,
        output_dump,
        output_shape,
    })
}
