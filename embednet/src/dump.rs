//! Reference-tensor dumps.
//!
//! The exporter writes the input it fed the network and the output it
//! got back as headerless little-endian f32 files, so other runtimes can
//! replay the exact same inference and diff the result.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use candle_core::{Device, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::{EmbedNetConfig, EmbedNetError};

/// Standard-normal input tensor of shape (1, in_channels, input_size).
///
/// Samples come from a seeded generator: the same seed always produces
/// the same tensor, byte for byte.
pub fn fixed_input(
    cfg: &EmbedNetConfig,
    seed: u64,
    device: &Device,
) -> Result<Tensor, EmbedNetError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = cfg.in_channels * cfg.input_size;
    let data: Vec<f32> = (0..n).map(|_| rng.sample(StandardNormal)).collect();
    Ok(Tensor::from_vec(
        data,
        (1, cfg.in_channels, cfg.input_size),
        device,
    )?)
}

/// Writes a tensor as raw little-endian f32, row-major, no header.
pub fn write_raw_f32(path: impl AsRef<Path>, tensor: &Tensor) -> Result<(), EmbedNetError> {
    let values = tensor.contiguous()?.flatten_all()?.to_vec1::<f32>()?;
    let mut writer = BufWriter::new(File::create(path)?);
    for value in values {
        writer.write_all(&value.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a raw little-endian f32 dump back into a flat vector.
pub fn read_raw_f32(path: impl AsRef<Path>) -> Result<Vec<f32>, EmbedNetError> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
