//! Trained-weights loading.

use std::path::Path;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;

use crate::EmbedNetError;

/// Opens a checkpoint as a `VarBuilder`, dispatching on the file
/// extension: `.pth`/`.pt` go through the PyTorch pickle reader,
/// `.safetensors` through the safetensors reader.
///
/// Missing files and malformed checkpoints surface as the underlying
/// reader errors; missing or mis-shaped tensors surface later, when the
/// model pulls them out of the builder.
pub fn load(path: &Path, device: &Device) -> Result<VarBuilder<'static>, EmbedNetError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("pth") | Some("pt") => Ok(VarBuilder::from_pth(path, DType::F32, device)?),
        Some("safetensors") => {
            let data = std::fs::read(path)?;
            Ok(VarBuilder::from_buffered_safetensors(
                data,
                DType::F32,
                device,
            )?)
        }
        _ => Err(EmbedNetError::UnsupportedWeights(
            path.display().to_string(),
        )),
    }
}
