//! EmbedNet: the audio-embedding network shipped with the plugin, plus
//! the tooling around it.
//!
//! The plugin runs the network through an ONNX runtime; training happens
//! elsewhere. This crate covers the hand-off between the two worlds:
//!
//! - `model`: the fixed architecture, rebuilt layer by layer so a trained
//!   checkpoint can be loaded and run natively
//! - `weights`: checkpoint loading (PyTorch pickle or safetensors)
//! - `onnx`: serialization of the graph and weights to an ONNX file
//! - `dump`: raw reference-tensor dumps for cross-validating other
//!   runtimes against the same input
//! - `exporter`: the end-to-end export pipeline used by `modelexport`

pub mod dump;
pub mod exporter;
pub mod model;
pub mod onnx;
pub mod weights;

mod error;

pub use error::EmbedNetError;
pub use model::{EmbedNet, EmbedNetConfig};
