//! ONNX serialization of the EmbedNet graph.
//!
//! `proto` carries prost mappings for the slice of the ONNX protobuf
//! schema the exporter emits; `export` lowers a loaded [`crate::EmbedNet`]
//! into a `ModelProto` ready to be encoded to disk.

pub mod export;
pub mod proto;

pub use export::{IR_VERSION, OPSET_VERSION, model_to_proto};
