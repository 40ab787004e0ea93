//! Lowers a loaded EmbedNet into an ONNX model proto.
//!
//! The graph mirrors the forward pass exactly: three
//! Conv/BatchNormalization/MaxPool stages, a GlobalAveragePool over the
//! time axis, a Transpose and the final projection as MatMul + Add.
//! Initializers are named by their checkpoint keys so a dumped model can
//! be diffed against the checkpoint it came from.

use candle_core::Tensor;
use candle_nn::BatchNorm;

use crate::model::{EmbedNet, Stage};
use crate::EmbedNetError;

use super::proto::{
    attribute_proto::AttributeType, tensor_proto::DataType, tensor_shape_proto::dimension,
    tensor_shape_proto::Dimension, type_proto, AttributeProto, GraphProto, ModelProto,
    NodeProto, OperatorSetIdProto, TensorProto, TensorShapeProto, TypeProto, ValueInfoProto,
};

/// Operator set the emitted graph conforms to.
pub const OPSET_VERSION: i64 = 17;
/// ONNX IR version of the emitted file.
pub const IR_VERSION: i64 = 8;

/// Name of the graph input tensor.
pub const INPUT_NAME: &str = "input";
/// Name of the graph output tensor.
pub const OUTPUT_NAME: &str = "output";

/// Builds the complete model proto for `model`, weights included.
pub fn model_to_proto(model: &EmbedNet) -> Result<ModelProto, EmbedNetError> {
    let cfg = model.config();

    let mut graph = GraphProto {
        name: "embednet".to_string(),
        input: vec![tensor_value_info(
            INPUT_NAME,
            &[1, cfg.in_channels as i64, cfg.input_size as i64],
        )],
        output: vec![tensor_value_info(
            OUTPUT_NAME,
            &[1, 1, cfg.embed_size as i64],
        )],
        ..Default::default()
    };

    // conv/norm layer indices inside the checkpoint's sequential block
    let mut prev = INPUT_NAME.to_string();
    for (stage_no, (stage, (conv_idx, norm_idx))) in model
        .stages()
        .iter()
        .zip([(0, 1), (3, 4), (6, 7)])
        .enumerate()
    {
        prev = push_stage(&mut graph, stage, stage_no, conv_idx, norm_idx, &prev)?;
    }

    graph.node.push(NodeProto {
        op_type: "GlobalAveragePool".to_string(),
        name: "time_average".to_string(),
        input: vec![prev],
        output: vec!["pooled".to_string()],
        ..Default::default()
    });
    graph.node.push(NodeProto {
        op_type: "Transpose".to_string(),
        name: "to_features_last".to_string(),
        input: vec!["pooled".to_string()],
        output: vec!["features".to_string()],
        attribute: vec![ints_attr("perm", &[0, 2, 1])],
        ..Default::default()
    });

    // The projection weight is stored transposed (in x out) so it feeds
    // MatMul directly.
    let fc = model.full_connect();
    let weight_t = fc.weight().t()?;
    graph
        .initializer
        .push(f32_initializer("full_connect.weight", &weight_t)?);
    let bias = fc
        .bias()
        .ok_or_else(|| EmbedNetError::Export("projection has no bias".to_string()))?;
    graph
        .initializer
        .push(f32_initializer("full_connect.bias", bias)?);

    graph.node.push(NodeProto {
        op_type: "MatMul".to_string(),
        name: "project".to_string(),
        input: vec!["features".to_string(), "full_connect.weight".to_string()],
        output: vec!["projected".to_string()],
        ..Default::default()
    });
    graph.node.push(NodeProto {
        op_type: "Add".to_string(),
        name: "project_bias".to_string(),
        input: vec!["projected".to_string(), "full_connect.bias".to_string()],
        output: vec![OUTPUT_NAME.to_string()],
        ..Default::default()
    });

    Ok(ModelProto {
        ir_version: IR_VERSION,
        producer_name: env!("CARGO_PKG_NAME").to_string(),
        producer_version: env!("CARGO_PKG_VERSION").to_string(),
        graph: Some(graph),
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: OPSET_VERSION,
        }],
        ..Default::default()
    })
}

/// Emits one Conv → BatchNormalization → MaxPool stage and its
/// initializers; returns the name of the stage output.
fn push_stage(
    graph: &mut GraphProto,
    stage: &Stage,
    stage_no: usize,
    conv_idx: usize,
    norm_idx: usize,
    input: &str,
) -> Result<String, EmbedNetError> {
    let conv_w = format!("layers.{conv_idx}.weight");
    let conv_b = format!("layers.{conv_idx}.bias");
    graph
        .initializer
        .push(f32_initializer(&conv_w, stage.conv.weight())?);
    let bias = stage
        .conv
        .bias()
        .ok_or_else(|| EmbedNetError::Export(format!("conv {conv_idx} has no bias")))?;
    graph.initializer.push(f32_initializer(&conv_b, bias)?);

    let conv_out = format!("conv{stage_no}");
    graph.node.push(NodeProto {
        op_type: "Conv".to_string(),
        name: format!("stage{stage_no}_conv"),
        input: vec![input.to_string(), conv_w, conv_b],
        output: vec![conv_out.clone()],
        attribute: vec![
            ints_attr("kernel_shape", &[stage.kernel_size as i64]),
            ints_attr("strides", &[stage.stride as i64]),
        ],
        ..Default::default()
    });

    let prefix = format!("layers.{norm_idx}");
    let norm_inputs = push_norm_initializers(graph, &prefix, &stage.norm)?;
    let norm_out = format!("norm{stage_no}");
    let mut inputs = vec![conv_out];
    inputs.extend(norm_inputs);
    graph.node.push(NodeProto {
        op_type: "BatchNormalization".to_string(),
        name: format!("stage{stage_no}_norm"),
        input: inputs,
        output: vec![norm_out.clone()],
        attribute: vec![float_attr("epsilon", stage.norm.eps() as f32)],
        ..Default::default()
    });

    let pool_out = format!("pool{stage_no}");
    graph.node.push(NodeProto {
        op_type: "MaxPool".to_string(),
        name: format!("stage{stage_no}_pool"),
        input: vec![norm_out],
        output: vec![pool_out.clone()],
        attribute: vec![
            ints_attr("kernel_shape", &[crate::model::POOL as i64]),
            ints_attr("strides", &[crate::model::POOL as i64]),
        ],
        ..Default::default()
    });
    Ok(pool_out)
}

/// Pushes scale/bias/mean/var initializers for one batch norm and
/// returns their names in BatchNormalization input order.
fn push_norm_initializers(
    graph: &mut GraphProto,
    prefix: &str,
    norm: &BatchNorm,
) -> Result<Vec<String>, EmbedNetError> {
    let (weight, bias) = norm
        .weight_and_bias()
        .ok_or_else(|| EmbedNetError::Export(format!("{prefix} has no affine parameters")))?;
    let named = [
        (format!("{prefix}.weight"), weight),
        (format!("{prefix}.bias"), bias),
        (format!("{prefix}.running_mean"), norm.running_mean()),
        (format!("{prefix}.running_var"), norm.running_var()),
    ];
    let mut names = Vec::with_capacity(named.len());
    for (name, tensor) in named {
        graph.initializer.push(f32_initializer(&name, tensor)?);
        names.push(name);
    }
    Ok(names)
}

/// Raw little-endian f32 initializer.
fn f32_initializer(name: &str, tensor: &Tensor) -> Result<TensorProto, EmbedNetError> {
    let values = tensor.contiguous()?.flatten_all()?.to_vec1::<f32>()?;
    let mut raw_data = Vec::with_capacity(values.len() * 4);
    for value in values {
        raw_data.extend_from_slice(&value.to_le_bytes());
    }
    Ok(TensorProto {
        dims: tensor.dims().iter().map(|&d| d as i64).collect(),
        data_type: DataType::Float as i32,
        raw_data,
        name: name.to_string(),
        ..Default::default()
    })
}

fn tensor_value_info(name: &str, dims: &[i64]) -> ValueInfoProto {
    ValueInfoProto {
        name: name.to_string(),
        r#type: Some(TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: DataType::Float as i32,
                shape: Some(TensorShapeProto {
                    dim: dims
                        .iter()
                        .map(|&d| Dimension {
                            value: Some(dimension::Value::DimValue(d)),
                            ..Default::default()
                        })
                        .collect(),
                }),
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn ints_attr(name: &str, values: &[i64]) -> AttributeProto {
    AttributeProto {
        name: name.to_string(),
        r#type: AttributeType::Ints as i32,
        ints: values.to_vec(),
        ..Default::default()
    }
}

fn float_attr(name: &str, value: f32) -> AttributeProto {
    AttributeProto {
        name: name.to_string(),
        r#type: AttributeType::Float as i32,
        f: value,
        ..Default::default()
    }
}
