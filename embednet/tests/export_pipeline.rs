use candle_core::{DType, Device, Module};
use candle_nn::{VarBuilder, VarMap};
use prost::Message;

use grainlab_embednet::onnx::proto::ModelProto;
use grainlab_embednet::{EmbedNet, EmbedNetConfig, dump, exporter};

/// Writes a randomly initialized checkpoint and returns its path.
fn write_checkpoint(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("test_model.safetensors");
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    EmbedNet::new(EmbedNetConfig::default(), vb).expect("build model");
    varmap.save(&path).expect("save checkpoint");
    path
}

#[test]
fn export_writes_all_three_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let weights = write_checkpoint(dir.path());

    let artifacts = exporter::run(&weights, dir.path(), 42).unwrap();

    assert_eq!(artifacts.onnx, dir.path().join("test_model.onnx"));
    assert!(artifacts.onnx.exists());
    assert!(artifacts.input_dump.exists());
    assert!(artifacts.output_dump.exists());
    assert_eq!(artifacts.output_shape, vec![1, 1, 100]);

    // input: 1 x 2 x 2400 f32, output: 1 x 1 x 100 f32
    assert_eq!(
        std::fs::metadata(&artifacts.input_dump).unwrap().len(),
        2 * 2400 * 4
    );
    assert_eq!(std::fs::metadata(&artifacts.output_dump).unwrap().len(), 100 * 4);
}

#[test]
fn export_is_reproducible_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let weights = write_checkpoint(dir.path());

    let first = exporter::run(&weights, dir.path(), 42).unwrap();
    let onnx_a = std::fs::read(&first.onnx).unwrap();
    let input_a = std::fs::read(&first.input_dump).unwrap();
    let output_a = std::fs::read(&first.output_dump).unwrap();

    let second = exporter::run(&weights, dir.path(), 42).unwrap();
    assert_eq!(std::fs::read(&second.onnx).unwrap(), onnx_a);
    assert_eq!(std::fs::read(&second.input_dump).unwrap(), input_a);
    assert_eq!(std::fs::read(&second.output_dump).unwrap(), output_a);
}

#[test]
fn different_seed_changes_the_dumps() {
    let dir = tempfile::tempdir().unwrap();
    let weights = write_checkpoint(dir.path());

    let first = exporter::run(&weights, dir.path(), 1).unwrap();
    let input_a = std::fs::read(&first.input_dump).unwrap();

    let second = exporter::run(&weights, dir.path(), 2).unwrap();
    assert_ne!(std::fs::read(&second.input_dump).unwrap(), input_a);
}

#[test]
fn output_dump_matches_an_in_process_forward_pass() {
    let dir = tempfile::tempdir().unwrap();
    let weights = write_checkpoint(dir.path());

    let artifacts = exporter::run(&weights, dir.path(), 42).unwrap();
    let dumped = dump::read_raw_f32(&artifacts.output_dump).unwrap();

    let device = Device::Cpu;
    let cfg = EmbedNetConfig::default();
    let vb = grainlab_embednet::weights::load(&weights, &device).unwrap();
    let model = EmbedNet::new(cfg, vb).unwrap();
    let input = dump::fixed_input(&cfg, 42, &device).unwrap();
    let expected = model
        .forward(&input)
        .unwrap()
        .flatten_all()
        .unwrap()
        .to_vec1::<f32>()
        .unwrap();

    assert_eq!(dumped, expected);
}

#[test]
fn exported_onnx_initializers_match_the_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let weights = write_checkpoint(dir.path());

    let artifacts = exporter::run(&weights, dir.path(), 42).unwrap();
    let bytes = std::fs::read(&artifacts.onnx).unwrap();
    let proto = ModelProto::decode(bytes.as_slice()).unwrap();
    let graph = proto.graph.unwrap();

    // Spot-check against the checkpoint itself: first conv weight.
    let init = graph
        .initializer
        .iter()
        .find(|t| t.name == "layers.0.weight")
        .expect("layers.0.weight initializer");
    assert_eq!(init.dims, vec![200, 2, 80]);

    let device = Device::Cpu;
    let expected: Vec<u8> = {
        let data = std::fs::read(&weights).unwrap();
        let vb = VarBuilder::from_buffered_safetensors(data, DType::F32, &device).unwrap();
        let tensor = vb
            .get((200, 2, 80), "layers.0.weight")
            .expect("checkpoint tensor");
        tensor
            .flatten_all()
            .unwrap()
            .to_vec1::<f32>()
            .unwrap()
            .into_iter()
            .flat_map(|v| v.to_le_bytes())
            .collect()
    };
    assert_eq!(init.raw_data, expected);
}
