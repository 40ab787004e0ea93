use std::process::Command;

use grainlab_audio::{Subtype, wav};

fn write_source(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("fingertips.wav");
    let tone: Vec<f32> = (0..4096)
        .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 44100.0).sin() * 0.5)
        .collect();
    wav::write_wav(&path, &[tone], 44100, Subtype::Pcm16).expect("write source");
    path
}

#[test]
fn wavgen_writes_the_default_matrix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_source(dir.path());

    let status = Command::new(env!("CARGO_BIN_EXE_wavgen"))
        .arg(&input)
        .status()
        .expect("run wavgen");
    assert!(status.success());

    let mut count = 0;
    for rate in [44100u32, 48000, 96000] {
        for tag in ["PCM_U8", "PCM_16", "PCM_24", "PCM_32", "FLOAT"] {
            let path = dir.path().join(format!("fingertips_{rate}_{tag}.wav"));
            assert!(path.exists(), "missing {}", path.display());
            count += 1;
        }
    }
    assert_eq!(count, 15);
}

#[test]
fn wavgen_skips_unsupported_subtypes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_source(dir.path());

    let status = Command::new(env!("CARGO_BIN_EXE_wavgen"))
        .args(["--rates", "44100", "--subtypes", "DOUBLE,PCM_16"])
        .arg(&input)
        .status()
        .expect("run wavgen");
    assert!(status.success());

    assert!(dir.path().join("fingertips_44100_PCM_16.wav").exists());
    assert!(!dir.path().join("fingertips_44100_DOUBLE.wav").exists());
}

#[test]
fn wavgen_fails_on_missing_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_wavgen"))
        .arg(dir.path().join("missing.wav"))
        .status()
        .expect("run wavgen");
    assert!(!status.success());
}
