//! Batch generation of resampled/requantized WAV variants.
//!
//! One source file fans out into a matrix of (sample rate, subtype)
//! outputs named `<stem>_<rate>_<tag>.wav`. Combinations the container
//! cannot represent are logged and skipped, never raised.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{AudioError, Subtype, resample, wav};

/// Sample rates attempted by a default variant run.
pub const SAMPLE_RATES: [u32; 3] = [44100, 48000, 96000];

/// Outcome of one variant run.
#[derive(Debug, Default)]
pub struct VariantReport {
    /// Files written, in attempt order.
    pub written: Vec<PathBuf>,
    /// (rate, subtype) combinations the container rejected.
    pub skipped: Vec<(u32, Subtype)>,
    /// Total write attempts, supported or not.
    pub attempts: usize,
}

/// Loads `input`, resamples it to each rate and writes one file per
/// (rate, subtype) combination into `out_dir`.
pub fn generate(
    input: &Path,
    out_dir: &Path,
    rates: &[u32],
    subtypes: &[Subtype],
) -> Result<VariantReport, AudioError> {
    let (channels, src_rate) = wav::read_wav(input)?;
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("variant");

    let mut report = VariantReport::default();
    for &rate in rates {
        let resampled = resample::resample(&channels, src_rate, rate)?;
        for &subtype in subtypes {
            report.attempts += 1;
            if !subtype.supported_by_wav() {
                warn!("invalid format: sample_rate = {rate}, subtype = {subtype}");
                report.skipped.push((rate, subtype));
                continue;
            }
            let path = out_dir.join(format!("{stem}_{rate}_{subtype}.wav"));
            info!("writing file {}", path.display());
            wav::write_wav(&path, &resampled, rate, subtype)?;
            report.written.push(path);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_source(dir: &Path) -> PathBuf {
        let path = dir.join("fingertips.wav");
        let tone: Vec<f32> = (0..2048)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin() * 0.8)
            .collect();
        wav::write_wav(&path, &[tone.clone(), tone], 44100, Subtype::Float).unwrap();
        path
    }

    #[test]
    fn default_matrix_writes_fifteen_files() {
        let dir = tempdir().unwrap();
        let input = write_source(dir.path());

        let report =
            generate(&input, dir.path(), &SAMPLE_RATES, &Subtype::DEFAULT_SET).unwrap();

        assert_eq!(report.attempts, 15);
        assert_eq!(report.written.len(), 15);
        assert!(report.skipped.is_empty());
        for path in &report.written {
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    #[test]
    fn output_names_follow_rate_and_tag() {
        let dir = tempdir().unwrap();
        let input = write_source(dir.path());

        generate(&input, dir.path(), &[48000], &[Subtype::Pcm24]).unwrap();

        assert!(dir.path().join("fingertips_48000_PCM_24.wav").exists());
    }

    #[test]
    fn written_variant_has_target_rate() {
        let dir = tempdir().unwrap();
        let input = write_source(dir.path());

        generate(&input, dir.path(), &[96000], &[Subtype::Pcm16]).unwrap();

        let (channels, rate) =
            wav::read_wav(dir.path().join("fingertips_96000_PCM_16.wav")).unwrap();
        assert_eq!(rate, 96000);
        assert_eq!(channels.len(), 2);
        // ceil(2048 * 96000 / 44100)
        assert_eq!(channels[0].len(), 4459);
    }

    #[test]
    fn unsupported_subtype_is_skipped_not_raised() {
        let dir = tempdir().unwrap();
        let input = write_source(dir.path());

        let report = generate(&input, dir.path(), &[44100], &[Subtype::Float64]).unwrap();

        assert_eq!(report.attempts, 1);
        assert!(report.written.is_empty());
        assert_eq!(report.skipped, vec![(44100, Subtype::Float64)]);
        assert!(!dir.path().join("fingertips_44100_DOUBLE.wav").exists());
    }

    #[test]
    fn skip_does_not_abort_remaining_attempts() {
        let dir = tempdir().unwrap();
        let input = write_source(dir.path());

        let report = generate(
            &input,
            dir.path(),
            &[44100],
            &[Subtype::Float64, Subtype::Pcm16],
        )
        .unwrap();

        assert_eq!(report.attempts, 2);
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.skipped.len(), 1);
    }
}
