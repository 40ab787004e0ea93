//! WAV file reading and writing.
//!
//! Audio is exchanged with the rest of the crate as per-channel `f32`
//! buffers in [-1, 1]; quantization to the on-disk encoding happens here
//! at write time, per [`Subtype`].

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::subtype::{quantize_i16, quantize_i24, quantize_i32, quantize_u8};
use crate::{AudioError, Subtype};

/// Reads a WAV file into per-channel samples in [-1, 1] plus the file's
/// sample rate. Integer samples are scaled by their full-scale value;
/// float samples pass through unchanged.
pub fn read_wav(path: impl AsRef<Path>) -> Result<(Vec<Vec<f32>>, u32), AudioError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AudioError::NoChannels);
    }
    let mut samples = vec![Vec::new(); channels];

    match spec.sample_format {
        SampleFormat::Float => {
            for (idx, sample) in reader.samples::<f32>().enumerate() {
                samples[idx % channels].push(sample?);
            }
        }
        SampleFormat::Int => {
            let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            for (idx, sample) in reader.samples::<i32>().enumerate() {
                samples[idx % channels].push(sample? as f32 / max);
            }
        }
    }

    Ok((samples, spec.sample_rate))
}

/// Writes per-channel samples as a WAV file with the given subtype,
/// interleaving frames and quantizing each sample.
///
/// Returns [`AudioError::UnsupportedSubtype`] when the container cannot
/// represent the subtype.
pub fn write_wav(
    path: impl AsRef<Path>,
    channels: &[Vec<f32>],
    sample_rate: u32,
    subtype: Subtype,
) -> Result<(), AudioError> {
    if channels.is_empty() {
        return Err(AudioError::NoChannels);
    }
    let frames = channels[0].len();
    if channels.iter().any(|ch| ch.len() != frames) {
        return Err(AudioError::ChannelLengthMismatch);
    }
    let spec = subtype
        .wav_spec(channels.len() as u16, sample_rate)
        .ok_or(AudioError::UnsupportedSubtype { subtype })?;

    let mut writer = WavWriter::create(path, spec)?;
    for frame in 0..frames {
        for channel in channels {
            let x = channel[frame];
            match subtype {
                // WAV stores 8-bit PCM unsigned; the writer takes i8,
                // offset by 128.
                Subtype::PcmU8 => {
                    writer.write_sample((quantize_u8(x) as i16 - 128) as i8)?
                }
                Subtype::Pcm16 => writer.write_sample(quantize_i16(x))?,
                Subtype::Pcm24 => writer.write_sample(quantize_i24(x))?,
                Subtype::Pcm32 => writer.write_sample(quantize_i32(x))?,
                Subtype::Float => writer.write_sample(x)?,
                Subtype::Float64 => {
                    return Err(AudioError::UnsupportedSubtype { subtype });
                }
            }
        }
    }
    writer.finalize()?;
    Ok(())
}
