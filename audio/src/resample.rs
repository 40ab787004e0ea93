//! Offline FFT-based sample rate conversion.
//!
//! Converts whole per-channel buffers in one call. The FFT resampler
//! processes fixed-size chunks and introduces a fixed output delay; the
//! input is zero-padded past its end until the delayed tail has been
//! produced, then the output is trimmed to exactly
//! `ceil(len * to_rate / from_rate)` frames.

use rubato::{FftFixedInOut, Resampler};

use crate::AudioError;

/// Frames per processing block.
const CHUNK_FRAMES: usize = 1024;

/// Resamples per-channel audio from `from_rate` to `to_rate`.
///
/// Same-rate input is returned unchanged. All channels must have the
/// same length.
pub fn resample(
    channels: &[Vec<f32>],
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<Vec<f32>>, AudioError> {
    if channels.is_empty() {
        return Err(AudioError::NoChannels);
    }
    let input_len = channels[0].len();
    if channels.iter().any(|ch| ch.len() != input_len) {
        return Err(AudioError::ChannelLengthMismatch);
    }
    if from_rate == to_rate || input_len == 0 {
        return Ok(channels.to_vec());
    }

    let nbr_channels = channels.len();
    let mut resampler = FftFixedInOut::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_FRAMES,
        nbr_channels,
    )?;
    let delay = resampler.output_delay();
    let expected =
        (input_len as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize;

    let mut out: Vec<Vec<f32>> = (0..nbr_channels)
        .map(|_| Vec::with_capacity(delay + expected + CHUNK_FRAMES))
        .collect();
    let mut chunk: Vec<Vec<f32>> = vec![Vec::new(); nbr_channels];
    let mut pos = 0usize;

    while out[0].len() < delay + expected {
        let need = resampler.input_frames_next();
        for (dst, src) in chunk.iter_mut().zip(channels) {
            dst.clear();
            dst.resize(need, 0.0);
            if pos < input_len {
                let take = need.min(input_len - pos);
                dst[..take].copy_from_slice(&src[pos..pos + take]);
            }
        }
        pos += need;

        let produced = resampler.process(&chunk, None)?;
        for (dst, ch) in out.iter_mut().zip(produced) {
            dst.extend_from_slice(&ch);
        }
    }

    Ok(out
        .into_iter()
        .map(|ch| ch[delay..delay + expected].to_vec())
        .collect())
}
