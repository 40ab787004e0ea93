//! Sample subtypes and their quantization policies.
//!
//! A subtype identifies how samples are encoded inside the container:
//! unsigned 8-bit PCM, signed 16/24/32-bit PCM, or IEEE float. Floating
//! point samples in [-1, 1] are converted to each integer encoding by a
//! fixed linear scaling, clamped to the representable range and truncated
//! toward zero.

use std::fmt;
use std::str::FromStr;

use hound::{SampleFormat, WavSpec};

use crate::AudioError;

/// Sample encoding inside a WAV container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtype {
    /// Unsigned 8-bit PCM.
    PcmU8,
    /// Signed 16-bit PCM.
    Pcm16,
    /// Signed 24-bit PCM.
    Pcm24,
    /// Signed 32-bit PCM.
    Pcm32,
    /// 32-bit IEEE float.
    Float,
    /// 64-bit IEEE float. Requestable, but the WAV encoder cannot
    /// represent it; writes are skipped with a diagnostic.
    Float64,
}

impl Subtype {
    /// The subtypes attempted by a default variant run.
    pub const DEFAULT_SET: [Subtype; 5] = [
        Subtype::PcmU8,
        Subtype::Pcm16,
        Subtype::Pcm24,
        Subtype::Pcm32,
        Subtype::Float,
    ];

    /// Tag used in output file names.
    pub fn tag(self) -> &'static str {
        match self {
            Subtype::PcmU8 => "PCM_U8",
            Subtype::Pcm16 => "PCM_16",
            Subtype::Pcm24 => "PCM_24",
            Subtype::Pcm32 => "PCM_32",
            Subtype::Float => "FLOAT",
            Subtype::Float64 => "DOUBLE",
        }
    }

    /// Returns the WAV spec for this subtype, or `None` if the encoder
    /// cannot represent it.
    pub fn wav_spec(self, channels: u16, sample_rate: u32) -> Option<WavSpec> {
        let (bits_per_sample, sample_format) = match self {
            Subtype::PcmU8 => (8, SampleFormat::Int),
            Subtype::Pcm16 => (16, SampleFormat::Int),
            Subtype::Pcm24 => (24, SampleFormat::Int),
            Subtype::Pcm32 => (32, SampleFormat::Int),
            Subtype::Float => (32, SampleFormat::Float),
            Subtype::Float64 => return None,
        };
        Some(WavSpec {
            channels,
            sample_rate,
            bits_per_sample,
            sample_format,
        })
    }

    /// Whether a WAV container can hold this subtype.
    pub fn supported_by_wav(self) -> bool {
        self.wav_spec(1, 44100).is_some()
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Subtype {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PCM_U8" => Ok(Subtype::PcmU8),
            "PCM_16" => Ok(Subtype::Pcm16),
            "PCM_24" => Ok(Subtype::Pcm24),
            "PCM_32" => Ok(Subtype::Pcm32),
            "FLOAT" => Ok(Subtype::Float),
            "DOUBLE" => Ok(Subtype::Float64),
            _ => Err(AudioError::UnknownSubtype(s.to_string())),
        }
    }
}

/// Maps [-1, 1] onto [0, 255]: -1.0 to 0, 1.0 to 255, out-of-range clamps.
pub fn quantize_u8(x: f32) -> u8 {
    ((x + 1.0) * 127.5).clamp(0.0, 255.0) as u8
}

/// Maps [-1, 1] onto the signed 16-bit range: 1.0 clamps to 32767,
/// -1.0 to -32768.
pub fn quantize_i16(x: f32) -> i16 {
    (x * 32768.0).clamp(-32768.0, 32767.0) as i16
}

/// Maps [-1, 1] onto the signed 24-bit range.
pub fn quantize_i24(x: f32) -> i32 {
    (x * 8_388_608.0).clamp(-8_388_608.0, 8_388_607.0) as i32
}

/// Maps [-1, 1] onto the signed 32-bit range. Scaling runs in f64; the
/// 32-bit bounds are not exactly representable in f32.
pub fn quantize_i32(x: f32) -> i32 {
    ((x as f64) * 2_147_483_648.0).clamp(-2_147_483_648.0, 2_147_483_647.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_i16_full_scale() {
        assert_eq!(quantize_i16(1.0), 32767);
        assert_eq!(quantize_i16(-1.0), -32768);
        assert_eq!(quantize_i16(0.0), 0);
    }

    #[test]
    fn quantize_i16_clamps_out_of_range() {
        assert_eq!(quantize_i16(2.5), 32767);
        assert_eq!(quantize_i16(-3.0), -32768);
    }

    #[test]
    fn quantize_u8_full_scale() {
        assert_eq!(quantize_u8(-1.0), 0);
        assert_eq!(quantize_u8(1.0), 255);
        assert_eq!(quantize_u8(0.0), 127);
        assert_eq!(quantize_u8(10.0), 255);
        assert_eq!(quantize_u8(-10.0), 0);
    }

    #[test]
    fn quantize_i24_bounds() {
        assert_eq!(quantize_i24(1.0), 8_388_607);
        assert_eq!(quantize_i24(-1.0), -8_388_608);
        assert_eq!(quantize_i24(0.5), 4_194_304);
    }

    #[test]
    fn quantize_i32_bounds() {
        assert_eq!(quantize_i32(1.0), i32::MAX);
        assert_eq!(quantize_i32(-1.0), i32::MIN);
        assert_eq!(quantize_i32(0.5), 1_073_741_824);
    }

    #[test]
    fn wav_support() {
        for subtype in Subtype::DEFAULT_SET {
            assert!(subtype.supported_by_wav(), "{subtype} should be writable");
        }
        assert!(!Subtype::Float64.supported_by_wav());
    }

    #[test]
    fn wav_spec_bits() {
        let spec = Subtype::Pcm24.wav_spec(2, 48000).unwrap();
        assert_eq!(spec.bits_per_sample, 24);
        assert_eq!(spec.sample_format, SampleFormat::Int);
        assert_eq!(spec.channels, 2);

        let spec = Subtype::Float.wav_spec(1, 44100).unwrap();
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, SampleFormat::Float);
    }

    #[test]
    fn parse_tags() {
        assert_eq!("PCM_16".parse::<Subtype>().unwrap(), Subtype::Pcm16);
        assert_eq!("float".parse::<Subtype>().unwrap(), Subtype::Float);
        assert_eq!("double".parse::<Subtype>().unwrap(), Subtype::Float64);
        assert!("PCM_12".parse::<Subtype>().is_err());
    }

    #[test]
    fn tag_round_trip() {
        for subtype in [
            Subtype::PcmU8,
            Subtype::Pcm16,
            Subtype::Pcm24,
            Subtype::Pcm32,
            Subtype::Float,
            Subtype::Float64,
        ] {
            assert_eq!(subtype.tag().parse::<Subtype>().unwrap(), subtype);
        }
    }
}
