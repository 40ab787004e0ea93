//! Audio processing utilities for the grainlab tools.
//!
//! This crate provides the audio side of the tooling:
//!
//! - `wav`: reading and writing WAV files as per-channel `f32` buffers
//! - `subtype`: sample subtypes and their quantization policies
//! - `resample`: offline FFT-based sample rate conversion
//! - `variants`: batch generation of resampled/requantized file variants
//!
//! # Example
//!
//! ```no_run
//! use grainlab_audio::{variants, Subtype};
//! use std::path::Path;
//!
//! let report = variants::generate(
//!     Path::new("fingertips.wav"),
//!     Path::new("."),
//!     &variants::SAMPLE_RATES,
//!     &Subtype::DEFAULT_SET,
//! )?;
//! println!("{} files written", report.written.len());
//! # Ok::<(), grainlab_audio::AudioError>(())
//! ```

pub mod resample;
pub mod subtype;
pub mod variants;
pub mod wav;

mod error;

pub use error::AudioError;
pub use subtype::Subtype;
