use thiserror::Error;

use crate::Subtype;

/// Error type for audio operations.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("resampler error: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    #[error("resample error: {0}")]
    Resample(#[from] rubato::ResampleError),

    #[error("subtype {subtype} is not representable in a WAV container")]
    UnsupportedSubtype { subtype: Subtype },

    #[error("unknown subtype: {0}")]
    UnknownSubtype(String),

    #[error("no audio channels")]
    NoChannels,

    #[error("channel length mismatch")]
    ChannelLengthMismatch,
}
