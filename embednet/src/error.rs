use thiserror::Error;

/// Error type for model loading and export operations.
#[derive(Error, Debug)]
pub enum EmbedNetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tensor error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("unsupported weights format: {0}")]
    UnsupportedWeights(String),

    #[error("export error: {0}")]
    Export(String),
}
