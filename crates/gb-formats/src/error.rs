//! Format error type.

/// Error type for loading and saving files.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Malformed or unsupported WAV data
    #[error("wav: {0}")]
    Wav(#[from] hound::Error),
    /// More channels than a stereo sample can hold
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u16),
    /// Session JSON did not parse
    #[error("session: {0}")]
    Json(#[from] serde_json::Error),
    /// Session parsed but cannot be played
    #[error("session: {0}")]
    InvalidPattern(#[from] gb_ir::PatternError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
