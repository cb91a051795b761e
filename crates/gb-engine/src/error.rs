//! Engine error type.

use gb_ir::PatternError;

/// Errors returned by scheduler commands. A failed command leaves the
/// scheduler state unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("tempo {0} BPM is outside 20..=260")]
    InvalidTempo(f64),
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),
    #[error("no pattern loaded")]
    NoPattern,
}
