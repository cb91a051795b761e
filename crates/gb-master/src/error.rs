//! Controller error type.

use gb_audio::AudioError;
use gb_engine::EngineError;
use gb_formats::FormatError;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The control thread could not be started
    #[error("failed to spawn control thread: {0}")]
    Spawn(std::io::Error),
    /// The control thread exited
    #[error("control thread is gone")]
    Disconnected,
}
