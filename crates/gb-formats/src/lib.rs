//! File formats for the groovebox sequencer.
//!
//! Decodes WAV samples for the pre-load phase, encodes rendered output as
//! WAV, and reads/writes JSON session files.

mod error;
mod session;
mod wav_format;

pub use error::FormatError;
pub use session::{load_session, load_session_file, save_session, Session};
pub use wav_format::{frames_to_wav, load_wav, load_wav_file, write_wav};
