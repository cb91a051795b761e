//! Audio sinks for the groovebox sequencer.
//!
//! All sinks share one software renderer; they differ in who drives its
//! clock: the sound card ([`CpalSink`]) or the caller ([`OfflineSink`]).

mod cpal_sink;
mod error;
pub mod mixer;
mod offline;
mod renderer;

pub use cpal_sink::CpalSink;
pub use error::AudioError;
pub use offline::OfflineSink;
pub use renderer::{
    software_sink, RenderConfig, Renderer, SampleLoader, SoftwareSink, MAX_RENDER_VOICES,
};
