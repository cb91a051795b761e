//! Scheduling engine for the groovebox sequencer.
//!
//! Turns a pattern's tick timeline into voices timestamped on an audio
//! sink's clock, enforcing polyphony and mute groups on the way.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod config;
mod error;
mod event_index;
pub mod params;
mod sample_cache;
mod scheduler;
mod sink;
mod voice_allocator;

#[cfg(test)]
mod testing;

pub use config::{EngineConfig, MAX_POLYPHONY, SCHEDULE_AHEAD_SECONDS, WAKE_INTERVAL};
pub use error::EngineError;
pub use event_index::EventIndex;
pub use sample_cache::SampleCache;
pub use scheduler::{Scheduler, TransportState};
pub use sink::{AudioSink, Bus, NullObserver, TransportObserver, VoiceHandle, VoiceRequest};
pub use voice_allocator::{NewVoice, VoiceAllocator, VoiceSource};
