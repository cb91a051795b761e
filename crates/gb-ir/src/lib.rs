//! Core data types for the groovebox sequencer.
//!
//! This crate defines the time base, patterns, kits and decoded samples
//! shared by the engine, the audio sinks and the file loaders.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod analysis;
mod event;
mod frame;
mod kit;
mod pattern;
mod sample;
mod time_base;

pub use analysis::{analyze_pattern, PatternFeatures};
pub use event::{BassNote, DrumHit, NoteEvent, TrackEvent};
pub use frame::Frame;
pub use kit::{
    bank_relative, instrument_ref, BassTone, InstrumentRef, Kit, PadAssignment, PadBank,
    NUM_BANKS, NUM_PADS, PADS_PER_BANK,
};
pub use pattern::{EventError, Pattern, PatternError, TimeSignature};
pub use sample::{Sample, SampleData, SampleKey};
pub use time_base::{
    seconds_per_tick, tempo_in_range, ticks_per_measure, Position, Tick, MAX_BPM, MIN_BPM, PPQN,
};
