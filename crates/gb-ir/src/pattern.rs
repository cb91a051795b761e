//! Pattern types: a looping timeline of drum and bass notes.

use alloc::vec::Vec;
use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};

use crate::event::NoteEvent;
use crate::time_base::{tempo_in_range, ticks_per_measure, Position, Tick};

/// Reasons a pattern cannot be played.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern has no measures")]
    NoMeasures,
    #[error("time signature {0}/{1} has no beats")]
    EmptyMeasure(u8, u8),
    #[error("tempo {0} BPM is outside 20..=260")]
    TempoOutOfRange(f64),
}

/// Reasons a single note cannot be played. The note is skipped; the rest of
/// the pattern still plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("tick {tick} lies outside the {total}-tick loop")]
    TickOutOfRange { tick: Tick, total: Tick },
    #[error("velocity {velocity} at tick {tick}, expected 1..=127")]
    VelocityOutOfRange { tick: Tick, velocity: u8 },
}

/// Time signature as (beats per measure, beat unit).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats_per_measure: u8,
    pub beat_unit: u8,
}

impl TimeSignature {
    pub const fn new(beats_per_measure: u8, beat_unit: u8) -> Self {
        Self { beats_per_measure, beat_unit }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// A looping pattern of drum and bass notes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Display name
    #[serde(default)]
    pub name: ArrayString<32>,
    #[serde(default)]
    pub time_signature: TimeSignature,
    /// Loop length in measures (>= 1)
    pub measures: u16,
    /// Tempo in BPM (20-260)
    pub tempo_bpm: f64,
    /// Drum notes; `pad_index` addresses the kit's pads
    #[serde(default)]
    pub drum_track: Vec<NoteEvent>,
    /// Bass notes; `pad_index` is a semitone offset
    #[serde(default)]
    pub bass_track: Vec<NoteEvent>,
}

impl Pattern {
    /// Create an empty pattern.
    pub fn new(name: &str, time_signature: TimeSignature, measures: u16, tempo_bpm: f64) -> Self {
        let mut pattern_name = ArrayString::new();
        let _ = pattern_name.try_push_str(name);
        Self {
            name: pattern_name,
            time_signature,
            measures,
            tempo_bpm,
            drum_track: Vec::new(),
            bass_track: Vec::new(),
        }
    }

    /// Ticks in one measure of this pattern.
    pub fn ticks_per_measure(&self) -> Tick {
        ticks_per_measure(self.time_signature.beats_per_measure)
    }

    /// Loop length in ticks: `measures × beats_per_measure × 96`.
    pub fn total_ticks(&self) -> Tick {
        self.measures as Tick * self.ticks_per_measure()
    }

    /// Measure/beat position of `tick` within this pattern.
    pub fn position_of(&self, tick: Tick) -> Position {
        Position::at(tick, self.ticks_per_measure())
    }

    /// Check that the pattern can be looped at all. Individual notes are
    /// checked separately by [`Pattern::check_event`].
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.measures == 0 {
            return Err(PatternError::NoMeasures);
        }
        let sig = self.time_signature;
        if sig.beats_per_measure == 0 {
            return Err(PatternError::EmptyMeasure(sig.beats_per_measure, sig.beat_unit));
        }
        if !tempo_in_range(self.tempo_bpm) {
            return Err(PatternError::TempoOutOfRange(self.tempo_bpm));
        }
        Ok(())
    }

    /// Check that `event` falls inside the loop with a usable velocity.
    pub fn check_event(&self, event: &NoteEvent) -> Result<(), EventError> {
        let total = self.total_ticks();
        if event.tick >= total {
            return Err(EventError::TickOutOfRange { tick: event.tick, total });
        }
        if !(1..=127).contains(&event.velocity) {
            return Err(EventError::VelocityOutOfRange {
                tick: event.tick,
                velocity: event.velocity,
            });
        }
        Ok(())
    }

    /// Total number of notes across both tracks.
    pub fn event_count(&self) -> usize {
        self.drum_track.len() + self.bass_track.len()
    }
}
