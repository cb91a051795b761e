//! Tick-based time representation.
//!
//! All sequencing happens on an integer tick axis at a fixed resolution of
//! [`PPQN`] ticks per quarter note. Conversion to seconds only happens at the
//! scheduling boundary, via [`seconds_per_tick`].

use serde::{Deserialize, Serialize};

/// A position on the pattern timeline, in ticks from the loop start.
pub type Tick = u32;

/// Pulses (ticks) per quarter note.
pub const PPQN: Tick = 96;

/// Slowest accepted tempo in BPM.
pub const MIN_BPM: f64 = 20.0;

/// Fastest accepted tempo in BPM.
pub const MAX_BPM: f64 = 260.0;

/// Duration of one tick in seconds at the given tempo.
///
/// Total for `bpm > 0`; callers keep `bpm` within [`MIN_BPM`]..=[`MAX_BPM`].
#[inline]
pub fn seconds_per_tick(bpm: f64) -> f64 {
    (60.0 / bpm) / PPQN as f64
}

/// Returns true if `bpm` is a tempo the sequencer accepts.
#[inline]
pub fn tempo_in_range(bpm: f64) -> bool {
    (MIN_BPM..=MAX_BPM).contains(&bpm)
}

/// Number of ticks in one measure with `beats_per_measure` quarter-note beats.
#[inline]
pub const fn ticks_per_measure(beats_per_measure: u8) -> Tick {
    beats_per_measure as Tick * PPQN
}

/// Transport position as shown to the user: 1-based measure and beat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Tick cursor within the loop
    pub tick: Tick,
    /// Measure number, starting at 1
    pub measure: u32,
    /// Beat within the measure, starting at 1
    pub beat: u32,
}

impl Position {
    /// The loop start (tick 0 = measure 1, beat 1).
    pub const fn start() -> Self {
        Self { tick: 0, measure: 1, beat: 1 }
    }

    /// Derive measure/beat for `tick` with `ticks_per_measure` ticks per bar.
    pub fn at(tick: Tick, ticks_per_measure: Tick) -> Self {
        if ticks_per_measure == 0 {
            return Self { tick, ..Self::start() };
        }
        let tick_in_measure = tick % ticks_per_measure;
        Self {
            tick,
            measure: tick / ticks_per_measure + 1,
            beat: tick_in_measure / PPQN + 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}
