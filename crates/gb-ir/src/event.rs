//! Note events as stored in patterns and as seen by the scheduler.

use serde::{Deserialize, Serialize};

use crate::time_base::Tick;

/// A note in one of a pattern's tracks.
///
/// `pad_index` is interpreted by the track the event lives in: a kit pad for
/// the drum track, a semitone offset from the bass tone's root for the bass
/// track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// When the note fires
    pub tick: Tick,
    /// Pad index (drums) or semitone offset (bass)
    pub pad_index: i16,
    /// Velocity 1-127
    pub velocity: u8,
    /// Length in ticks (bass notes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Tick>,
}

impl NoteEvent {
    /// Create an event with no duration.
    pub const fn new(tick: Tick, pad_index: i16, velocity: u8) -> Self {
        Self { tick, pad_index, velocity, duration: None }
    }

    /// Create an event that stops after `duration` ticks.
    pub const fn with_duration(tick: Tick, pad_index: i16, velocity: u8, duration: Tick) -> Self {
        Self { tick, pad_index, velocity, duration: Some(duration) }
    }
}

/// A drum hit on a kit pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrumHit {
    /// Kit pad index (0-59 for a full kit)
    pub pad: i16,
    /// Velocity 1-127
    pub velocity: u8,
}

/// A note on the kit's bass tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BassNote {
    /// Semitone offset from the bass tone's root
    pub semitones: i16,
    /// Velocity 1-127
    pub velocity: u8,
    /// Length in ticks; `None` lets the sample ring out
    pub duration: Option<Tick>,
}

/// An event tagged with the track it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackEvent {
    Drum(DrumHit),
    Bass(BassNote),
}

impl TrackEvent {
    /// Tag a drum-track note.
    pub fn drum(event: &NoteEvent) -> Self {
        TrackEvent::Drum(DrumHit {
            pad: event.pad_index,
            velocity: event.velocity,
        })
    }

    /// Tag a bass-track note.
    pub fn bass(event: &NoteEvent) -> Self {
        TrackEvent::Bass(BassNote {
            semitones: event.pad_index,
            velocity: event.velocity,
            duration: event.duration,
        })
    }

    /// Velocity of the underlying note.
    pub fn velocity(&self) -> u8 {
        match self {
            TrackEvent::Drum(hit) => hit.velocity,
            TrackEvent::Bass(note) => note.velocity,
        }
    }

    pub fn is_bass(&self) -> bool {
        matches!(self, TrackEvent::Bass(_))
    }
}
