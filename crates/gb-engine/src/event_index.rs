//! Tick-to-events index built from a pattern.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use gb_ir::{NoteEvent, Pattern, Tick, TrackEvent};

/// Events of a pattern grouped by the tick they fire at.
///
/// Within a tick, drum events come first in track order, then bass events
/// in track order. Notes outside the loop or with an unusable velocity are
/// left out with a warning. The index is rebuilt wholesale whenever the pattern
/// changes and is read-only while the scheduler runs.
#[derive(Clone, Debug, Default)]
pub struct EventIndex {
    by_tick: BTreeMap<Tick, Vec<TrackEvent>>,
    total_ticks: Tick,
    len: usize,
}

impl EventIndex {
    /// Build the index for `pattern`.
    pub fn build(pattern: &Pattern) -> Self {
        let mut index = Self {
            by_tick: BTreeMap::new(),
            total_ticks: pattern.total_ticks(),
            len: 0,
        };
        index.insert_track(pattern, "drum", &pattern.drum_track, TrackEvent::drum);
        index.insert_track(pattern, "bass", &pattern.bass_track, TrackEvent::bass);
        index
    }

    fn insert_track(
        &mut self,
        pattern: &Pattern,
        track: &str,
        notes: &[NoteEvent],
        tag: fn(&NoteEvent) -> TrackEvent,
    ) {
        for note in notes {
            if let Err(e) = pattern.check_event(note) {
                log::warn!("pattern '{}': skipping {} note: {}", pattern.name, track, e);
                continue;
            }
            self.by_tick.entry(note.tick).or_default().push(tag(note));
            self.len += 1;
        }
    }

    /// Events firing at `tick`, in firing order. Empty if none.
    pub fn events_at(&self, tick: Tick) -> &[TrackEvent] {
        self.by_tick.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Loop length of the pattern this index was built from.
    pub fn total_ticks(&self) -> Tick {
        self.total_ticks
    }

    /// Total number of indexed events.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ticks that carry at least one event, ascending.
    pub fn ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        self.by_tick.keys().copied()
    }
}
