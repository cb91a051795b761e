//! Instrument-to-sample resolution.

use alloc::collections::BTreeMap;
use gb_ir::{InstrumentRef, SampleKey};

/// Pre-populated map from instrument ids to sounds already loaded on the sink.
///
/// Filled during the pre-load phase; the scheduling pass only performs
/// lookups, so a missing entry is a skip, never a fetch.
#[derive(Clone, Debug, Default)]
pub struct SampleCache {
    entries: BTreeMap<InstrumentRef, SampleKey>,
}

impl SampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `instrument` is playable as `key`. Returns the previous key, if any.
    pub fn insert(&mut self, instrument: InstrumentRef, key: SampleKey) -> Option<SampleKey> {
        self.entries.insert(instrument, key)
    }

    /// Look up the sound for `instrument`.
    pub fn resolve(&self, instrument: &InstrumentRef) -> Option<SampleKey> {
        self.entries.get(instrument).copied()
    }

    pub fn contains(&self, instrument: &InstrumentRef) -> bool {
        self.entries.contains_key(instrument)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
