//! Kit types: 60 drum pads in three banks plus one bass tone.

use alloc::vec::Vec;
use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};

/// Identifier of a sampled instrument (e.g. `"kick1"`, `"hihat_open"`).
pub type InstrumentRef = ArrayString<32>;

/// Pads per bank.
pub const PADS_PER_BANK: usize = 20;

/// Number of drum banks in a kit.
pub const NUM_BANKS: usize = 3;

/// Total drum pads in a kit.
pub const NUM_PADS: usize = PADS_PER_BANK * NUM_BANKS;

/// Build an [`InstrumentRef`], truncating ids that do not fit.
pub fn instrument_ref(id: &str) -> InstrumentRef {
    let mut out = InstrumentRef::new();
    for ch in id.chars() {
        if out.try_push(ch).is_err() {
            break;
        }
    }
    out
}

/// The three drum banks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadBank {
    Drum1,
    Drum2,
    Drum3,
}

impl PadBank {
    /// Bank containing kit pad `pad`, if it is a valid pad index.
    pub fn of(pad: usize) -> Option<Self> {
        match pad / PADS_PER_BANK {
            0 => Some(PadBank::Drum1),
            1 => Some(PadBank::Drum2),
            2 => Some(PadBank::Drum3),
            _ => None,
        }
    }
}

/// Position of a kit pad within its bank (0-19).
#[inline]
pub const fn bank_relative(pad: usize) -> u8 {
    (pad % PADS_PER_BANK) as u8
}

/// How one pad plays its instrument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadAssignment {
    /// Sample to play
    pub instrument: InstrumentRef,
    /// Level 0-100
    pub level: u8,
    /// Pan -50 (left) to +50 (right)
    #[serde(default)]
    pub pan: i8,
    /// Coarse pitch in semitones, -50 to +50
    #[serde(default)]
    pub pitch: i8,
    /// Fine pitch in cents, -50 to +50
    #[serde(default)]
    pub pitch_fine: i8,
    /// Pads sharing a group cut each other off
    #[serde(default)]
    pub mute_group: Option<u8>,
    /// Decay 0-127
    #[serde(default = "default_decay")]
    pub decay: u8,
}

fn default_decay() -> u8 {
    127
}

impl PadAssignment {
    /// A centred pad at full level, no pitch offset, no mute group.
    pub fn new(instrument: &str) -> Self {
        Self {
            instrument: instrument_ref(instrument),
            level: 100,
            pan: 0,
            pitch: 0,
            pitch_fine: 0,
            mute_group: None,
            decay: default_decay(),
        }
    }

    pub fn with_mute_group(mut self, group: u8) -> Self {
        self.mute_group = Some(group);
        self
    }

    /// Combined pitch offset in (fractional) semitones.
    pub fn semitones(&self) -> f64 {
        self.pitch as f64 + self.pitch_fine as f64 / 100.0
    }
}

/// The kit's bass instrument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BassTone {
    pub instrument: InstrumentRef,
    /// 1 or 2
    #[serde(default = "default_voice_count")]
    pub voice_count: u8,
}

fn default_voice_count() -> u8 {
    1
}

impl BassTone {
    pub fn new(instrument: &str) -> Self {
        Self {
            instrument: instrument_ref(instrument),
            voice_count: default_voice_count(),
        }
    }
}

/// A complete kit. Read-only while a pattern plays; swapping kits takes
/// effect on the next triggered note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kit {
    #[serde(default)]
    pub name: ArrayString<32>,
    /// Up to [`NUM_PADS`] pads: DRUM1 (0-19), DRUM2 (20-39), DRUM3 (40-59)
    pub pads: Vec<PadAssignment>,
    pub bass_tone: BassTone,
    /// Drum bus level 0-100
    #[serde(default = "default_bus_level")]
    pub drum_level: u8,
    /// Bass level 0-100, applied to every bass note
    #[serde(default = "default_bus_level")]
    pub bass_level: u8,
}

fn default_bus_level() -> u8 {
    80
}

impl Kit {
    /// A kit with no pads assigned.
    pub fn new(name: &str, bass_tone: BassTone) -> Self {
        let mut kit_name = ArrayString::new();
        let _ = kit_name.try_push_str(name);
        Self {
            name: kit_name,
            pads: Vec::new(),
            bass_tone,
            drum_level: default_bus_level(),
            bass_level: default_bus_level(),
        }
    }

    /// Look up a pad by the (signed) index stored in a drum event.
    pub fn pad(&self, index: i16) -> Option<&PadAssignment> {
        let index = usize::try_from(index).ok()?;
        if index >= NUM_PADS {
            return None;
        }
        self.pads.get(index)
    }

    /// Every distinct instrument the kit references, bass tone included.
    pub fn instruments(&self) -> Vec<InstrumentRef> {
        let mut out: Vec<InstrumentRef> = Vec::new();
        let refs = self
            .pads
            .iter()
            .map(|p| p.instrument)
            .chain(core::iter::once(self.bass_tone.instrument));
        for r in refs {
            if !r.is_empty() && !out.contains(&r) {
                out.push(r);
            }
        }
        out
    }
}

impl Default for Kit {
    fn default() -> Self {
        Self::new("", BassTone::new(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_of_pads() {
        assert_eq!(PadBank::of(0), Some(PadBank::Drum1));
        assert_eq!(PadBank::of(19), Some(PadBank::Drum1));
        assert_eq!(PadBank::of(20), Some(PadBank::Drum2));
        assert_eq!(PadBank::of(59), Some(PadBank::Drum3));
        assert_eq!(PadBank::of(60), None);
    }

    #[test]
    fn bank_relative_wraps_every_twenty() {
        assert_eq!(bank_relative(3), 3);
        assert_eq!(bank_relative(23), 3);
        assert_eq!(bank_relative(43), 3);
    }

    #[test]
    fn pad_lookup_rejects_negative_and_out_of_range() {
        let mut kit = Kit::default();
        kit.pads.push(PadAssignment::new("kick1"));
        assert!(kit.pad(0).is_some());
        assert!(kit.pad(-1).is_none());
        assert!(kit.pad(1).is_none());
        assert!(kit.pad(1000).is_none());
    }

    #[test]
    fn semitones_combine_coarse_and_fine() {
        let mut pad = PadAssignment::new("snare1");
        pad.pitch = -2;
        pad.pitch_fine = 50;
        assert!((pad.semitones() - (-1.5)).abs() < 1e-12);
    }

    #[test]
    fn instruments_are_deduplicated() {
        let mut kit = Kit::new("k", BassTone::new("bass_finger"));
        kit.pads.push(PadAssignment::new("kick1"));
        kit.pads.push(PadAssignment::new("kick1"));
        kit.pads.push(PadAssignment::new("snare1"));
        let instruments = kit.instruments();
        let names: Vec<&str> = instruments.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, ["kick1", "snare1", "bass_finger"]);
    }

    #[test]
    fn long_instrument_ids_are_truncated() {
        let r = instrument_ref("a_really_long_instrument_identifier_that_overflows");
        assert_eq!(r.len(), 32);
    }
}
