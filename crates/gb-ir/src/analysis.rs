//! Pattern analysis: scans a Pattern against a Kit to report what it uses.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;

use crate::kit::{InstrumentRef, Kit, PadBank};
use crate::pattern::Pattern;
use crate::time_base::seconds_per_tick;

/// Summary of what a pattern plays.
pub struct PatternFeatures {
    pub drum_notes: usize,
    pub bass_notes: usize,
    /// Distinct drum pads hit
    pub pads_used: BTreeSet<i16>,
    /// Banks touched by the drum track
    pub banks_used: BTreeSet<u8>,
    /// Drum pads with no assignment in the kit
    pub unassigned_pads: BTreeSet<i16>,
    /// Lowest/highest bass offset in semitones
    pub bass_range: Option<(i16, i16)>,
    /// Instruments the pattern actually needs from the kit
    pub instruments: Vec<InstrumentRef>,
    pub total_ticks: u32,
    /// Loop duration at the pattern's own tempo
    pub loop_seconds: f64,
}

/// Analyze a pattern in the context of the kit that will play it.
pub fn analyze_pattern(pattern: &Pattern, kit: &Kit) -> PatternFeatures {
    let mut features = PatternFeatures {
        drum_notes: pattern.drum_track.len(),
        bass_notes: pattern.bass_track.len(),
        pads_used: BTreeSet::new(),
        banks_used: BTreeSet::new(),
        unassigned_pads: BTreeSet::new(),
        bass_range: None,
        instruments: Vec::new(),
        total_ticks: pattern.total_ticks(),
        loop_seconds: pattern.total_ticks() as f64 * seconds_per_tick(pattern.tempo_bpm),
    };

    for note in &pattern.drum_track {
        features.pads_used.insert(note.pad_index);
        match kit.pad(note.pad_index) {
            Some(pad) => {
                if !features.instruments.contains(&pad.instrument) {
                    features.instruments.push(pad.instrument);
                }
            }
            None => {
                features.unassigned_pads.insert(note.pad_index);
            }
        }
        if let Some(bank) = usize::try_from(note.pad_index).ok().and_then(PadBank::of) {
            features.banks_used.insert(bank as u8 + 1);
        }
    }

    for note in &pattern.bass_track {
        let n = note.pad_index;
        features.bass_range = Some(match features.bass_range {
            Some((lo, hi)) => (lo.min(n), hi.max(n)),
            None => (n, n),
        });
    }
    if !pattern.bass_track.is_empty() && !features.instruments.contains(&kit.bass_tone.instrument) {
        features.instruments.push(kit.bass_tone.instrument);
    }

    features
}

impl fmt::Display for PatternFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Notes:    {} drum, {} bass", self.drum_notes, self.bass_notes)?;
        writeln!(f, "Loop:     {} ticks ({:.2}s)", self.total_ticks, self.loop_seconds)?;
        if !self.banks_used.is_empty() {
            let banks: Vec<alloc::string::String> =
                self.banks_used.iter().map(|b| alloc::format!("DRUM{}", b)).collect();
            writeln!(f, "Banks:    {}", banks.join(", "))?;
        }
        writeln!(f, "Pads:     {} used", self.pads_used.len())?;
        if !self.unassigned_pads.is_empty() {
            let pads: Vec<alloc::string::String> =
                self.unassigned_pads.iter().map(|p| alloc::format!("{}", p)).collect();
            writeln!(f, "Missing:  {}", pads.join(", "))?;
        }
        if let Some((lo, hi)) = self.bass_range {
            writeln!(f, "Bass:     {:+} to {:+} semitones", lo, hi)?;
        }
        if self.instruments.is_empty() {
            writeln!(f, "Sounds:   (none)")?;
        } else {
            let names: Vec<&str> = self.instruments.iter().map(|i| i.as_str()).collect();
            writeln!(f, "Sounds:   {}", names.join(", "))?;
        }
        Ok(())
    }
}
