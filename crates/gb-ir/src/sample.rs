//! Decoded sample data.

use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::kit::instrument_ref;

slotmap::new_key_type! {
    /// Key for referencing samples in a sink's sample bank.
    pub struct SampleKey;
}

/// A decoded, ready-to-play sound.
#[derive(Clone, Debug)]
pub struct Sample {
    /// Sample name
    pub name: ArrayString<32>,
    /// Audio data
    pub data: SampleData,
    /// Rate the data was recorded at, in Hz
    pub sample_rate: u32,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            name: ArrayString::new(),
            data: SampleData::Mono16(Vec::new()),
            sample_rate: 44_100,
        }
    }
}

impl Sample {
    /// Create a new empty sample. Names that do not fit are truncated.
    pub fn new(name: &str) -> Self {
        Self {
            name: instrument_ref(name),
            ..Self::default()
        }
    }

    /// Get the length of the sample in frames.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sample has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Sample audio data.
#[derive(Clone, Debug)]
pub enum SampleData {
    /// 8-bit mono samples
    Mono8(Vec<i8>),
    /// 16-bit mono samples
    Mono16(Vec<i16>),
    /// 8-bit stereo samples (left, right)
    Stereo8(Vec<i8>, Vec<i8>),
    /// 16-bit stereo samples (left, right)
    Stereo16(Vec<i16>, Vec<i16>),
}

impl SampleData {
    /// Get the number of sample frames.
    pub fn len(&self) -> usize {
        match self {
            SampleData::Mono8(v) => v.len(),
            SampleData::Mono16(v) => v.len(),
            SampleData::Stereo8(l, _) => l.len(),
            SampleData::Stereo16(l, _) => l.len(),
        }
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels in the sample data.
    pub fn num_channels(&self) -> u16 {
        match self {
            SampleData::Mono8(_) | SampleData::Mono16(_) => 1,
            SampleData::Stereo8(_, _) | SampleData::Stereo16(_, _) => 2,
        }
    }

    /// Stereo frame at `pos` as i16 (mono data is duplicated). Out of range reads as silence.
    pub fn frame_i16(&self, pos: usize) -> (i16, i16) {
        match self {
            SampleData::Mono8(v) => {
                let s = v.get(pos).copied().unwrap_or(0) as i16 * 256;
                (s, s)
            }
            SampleData::Mono16(v) => {
                let s = v.get(pos).copied().unwrap_or(0);
                (s, s)
            }
            SampleData::Stereo8(l, r) => (
                l.get(pos).copied().unwrap_or(0) as i16 * 256,
                r.get(pos).copied().unwrap_or(0) as i16 * 256,
            ),
            SampleData::Stereo16(l, r) => (
                l.get(pos).copied().unwrap_or(0),
                r.get(pos).copied().unwrap_or(0),
            ),
        }
    }

    /// Linearly interpolated stereo frame at fractional position `pos`, in -1.0..1.0.
    pub fn frame_f32(&self, pos: f64) -> (f32, f32) {
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;
        let (al, ar) = self.frame_i16(idx);
        let (bl, br) = self.frame_i16(idx + 1);
        let lerp = |a: i16, b: i16| (a as f32 + (b as f32 - a as f32) * frac) / 32768.0;
        (lerp(al, bl), lerp(ar, br))
    }
}
