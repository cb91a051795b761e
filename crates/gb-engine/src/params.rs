//! Mapping from musical parameters to playback parameters.

/// Playback-rate ratio for a pitch offset in (fractional) semitones.
///
/// `playback_rate(12.0) == 2.0`, `playback_rate(0.0) == 1.0`.
#[inline]
pub fn playback_rate(semitones: f64) -> f64 {
    libm::pow(2.0, semitones / 12.0)
}

/// Linear gain from a MIDI-style velocity (0-127) and a level (0-100).
///
/// Velocity follows a quadratic curve. Inputs above range are clamped.
#[inline]
pub fn gain(velocity: u8, level: u8) -> f32 {
    let v = velocity.min(127) as f32 / 127.0;
    let l = level.min(100) as f32 / 100.0;
    v * v * l
}

/// Stereo position -1.0 (left) ..= 1.0 (right) from a pad pan of -50..=50.
#[inline]
pub fn pan(pad_pan: i8) -> f32 {
    pad_pan.clamp(-50, 50) as f32 / 50.0
}
