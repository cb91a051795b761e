//! Level conversions for buses and master volume.

/// Quietest level the percent scale maps to, in dB.
pub const FLOOR_DB: f64 = -60.0;

/// Default bus and master level on the 0-100 scale.
pub const DEFAULT_LEVEL: u8 = 80;

/// Linear gain for a level on the 0-100 scale. Values above 100 clamp.
pub fn level_to_gain(level: u8) -> f32 {
    level.min(100) as f32 / 100.0
}

pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Gain in dB; `-inf` for silence.
pub fn gain_to_db(gain: f64) -> f64 {
    if gain <= 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * gain.log10()
}

/// Map 0-100 onto [`FLOOR_DB`]..=0 dB; 0 is `-inf`.
pub fn percent_to_db(percent: f64) -> f64 {
    if percent <= 0.0 {
        return f64::NEG_INFINITY;
    }
    FLOOR_DB * (1.0 - percent / 100.0)
}

/// Inverse of [`percent_to_db`], clamped to 0-100.
pub fn db_to_percent(db: f64) -> f64 {
    if db <= FLOOR_DB {
        return 0.0;
    }
    if db >= 0.0 {
        return 100.0;
    }
    (1.0 - db / FLOOR_DB) * 100.0
}

/// Equal-power stereo gains for a pan of -1.0..=1.0.
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * core::f32::consts::FRAC_PI_4;
    (angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scale() {
        assert_eq!(level_to_gain(0), 0.0);
        assert_eq!(level_to_gain(80), 0.8);
        assert_eq!(level_to_gain(100), 1.0);
        assert_eq!(level_to_gain(150), 1.0);
    }

    #[test]
    fn db_gain_round_trip() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_gain(-6.0) - 0.501_187).abs() < 1e-6);
        assert!((gain_to_db(db_to_gain(-12.5)) + 12.5).abs() < 1e-9);
        assert_eq!(gain_to_db(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn percent_scale() {
        assert_eq!(percent_to_db(100.0), 0.0);
        assert_eq!(percent_to_db(50.0), -30.0);
        assert_eq!(percent_to_db(0.0), f64::NEG_INFINITY);
        assert_eq!(db_to_percent(-30.0), 50.0);
        assert_eq!(db_to_percent(-80.0), 0.0);
        assert_eq!(db_to_percent(3.0), 100.0);
    }

    #[test]
    fn centre_pan_is_equal_power() {
        let (l, r) = pan_gains(0.0);
        assert!((l - r).abs() < 1e-6);
        assert!((l * l + r * r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hard_pan() {
        let (l, r) = pan_gains(-1.0);
        assert!((l - 1.0).abs() < 1e-6);
        assert!(r.abs() < 1e-6);
        let (l, r) = pan_gains(1.0);
        assert!(l.abs() < 1e-6);
        assert!((r - 1.0).abs() < 1e-6);
    }
}
