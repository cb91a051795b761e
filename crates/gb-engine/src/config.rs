//! Engine tuning knobs.

use core::time::Duration;

/// Coarse wake period of the scheduling loop.
pub const WAKE_INTERVAL: Duration = Duration::from_millis(25);

/// How far ahead of the audio clock events are committed, in seconds.
pub const SCHEDULE_AHEAD_SECONDS: f64 = 0.1;

/// Maximum number of simultaneously sounding voices.
pub const MAX_POLYPHONY: usize = 32;

/// Scheduler configuration. `Default` gives the stock timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Period of the coarse wake that drives [`Scheduler::pass`](crate::Scheduler::pass)
    pub wake_interval: Duration,
    /// Lookahead horizon in seconds; must exceed `wake_interval`
    pub schedule_ahead: f64,
    /// Polyphony ceiling enforced by the voice allocator
    pub max_polyphony: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wake_interval: WAKE_INTERVAL,
            schedule_ahead: SCHEDULE_AHEAD_SECONDS,
            max_polyphony: MAX_POLYPHONY,
        }
    }
}

impl EngineConfig {
    /// True if the lookahead horizon covers at least one wake period.
    pub fn horizon_covers_wake(&self) -> bool {
        self.schedule_ahead > self.wake_interval.as_secs_f64()
    }
}
