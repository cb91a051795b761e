//! Transport state shared between the control thread and callers.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gb_engine::TransportObserver;
use gb_ir::Position;

/// How long a triggered pad stays lit.
pub const PAD_FLASH: Duration = Duration::from_millis(100);

/// Lock-free snapshot of the transport, written by the control thread.
pub struct Transport {
    tick: AtomicU32,
    measure: AtomicU32,
    beat: AtomicU32,
    running: AtomicBool,
    voices: AtomicUsize,
    /// Bit n set = bank-relative pad n lit
    pads: AtomicU32,
    /// When `pads` was last written, in micros since `epoch`
    pads_at: AtomicU64,
    epoch: Instant,
}

impl Transport {
    pub fn new() -> Self {
        Self {
            tick: AtomicU32::new(0),
            measure: AtomicU32::new(1),
            beat: AtomicU32::new(1),
            running: AtomicBool::new(false),
            voices: AtomicUsize::new(0),
            pads: AtomicU32::new(0),
            pads_at: AtomicU64::new(0),
            epoch: Instant::now(),
        }
    }

    pub fn position(&self) -> Position {
        Position {
            tick: self.tick.load(Ordering::Relaxed),
            measure: self.measure.load(Ordering::Relaxed),
            beat: self.beat.load(Ordering::Relaxed),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn active_voices(&self) -> usize {
        self.voices.load(Ordering::Relaxed)
    }

    /// Bank-relative pads triggered within the last [`PAD_FLASH`].
    pub fn active_pads(&self) -> Vec<u8> {
        let age = self.micros().saturating_sub(self.pads_at.load(Ordering::Acquire));
        if age > PAD_FLASH.as_micros() as u64 {
            return Vec::new();
        }
        let bits = self.pads.load(Ordering::Relaxed);
        (0..32u8).filter(|pad| bits & (1 << pad) != 0).collect()
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    pub(crate) fn set_voices(&self, count: usize) {
        self.voices.store(count, Ordering::Relaxed);
    }

    fn micros(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

/// Publishes scheduler updates into a shared [`Transport`].
pub struct TransportPublisher(pub Arc<Transport>);

impl TransportObserver for TransportPublisher {
    fn position_changed(&mut self, position: Position) {
        self.0.tick.store(position.tick, Ordering::Relaxed);
        self.0.measure.store(position.measure, Ordering::Relaxed);
        self.0.beat.store(position.beat, Ordering::Relaxed);
    }

    fn pads_triggered(&mut self, pads: &[u8]) {
        let bits = pads.iter().filter(|p| **p < 32).fold(0u32, |acc, p| acc | 1 << p);
        self.0.pads.store(bits, Ordering::Relaxed);
        self.0.pads_at.store(self.0.micros(), Ordering::Release);
    }
}
