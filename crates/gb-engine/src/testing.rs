//! Recording sink with a hand-driven clock.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use gb_ir::SampleKey;
use slotmap::SlotMap;

use crate::sink::{AudioSink, Bus, VoiceHandle, VoiceRequest};

pub struct ManualSink {
    pub clock: f64,
    pub scheduled: Vec<(VoiceHandle, VoiceRequest)>,
    pub stopped: Vec<VoiceHandle>,
    pub bus_gains: Vec<(Bus, f32)>,
    pub refuse: bool,
    finished: VecDeque<VoiceHandle>,
    sounds: SlotMap<SampleKey, ()>,
    next_handle: u64,
}

impl ManualSink {
    pub fn new() -> Self {
        Self {
            clock: 0.0,
            scheduled: Vec::new(),
            stopped: Vec::new(),
            bus_gains: Vec::new(),
            refuse: false,
            finished: VecDeque::new(),
            sounds: SlotMap::with_key(),
            next_handle: 1,
        }
    }

    /// Register a new sound and return its key.
    pub fn sound(&mut self) -> SampleKey {
        self.sounds.insert(())
    }

    /// Report `handle` as naturally finished.
    pub fn finish(&mut self, handle: VoiceHandle) {
        self.finished.push_back(handle);
    }

    pub fn advance(&mut self, seconds: f64) {
        self.clock += seconds;
    }

    /// Start times of every scheduled voice, in scheduling order.
    pub fn start_times(&self) -> Vec<f64> {
        self.scheduled.iter().map(|(_, r)| r.start_time).collect()
    }
}

impl AudioSink for ManualSink {
    fn now(&self) -> f64 {
        self.clock
    }

    fn schedule_voice(&mut self, request: &VoiceRequest) -> Option<VoiceHandle> {
        if self.refuse || !self.sounds.contains_key(request.sound) {
            return None;
        }
        let handle = VoiceHandle(self.next_handle);
        self.next_handle += 1;
        self.scheduled.push((handle, *request));
        Some(handle)
    }

    fn stop_voice(&mut self, handle: VoiceHandle) {
        self.stopped.push(handle);
    }

    fn poll_finished(&mut self) -> Option<VoiceHandle> {
        self.finished.pop_front()
    }

    fn set_bus_gain(&mut self, bus: Bus, gain: f32) {
        self.bus_gains.push((bus, gain));
    }
}

#[cfg(feature = "std")]
pub use recorder::Recorder;

#[cfg(feature = "std")]
mod recorder {
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    use gb_ir::{Position, Tick};

    use crate::sink::TransportObserver;

    #[derive(Default)]
    struct Log {
        positions: Vec<Position>,
        pads: Vec<Vec<u8>>,
    }

    /// Observer that records every update; clones share the same log.
    #[derive(Clone, Default)]
    pub struct Recorder {
        log: Arc<Mutex<Log>>,
    }

    impl Recorder {
        pub fn ticks(&self) -> Vec<Tick> {
            self.log.lock().unwrap().positions.iter().map(|p| p.tick).collect()
        }

        pub fn last_position(&self) -> Option<Position> {
            self.log.lock().unwrap().positions.last().copied()
        }

        pub fn last_pads(&self) -> Option<Vec<u8>> {
            self.log.lock().unwrap().pads.last().cloned()
        }
    }

    impl TransportObserver for Recorder {
        fn position_changed(&mut self, position: Position) {
            self.log.lock().unwrap().positions.push(position);
        }

        fn pads_triggered(&mut self, pads: &[u8]) {
            self.log.lock().unwrap().pads.push(pads.to_vec());
        }
    }
}
