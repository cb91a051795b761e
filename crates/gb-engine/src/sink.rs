//! Capabilities the scheduler drives: the audio sink and the transport observer.

use gb_ir::{Position, SampleKey};

/// Handle to a voice playing (or scheduled to play) on an [`AudioSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoiceHandle(pub u64);

/// Mixer bus a voice is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bus {
    Drum,
    Bass,
}

/// Everything a sink needs to start one voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceRequest {
    /// Pre-loaded sound to play
    pub sound: SampleKey,
    /// Onset on the sink's clock, in seconds
    pub start_time: f64,
    /// Linear gain
    pub gain: f32,
    /// Playback-rate ratio (1.0 = original pitch)
    pub playback_rate: f64,
    /// Stereo position -1.0..=1.0
    pub pan: f32,
    /// Optional cut-off on the sink's clock
    pub stop_time: Option<f64>,
    pub bus: Bus,
}

/// Something that can play sounds at precise times on its own clock.
///
/// Sound generation happens asynchronously on the sink's side; none of
/// these calls may block on it.
pub trait AudioSink {
    /// Monotonic audio clock, in seconds.
    fn now(&self) -> f64;

    /// Schedule a voice to start at `request.start_time`. Returns `None` if
    /// the sink cannot take the voice (unknown sound, queue full).
    fn schedule_voice(&mut self, request: &VoiceRequest) -> Option<VoiceHandle>;

    /// Stop a voice immediately. Must be a no-op for voices that already
    /// finished or were never known.
    fn stop_voice(&mut self, handle: VoiceHandle);

    /// Next voice that ended naturally since the last call. Each voice is
    /// reported at most once; explicitly stopped voices are not reported.
    fn poll_finished(&mut self) -> Option<VoiceHandle>;

    /// Set a bus gain (linear).
    fn set_bus_gain(&mut self, _bus: Bus, _gain: f32) {}

    /// Set the master gain (linear).
    fn set_master_gain(&mut self, _gain: f32) {}
}

impl<S: AudioSink + ?Sized> AudioSink for &mut S {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn schedule_voice(&mut self, request: &VoiceRequest) -> Option<VoiceHandle> {
        (**self).schedule_voice(request)
    }

    fn stop_voice(&mut self, handle: VoiceHandle) {
        (**self).stop_voice(handle)
    }

    fn poll_finished(&mut self) -> Option<VoiceHandle> {
        (**self).poll_finished()
    }

    fn set_bus_gain(&mut self, bus: Bus, gain: f32) {
        (**self).set_bus_gain(bus, gain)
    }

    fn set_master_gain(&mut self, gain: f32) {
        (**self).set_master_gain(gain)
    }
}

/// Receives transport updates from the scheduler.
pub trait TransportObserver {
    /// Called whenever the tick cursor moves or is repositioned.
    fn position_changed(&mut self, position: Position);

    /// Drum pads (bank-relative, 0-19) triggered at the current tick.
    /// An empty slice clears the display.
    fn pads_triggered(&mut self, _pads: &[u8]) {}
}

/// Observer that ignores every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl TransportObserver for NullObserver {
    fn position_changed(&mut self, _position: Position) {}
}
