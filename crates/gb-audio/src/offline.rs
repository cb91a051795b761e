//! Offline sink: the software renderer driven by hand.

use gb_engine::{AudioSink, Bus, VoiceHandle, VoiceRequest};
use gb_ir::{Frame, Sample, SampleKey};

use crate::renderer::{software_sink, RenderConfig, Renderer, SampleLoader, SoftwareSink};

/// Sink whose clock only moves when frames are rendered.
pub struct OfflineSink {
    sink: SoftwareSink,
    renderer: Renderer,
}

impl OfflineSink {
    pub fn new(config: RenderConfig) -> Self {
        let (sink, renderer) = software_sink(config);
        Self { sink, renderer }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sink.sample_rate()
    }

    pub fn frames(&self) -> u64 {
        self.renderer.frame()
    }

    /// Voices currently held by the renderer, including ones not yet started.
    pub fn rendering_voices(&self) -> usize {
        self.renderer.active_voices()
    }

    /// Render into `out`, advancing the clock by `out.len()` frames.
    pub fn render_into(&mut self, out: &mut [Frame]) {
        self.renderer.render(out);
    }

    /// Render `frames` frames and append them to `out`.
    pub fn render_append(&mut self, frames: usize, out: &mut Vec<Frame>) {
        let start = out.len();
        out.resize(start + frames, Frame::silence());
        self.renderer.render(&mut out[start..]);
    }
}

impl SampleLoader for OfflineSink {
    fn load(&mut self, sample: Sample) -> SampleKey {
        self.sink.load(sample)
    }
}

impl AudioSink for OfflineSink {
    fn now(&self) -> f64 {
        self.sink.now()
    }

    fn schedule_voice(&mut self, request: &VoiceRequest) -> Option<VoiceHandle> {
        self.sink.schedule_voice(request)
    }

    fn stop_voice(&mut self, handle: VoiceHandle) {
        self.sink.stop_voice(handle)
    }

    fn poll_finished(&mut self) -> Option<VoiceHandle> {
        self.sink.poll_finished()
    }

    fn set_bus_gain(&mut self, bus: Bus, gain: f32) {
        self.sink.set_bus_gain(bus, gain)
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.sink.set_master_gain(gain)
    }
}
