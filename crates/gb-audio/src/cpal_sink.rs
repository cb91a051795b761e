//! CPAL-based real-time sink.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use gb_engine::{AudioSink, Bus, VoiceHandle, VoiceRequest};
use gb_ir::{Sample, SampleKey};

use crate::error::AudioError;
use crate::renderer::{software_sink, RenderConfig, Renderer, SampleLoader, SoftwareSink};

/// Sink playing through the default output device.
///
/// The stream is not `Send` on every platform, so open the sink on the
/// thread that will drive it.
pub struct CpalSink {
    sink: SoftwareSink,
    stream: Stream,
}

impl CpalSink {
    /// Open the default output device at its default rate, stereo.
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let mut config: StreamConfig = config.into();
        config.channels = 2;
        log::info!(
            "opening '{}' at {} Hz",
            device.name().unwrap_or_else(|_| "unknown device".into()),
            config.sample_rate.0
        );

        let (sink, renderer) = software_sink(RenderConfig::with_sample_rate(config.sample_rate.0));
        let stream = build_stream(&device, &config, renderer)?;
        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        Ok(Self { sink, stream })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sink.sample_rate()
    }

    /// Pause the device. The audio clock stops with it.
    pub fn pause(&mut self) -> Result<(), AudioError> {
        self.stream.pause().map_err(|e| AudioError::Playback(e.to_string()))
    }

    pub fn resume(&mut self) -> Result<(), AudioError> {
        self.stream.play().map_err(|e| AudioError::Playback(e.to_string()))
    }
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    mut renderer: Renderer,
) -> Result<Stream, AudioError> {
    let channels = config.channels as usize;
    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                #[cfg(feature = "alloc_check")]
                assert_no_alloc::assert_no_alloc(|| renderer.render_interleaved(data, channels));
                #[cfg(not(feature = "alloc_check"))]
                renderer.render_interleaved(data, channels);
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::StreamCreate(e.to_string()))
}

impl SampleLoader for CpalSink {
    fn load(&mut self, sample: Sample) -> SampleKey {
        self.sink.load(sample)
    }
}

impl AudioSink for CpalSink {
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

impl Drop for CpalSink {
    fn drop(&mut self) {
        self.sink.stop_all();
    }
}
