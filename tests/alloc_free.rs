//! Allocation-free render path tests.
//!
//! These tests verify that `Renderer::render()` does not allocate once
//! voices are queued. Voices start, overlap, get cut off by a stop and run
//! off the end of their samples while the guard is active.
//!
//! Runs under plain `cargo test`, no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use gb_audio::{software_sink, RenderConfig, SampleLoader};
use gb_engine::{AudioSink, Bus, VoiceRequest};
use gb_ir::{Frame, Sample, SampleData, SampleKey};

fn sample(name: &str, data: SampleData) -> Sample {
    let mut s = Sample::new(name);
    s.data = data;
    s
}

fn request(sound: SampleKey, start_time: f64, playback_rate: f64, bus: Bus) -> VoiceRequest {
    VoiceRequest {
        sound,
        start_time,
        gain: 0.5,
        playback_rate,
        pan: 0.0,
        stop_time: None,
        bus,
    }
}

#[test]
fn overlapping_voices_render_alloc_free() {
    let (mut sink, mut renderer) = software_sink(RenderConfig::default());
    let kick = sink.load(sample("kick", SampleData::Mono16(vec![8000; 4410])));
    let hat = sink.load(sample("hat", SampleData::Stereo8(vec![40; 900], vec![-40; 900])));

    for i in 0..30 {
        let t = i as f64 * 0.05;
        sink.schedule_voice(&request(kick, t, 1.0, Bus::Drum)).unwrap();
        sink.schedule_voice(&request(hat, t + 0.025, 1.5, Bus::Drum)).unwrap();
    }
    let mut buf = vec![Frame::silence(); 512];

    assert_no_alloc(|| {
        for _ in 0..(44100 * 3 / 512) {
            renderer.render(&mut buf);
        }
    });
    assert_eq!(renderer.active_voices(), 0);
}

#[test]
fn stops_and_pitched_bass_render_alloc_free() {
    let (mut sink, mut renderer) = software_sink(RenderConfig::default());
    let bass = sink.load(sample("bass", SampleData::Mono16(vec![4000; 44100])));

    let mut handles = Vec::new();
    for i in 0..16 {
        let mut req = request(bass, i as f64 * 0.1, 0.5 + i as f64 / 16.0, Bus::Bass);
        req.stop_time = Some(i as f64 * 0.1 + 0.08);
        handles.push(sink.schedule_voice(&req).unwrap());
    }
    let mut buf = vec![Frame::silence(); 256];
    renderer.render(&mut buf);
    for handle in handles.iter().step_by(3) {
        sink.stop_voice(*handle);
    }
    sink.set_bus_gain(Bus::Bass, 0.3);

    assert_no_alloc(|| {
        for _ in 0..(44100 * 2 / 256) {
            renderer.render(&mut buf);
        }
    });
    assert_eq!(renderer.active_voices(), 0);
}

#[test]
fn interleaved_output_is_alloc_free() {
    let (mut sink, mut renderer) = software_sink(RenderConfig::default());
    let tone = sink.load(sample("tone", SampleData::Mono16(vec![1000; 2000])));
    sink.schedule_voice(&request(tone, 0.0, 1.0, Bus::Drum)).unwrap();
    let mut data = vec![0.0f32; 1024];

    assert_no_alloc(|| {
        for _ in 0..20 {
            renderer.render_interleaved(&mut data, 2);
        }
    });
}
