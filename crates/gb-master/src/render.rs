//! Offline rendering of a pattern to frames or WAV.

use gb_audio::{OfflineSink, RenderConfig};
use gb_engine::{EngineConfig, Scheduler};
use gb_ir::{Frame, Kit, Pattern};

use crate::samples::{install, SampleSet};
use crate::ControllerError;

/// Loop `pattern` on `kit` for `seconds` and return the mixed output.
///
/// Runs the same scheduler as live playback, waking once per
/// `wake_interval` of rendered audio.
pub fn render_frames(
    pattern: &Pattern,
    kit: &Kit,
    samples: &SampleSet,
    sample_rate: u32,
    seconds: f64,
) -> Result<Vec<Frame>, ControllerError> {
    let config = EngineConfig::default();
    let mut scheduler = Scheduler::new(OfflineSink::new(RenderConfig::with_sample_rate(sample_rate)), config);
    let (sink, cache) = scheduler.sink_and_samples_mut();
    install(sink, cache, samples.clone());
    scheduler.set_kit(kit.clone());
    scheduler.start(pattern.clone())?;

    let total = (seconds.max(0.0) * sample_rate as f64).round() as usize;
    let block = ((config.wake_interval.as_secs_f64() * sample_rate as f64) as usize).max(1);
    let mut frames = Vec::with_capacity(total);
    while frames.len() < total {
        scheduler.pass();
        let n = block.min(total - frames.len());
        scheduler.sink_mut().render_append(n, &mut frames);
    }
    scheduler.stop();
    log::info!("rendered {} frames ({:.1}s) at {} Hz", frames.len(), seconds, sample_rate);
    Ok(frames)
}

/// Like [`render_frames`], encoded as a 16-bit stereo WAV file.
pub fn render_to_wav(
    pattern: &Pattern,
    kit: &Kit,
    samples: &SampleSet,
    sample_rate: u32,
    seconds: f64,
) -> Result<Vec<u8>, ControllerError> {
    let frames = render_frames(pattern, kit, samples, sample_rate, seconds)?;
    Ok(gb_formats::frames_to_wav(&frames, sample_rate)?)
}
