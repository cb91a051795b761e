//! Software voice renderer.
//!
//! Split into a control-side [`SoftwareSink`] (implements [`AudioSink`]) and a
//! real-time [`Renderer`], connected by lock-free ring buffers. The renderer
//! owns the frame clock; voices start on the exact frame their timestamp
//! names, however late the command arrives within the lookahead window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gb_engine::{AudioSink, Bus, VoiceHandle, VoiceRequest};
use gb_ir::{Frame, Sample, SampleKey};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use slotmap::SlotMap;

use crate::mixer::{level_to_gain, pan_gains, DEFAULT_LEVEL};

/// Voices the renderer can mix at once.
pub const MAX_RENDER_VOICES: usize = 64;

/// Renderer sizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Capacity of the control-to-renderer command queue
    pub command_capacity: usize,
    /// Capacity of the finished-voice queue. Raised to at least
    /// `MAX_RENDER_VOICES + command_capacity`.
    pub finished_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            command_capacity: 512,
            finished_capacity: 256,
        }
    }
}

impl RenderConfig {
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self { sample_rate, ..Self::default() }
    }
}

/// A voice ready to render.
pub(crate) struct PlayVoice {
    handle: VoiceHandle,
    sample: Arc<Sample>,
    start_frame: u64,
    stop_frame: Option<u64>,
    /// Source frames advanced per output frame
    step: f64,
    gain_left: f32,
    gain_right: f32,
    bus: Bus,
}

pub(crate) enum Command {
    Play(PlayVoice),
    Stop(VoiceHandle),
    StopAll,
    BusGain(Bus, f32),
    MasterGain(f32),
}

struct Voice {
    play: PlayVoice,
    pos: f64,
}

/// Build a connected sink/renderer pair.
pub fn software_sink(config: RenderConfig) -> (SoftwareSink, Renderer) {
    let (commands, command_rx) = HeapRb::<Command>::new(config.command_capacity).split();
    let finished_capacity = config
        .finished_capacity
        .max(MAX_RENDER_VOICES + config.command_capacity);
    let (finished_tx, finished) = HeapRb::<VoiceHandle>::new(finished_capacity).split();
    let clock = Arc::new(AtomicU64::new(0));
    let dropped = Arc::new(AtomicU64::new(0));

    let sink = SoftwareSink {
        commands,
        finished,
        dropped: dropped.clone(),
        dropped_seen: 0,
        clock: clock.clone(),
        sample_rate: config.sample_rate,
        bank: SlotMap::with_key(),
        next_handle: 1,
    };
    let renderer = Renderer {
        commands: command_rx,
        finished: finished_tx,
        dropped,
        clock,
        frame: 0,
        voices: heapless::Vec::new(),
        drum_gain: level_to_gain(DEFAULT_LEVEL),
        bass_gain: level_to_gain(DEFAULT_LEVEL),
        master_gain: level_to_gain(DEFAULT_LEVEL),
    };
    (sink, renderer)
}

/// Sinks that hold decoded samples for playback.
pub trait SampleLoader {
    /// Add a decoded sample. Part of the pre-load phase.
    fn load(&mut self, sample: Sample) -> SampleKey;
}

/// Control side of the software renderer.
pub struct SoftwareSink {
    commands: HeapProd<Command>,
    finished: HeapCons<VoiceHandle>,
    dropped: Arc<AtomicU64>,
    dropped_seen: u64,
    clock: Arc<AtomicU64>,
    sample_rate: u32,
    bank: SlotMap<SampleKey, Arc<Sample>>,
    next_handle: u64,
}

impl SampleLoader for SoftwareSink {
    fn load(&mut self, sample: Sample) -> SampleKey {
        self.bank.insert(Arc::new(sample))
    }
}

impl SoftwareSink {
    pub fn sample(&self, key: SampleKey) -> Option<&Sample> {
        self.bank.get(key).map(|s| s.as_ref())
    }

    pub fn sample_count(&self) -> usize {
        self.bank.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.clock.load(Ordering::Acquire)
    }

    /// Completions the renderer could not report because the finished
    /// queue was full.
    pub fn dropped_completions(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Silence every voice, reported or not.
    pub fn stop_all(&mut self) {
        self.send(Command::StopAll);
    }

    fn seconds_to_frame(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate as f64).round() as u64
    }

    fn send(&mut self, command: Command) -> bool {
        if self.commands.try_push(command).is_err() {
            log::warn!("renderer command queue full, dropping command");
            return false;
        }
        true
    }
}

impl AudioSink for SoftwareSink {
    fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    fn schedule_voice(&mut self, request: &VoiceRequest) -> Option<VoiceHandle> {
        let Some(sample) = self.bank.get(request.sound).cloned() else {
            log::warn!("unknown sample key {:?}", request.sound);
            return None;
        };
        let handle = VoiceHandle(self.next_handle);
        let (pan_left, pan_right) = pan_gains(request.pan);
        let step = request.playback_rate * sample.sample_rate as f64 / self.sample_rate as f64;
        let play = PlayVoice {
            handle,
            start_frame: self.seconds_to_frame(request.start_time),
            stop_frame: request.stop_time.map(|t| self.seconds_to_frame(t)),
            sample,
            step,
            gain_left: request.gain * pan_left,
            gain_right: request.gain * pan_right,
            bus: request.bus,
        };
        if !self.send(Command::Play(play)) {
            return None;
        }
        self.next_handle += 1;
        Some(handle)
    }

    fn stop_voice(&mut self, handle: VoiceHandle) {
        self.send(Command::Stop(handle));
    }

    fn poll_finished(&mut self) -> Option<VoiceHandle> {
        let dropped = self.dropped_completions();
        if dropped != self.dropped_seen {
            log::warn!(
                "finished queue overflowed, {} completions lost",
                dropped - self.dropped_seen
            );
            self.dropped_seen = dropped;
        }
        self.finished.try_pop()
    }

    fn set_bus_gain(&mut self, bus: Bus, gain: f32) {
        self.send(Command::BusGain(bus, gain));
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.send(Command::MasterGain(gain));
    }
}

/// Real-time side of the software renderer. Never allocates.
pub struct Renderer {
    commands: HeapCons<Command>,
    finished: HeapProd<VoiceHandle>,
    dropped: Arc<AtomicU64>,
    clock: Arc<AtomicU64>,
    frame: u64,
    voices: heapless::Vec<Voice, MAX_RENDER_VOICES>,
    drum_gain: f32,
    bass_gain: f32,
    master_gain: f32,
}

impl Renderer {
    /// Current frame clock.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Fill `out` with mixed frames and advance the clock.
    pub fn render(&mut self, out: &mut [Frame]) {
        self.drain_commands();
        for frame in out.iter_mut() {
            let (left, right) = self.next_frame();
            *frame = Frame::from_f32(left, right);
        }
        self.publish_clock();
    }

    /// Fill an interleaved float buffer with `channels` channels; channels
    /// past the first two are zeroed.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        self.drain_commands();
        for chunk in data.chunks_mut(channels.max(1)) {
            let (left, right) = self.next_frame();
            for (i, sample) in chunk.iter_mut().enumerate() {
                *sample = match i {
                    0 => left,
                    1 => right,
                    _ => 0.0,
                };
            }
        }
        self.publish_clock();
    }

    fn report(&mut self, handle: VoiceHandle) {
        if self.finished.try_push(handle).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn publish_clock(&self) {
        self.clock.store(self.frame, Ordering::Release);
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.try_pop() {
            match command {
                Command::Play(play) => {
                    let handle = play.handle;
                    if self.voices.push(Voice { play, pos: 0.0 }).is_err() {
                        // no room: report it so the allocator forgets it
                        self.report(handle);
                    }
                }
                Command::Stop(handle) => {
                    if let Some(i) = self.voices.iter().position(|v| v.play.handle == handle) {
                        self.voices.swap_remove(i);
                    }
                }
                Command::StopAll => self.voices.clear(),
                Command::BusGain(Bus::Drum, gain) => self.drum_gain = gain,
                Command::BusGain(Bus::Bass, gain) => self.bass_gain = gain,
                Command::MasterGain(gain) => self.master_gain = gain,
            }
        }
    }

    /// Mix one output frame and advance the clock by one.
    fn next_frame(&mut self) -> (f32, f32) {
        let now = self.frame;
        let mut left = 0.0f32;
        let mut right = 0.0f32;
        let mut i = 0;
        while i < self.voices.len() {
            let voice = &mut self.voices[i];
            if now < voice.play.start_frame {
                i += 1;
                continue;
            }
            let ended = voice.play.stop_frame.is_some_and(|stop| now >= stop)
                || voice.pos >= voice.play.sample.len() as f64;
            if ended {
                let handle = voice.play.handle;
                self.voices.swap_remove(i);
                self.report(handle);
                continue;
            }

            let (l, r) = voice.play.sample.data.frame_f32(voice.pos);
            let bus = match voice.play.bus {
                Bus::Drum => self.drum_gain,
                Bus::Bass => self.bass_gain,
            };
            left += l * voice.play.gain_left * bus;
            right += r * voice.play.gain_right * bus;
            voice.pos += voice.play.step;
            i += 1;
        }
        self.frame += 1;
        (left * self.master_gain, right * self.master_gain)
    }
}
