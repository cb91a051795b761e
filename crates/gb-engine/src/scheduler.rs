//! Lookahead scheduler.
//!
//! A coarse periodic wake calls [`Scheduler::pass`]. Each pass commits every
//! tick whose fire time falls before `now + schedule_ahead` to the sink with
//! an exact timestamp, so wake jitter never reaches the audible onset.

use alloc::boxed::Box;
use alloc::vec::Vec;
use gb_ir::{
    bank_relative, seconds_per_tick, tempo_in_range, DrumHit, Kit, Pattern, Position, Tick,
    TrackEvent,
};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::event_index::EventIndex;
use crate::params;
use crate::sample_cache::SampleCache;
use crate::sink::{AudioSink, Bus, NullObserver, TransportObserver, VoiceHandle, VoiceRequest};
use crate::voice_allocator::{NewVoice, VoiceAllocator, VoiceSource};

/// Transport state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Running,
}

/// Owns the tick cursor, the event index and the voice allocator for one sink.
pub struct Scheduler<S: AudioSink> {
    sink: S,
    config: EngineConfig,
    state: TransportState,
    pattern: Option<Pattern>,
    kit: Kit,
    samples: SampleCache,
    index: EventIndex,
    voices: VoiceAllocator,
    tick: Tick,
    next_fire_time: f64,
    bpm: f64,
    loops: u64,
    observer: Box<dyn TransportObserver + Send>,
    /// Pads triggered at the current tick (scratch)
    triggered: Vec<u8>,
}

impl<S: AudioSink> Scheduler<S> {
    /// Create a stopped scheduler with an empty kit.
    pub fn new(sink: S, config: EngineConfig) -> Self {
        Self {
            sink,
            voices: VoiceAllocator::new(config.max_polyphony),
            config,
            state: TransportState::Stopped,
            pattern: None,
            kit: Kit::default(),
            samples: SampleCache::new(),
            index: EventIndex::default(),
            tick: 0,
            next_fire_time: 0.0,
            bpm: 120.0,
            loops: 0,
            observer: Box::new(NullObserver),
            triggered: Vec::with_capacity(gb_ir::NUM_PADS),
        }
    }

    /// Replace the transport observer.
    pub fn set_observer(&mut self, observer: Box<dyn TransportObserver + Send>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Instrument resolution table, filled during pre-load.
    pub fn samples(&self) -> &SampleCache {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut SampleCache {
        &mut self.samples
    }

    /// Sink and resolution table together, for loading samples.
    pub fn sink_and_samples_mut(&mut self) -> (&mut S, &mut SampleCache) {
        (&mut self.sink, &mut self.samples)
    }

    pub fn kit(&self) -> &Kit {
        &self.kit
    }

    /// Replace the kit. Takes effect for the next admitted note.
    pub fn set_kit(&mut self, kit: Kit) {
        log::debug!("kit '{}' selected", kit.name);
        self.kit = kit;
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TransportState::Running
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Current tempo in BPM.
    pub fn tempo(&self) -> f64 {
        self.bpm
    }

    /// Fire time of the tick under the cursor, on the sink's clock.
    pub fn next_fire_time(&self) -> f64 {
        self.next_fire_time
    }

    /// Number of times the cursor wrapped back to tick 0.
    pub fn loop_count(&self) -> u64 {
        self.loops
    }

    /// Measure/beat position of the cursor.
    pub fn position(&self) -> Position {
        match &self.pattern {
            Some(pattern) => pattern.position_of(self.tick),
            None => Position { tick: self.tick, ..Position::start() },
        }
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.live_count()
    }

    /// Start looping `pattern` from the current cursor (wrapped into the new
    /// loop). Adopts the pattern's tempo. Does nothing if already running.
    pub fn start(&mut self, pattern: Pattern) -> Result<(), EngineError> {
        if self.is_running() {
            log::debug!("start ignored: already running");
            return Ok(());
        }
        pattern.validate()?;

        self.index = EventIndex::build(&pattern);
        self.tick %= self.index.total_ticks();
        self.bpm = pattern.tempo_bpm;
        log::info!(
            "starting '{}' at {} BPM, {} ticks, {} events",
            pattern.name,
            self.bpm,
            self.index.total_ticks(),
            self.index.len()
        );
        self.pattern = Some(pattern);
        self.next_fire_time = self.sink.now();
        self.state = TransportState::Running;
        self.publish_position();
        Ok(())
    }

    /// Stop scheduling and hard-stop every live voice. Keeps the cursor.
    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("stopped at tick {}", self.tick);
        }
        self.state = TransportState::Stopped;
        self.voices.stop_all(&mut self.sink);
        self.triggered.clear();
        self.observer.pads_triggered(&[]);
    }

    /// Move the cursor to tick 0.
    pub fn reset(&mut self) {
        self.tick = 0;
        if self.is_running() {
            self.next_fire_time = self.sink.now();
        }
        self.publish_position();
    }

    /// Move the cursor to `tick`, wrapped into the current pattern's loop.
    pub fn set_position(&mut self, tick: Tick) -> Result<(), EngineError> {
        let total = self.pattern.as_ref().ok_or(EngineError::NoPattern)?.total_ticks();
        self.tick = tick % total;
        if self.is_running() {
            self.next_fire_time = self.sink.now();
        }
        self.publish_position();
        Ok(())
    }

    /// Change the tempo. Notes already handed to the sink keep their times.
    pub fn set_tempo(&mut self, bpm: f64) -> Result<(), EngineError> {
        if !tempo_in_range(bpm) {
            return Err(EngineError::InvalidTempo(bpm));
        }
        log::debug!("tempo {} -> {} BPM", self.bpm, bpm);
        self.bpm = bpm;
        Ok(())
    }

    /// Swap the pattern. Rebuilds the index and wraps the cursor into the
    /// new loop; the tempo is left alone.
    pub fn set_pattern(&mut self, pattern: Pattern) -> Result<(), EngineError> {
        pattern.validate()?;
        self.index = EventIndex::build(&pattern);
        self.tick %= self.index.total_ticks();
        log::debug!("pattern '{}' loaded, {} events", pattern.name, self.index.len());
        self.pattern = Some(pattern);
        self.publish_position();
        Ok(())
    }

    /// Play kit pad `pad` right now, running or not.
    pub fn trigger_pad(&mut self, pad: i16, velocity: u8) -> Option<VoiceHandle> {
        self.collect_finished();
        let event = TrackEvent::Drum(DrumHit { pad, velocity });
        let now = self.sink.now();
        let voice = voice_for(&self.kit, &self.samples, self.bpm, &event, now)?;
        let handle = self.voices.admit(&mut self.sink, voice)?;
        if let VoiceSource::Pad(pad) = voice.source {
            self.observer.pads_triggered(&[bank_relative(pad as usize)]);
        }
        Some(handle)
    }

    /// Stop every live voice in mute group `group`.
    pub fn stop_mute_group(&mut self, group: u8) {
        self.voices.stop_group(&mut self.sink, group);
    }

    /// Release voices the sink reports as finished. Returns how many.
    pub fn collect_finished(&mut self) -> usize {
        let mut count = 0;
        while let Some(handle) = self.sink.poll_finished() {
            self.voices.release(handle);
            count += 1;
        }
        count
    }

    /// One scheduling pass. Returns the number of voices scheduled.
    pub fn pass(&mut self) -> usize {
        self.collect_finished();
        if !self.is_running() {
            return 0;
        }
        let total = self.index.total_ticks();
        if total == 0 {
            return 0;
        }

        let horizon = self.sink.now() + self.config.schedule_ahead;
        let mut scheduled = 0;
        while self.next_fire_time < horizon {
            scheduled += self.fire_tick();
            self.publish_position();

            self.next_fire_time += seconds_per_tick(self.bpm);
            self.tick += 1;
            if self.tick >= total {
                self.tick = 0;
                self.loops += 1;
                log::trace!("loop {} complete", self.loops);
            }
        }
        scheduled
    }

    /// Hand every event at the cursor to the allocator, timestamped at
    /// `next_fire_time`.
    fn fire_tick(&mut self) -> usize {
        let events = self.index.events_at(self.tick);
        if events.is_empty() {
            return 0;
        }
        self.triggered.clear();
        let mut count = 0;
        for event in events {
            let Some(voice) = voice_for(&self.kit, &self.samples, self.bpm, event, self.next_fire_time)
            else {
                continue;
            };
            if self.voices.admit(&mut self.sink, voice).is_none() {
                log::warn!("sink refused voice at tick {}", self.tick);
                continue;
            }
            count += 1;
            if let VoiceSource::Pad(pad) = voice.source {
                self.triggered.push(bank_relative(pad as usize));
            }
        }
        if !self.triggered.is_empty() {
            self.observer.pads_triggered(&self.triggered);
        }
        log::trace!("tick {}: {} voices at {:.4}s", self.tick, count, self.next_fire_time);
        count
    }

    fn publish_position(&mut self) {
        let position = self.position();
        self.observer.position_changed(position);
    }
}

/// Map one event to a voice request. `None` (with a warning) if the kit has
/// no such pad or its sound was never loaded.
fn voice_for(
    kit: &Kit,
    samples: &SampleCache,
    bpm: f64,
    event: &TrackEvent,
    start_time: f64,
) -> Option<NewVoice> {
    match *event {
        TrackEvent::Drum(hit) => {
            let Some(pad) = kit.pad(hit.pad) else {
                log::warn!("pad {} is not assigned in kit '{}', skipping", hit.pad, kit.name);
                return None;
            };
            let Some(sound) = samples.resolve(&pad.instrument) else {
                log::warn!("pad {}: instrument '{}' is not loaded, skipping", hit.pad, pad.instrument);
                return None;
            };
            Some(NewVoice {
                request: VoiceRequest {
                    sound,
                    start_time,
                    gain: params::gain(hit.velocity, pad.level),
                    playback_rate: params::playback_rate(pad.semitones()),
                    pan: params::pan(pad.pan),
                    stop_time: None,
                    bus: Bus::Drum,
                },
                source: VoiceSource::Pad(hit.pad as u16),
                mute_group: pad.mute_group,
            })
        }
        TrackEvent::Bass(note) => {
            let instrument = &kit.bass_tone.instrument;
            let Some(sound) = samples.resolve(instrument) else {
                log::warn!("bass tone '{}' is not loaded, skipping", instrument);
                return None;
            };
            let stop_time = note
                .duration
                .map(|ticks| start_time + ticks as f64 * seconds_per_tick(bpm));
            Some(NewVoice {
                request: VoiceRequest {
                    sound,
                    start_time,
                    gain: params::gain(note.velocity, kit.bass_level),
                    playback_rate: params::playback_rate(note.semitones as f64),
                    pan: 0.0,
                    stop_time,
                    bus: Bus::Bass,
                },
                source: VoiceSource::Bass,
                mute_group: None,
            })
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::testing::{ManualSink, Recorder};
    use gb_ir::{instrument_ref, BassTone, NoteEvent, PadAssignment, TimeSignature};

    const SPT_120: f64 = 60.0 / 120.0 / 96.0;

    fn kit() -> Kit {
        let mut kit = Kit::new("test", BassTone::new("bass_finger"));
        kit.pads.push(PadAssignment::new("kick1"));
        kit.pads.push(PadAssignment::new("hat_closed").with_mute_group(1));
        kit.pads.push(PadAssignment::new("hat_open").with_mute_group(1));
        let mut snare = PadAssignment::new("snare1");
        snare.pitch = 12;
        snare.pan = -25;
        snare.level = 50;
        kit.pads.push(snare);
        kit.pads.push(PadAssignment::new("missing"));
        kit
    }

    fn scheduler() -> (Scheduler<ManualSink>, Recorder) {
        let mut sink = ManualSink::new();
        let mut cache = SampleCache::new();
        for name in ["kick1", "hat_closed", "hat_open", "snare1", "bass_finger"] {
            cache.insert(instrument_ref(name), sink.sound());
        }
        let mut scheduler = Scheduler::new(sink, EngineConfig::default());
        *scheduler.samples_mut() = cache;
        scheduler.set_kit(kit());
        let recorder = Recorder::default();
        scheduler.set_observer(Box::new(recorder.clone()));
        (scheduler, recorder)
    }

    fn pattern(measures: u16) -> Pattern {
        Pattern::new("test", TimeSignature::default(), measures, 120.0)
    }

    /// Run passes every 25 ms until the sink clock reaches `until`.
    fn run_until(s: &mut Scheduler<ManualSink>, until: f64) {
        while s.sink().now() < until {
            s.pass();
            s.sink_mut().advance(0.025);
        }
    }

    #[test]
    fn start_anchors_to_sink_clock() {
        let (mut s, _) = scheduler();
        s.sink_mut().clock = 1.0;
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        s.start(p).unwrap();
        assert!(s.is_running());
        assert_eq!(s.pass(), 1);
        assert_eq!(s.sink().start_times(), [1.0]);
    }

    #[test]
    fn pass_covers_lookahead_horizon() {
        let (mut s, _) = scheduler();
        s.start(pattern(1)).unwrap();
        s.pass();
        // ticks 0..=19 fire before 0.1 s at 120 BPM
        assert_eq!(s.current_tick(), 20);
        assert!(s.next_fire_time() >= 0.1);
        assert!(s.next_fire_time() - 0.1 < SPT_120);
    }

    #[test]
    fn event_fires_at_exact_tick_time() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(96, 0, 100));
        s.start(p).unwrap();
        run_until(&mut s, 1.0);
        let times = s.sink().start_times();
        assert_eq!(times.len(), 1);
        assert!((times[0] - 96.0 * SPT_120).abs() < 1e-9);
    }

    #[test]
    fn cursor_wraps_exactly_once_after_full_loop() {
        let (mut s, recorder) = scheduler();
        s.start(pattern(2)).unwrap();
        let loop_secs = 768.0 * SPT_120;
        run_until(&mut s, loop_secs + 0.5);
        let ticks = recorder.ticks();
        // first entry is the position published by start
        let advanced = &ticks[1..];
        assert!(advanced.len() > 768);
        assert!(advanced[..768].iter().copied().eq(0..768));
        assert_eq!(advanced[768], 0);
        assert_eq!(s.loop_count(), 1);
    }

    #[test]
    fn looping_repeats_events() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        s.start(p).unwrap();
        run_until(&mut s, 2.0 * 384.0 * SPT_120 + 0.01);
        let times = s.sink().start_times();
        assert_eq!(times.len(), 3);
        assert!((times[1] - 384.0 * SPT_120).abs() < 1e-9);
    }

    #[test]
    fn tempo_change_keeps_committed_times() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        for tick in 0..40 {
            p.drum_track.push(NoteEvent::new(tick, 0, 100));
        }
        s.start(p).unwrap();
        s.pass();
        let before = s.sink().start_times();
        assert_eq!(before.len(), 20);

        s.set_tempo(60.0).unwrap();
        s.sink_mut().advance(0.025);
        s.pass();
        let after = s.sink().start_times();
        assert_eq!(&after[..20], &before[..]);
        assert!((after[20] - 20.0 * SPT_120).abs() < 1e-9);
        assert!((after[21] - after[20] - 60.0 / 60.0 / 96.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_tempo_rejected() {
        let (mut s, _) = scheduler();
        assert_eq!(s.set_tempo(300.0), Err(EngineError::InvalidTempo(300.0)));
        assert_eq!(s.set_tempo(10.0), Err(EngineError::InvalidTempo(10.0)));
        assert_eq!(s.tempo(), 120.0);
    }

    #[test]
    fn degenerate_pattern_rejected() {
        let (mut s, _) = scheduler();
        let err = s.start(pattern(0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern(_)));
        assert!(!s.is_running());
        assert!(s.pattern().is_none());
    }

    #[test]
    fn malformed_note_is_skipped_and_rest_plays() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        p.drum_track.push(NoteEvent::new(10, 0, 0));
        p.drum_track.push(NoteEvent::new(96, 0, 100));
        p.bass_track.push(NoteEvent::new(500, 0, 100));
        s.start(p).unwrap();
        assert!(s.is_running());

        run_until(&mut s, 0.6);
        let times = s.sink().start_times();
        assert_eq!(times.len(), 2);
        assert!((times[1] - 96.0 * SPT_120).abs() < 1e-9);
    }

    #[test]
    fn start_while_running_is_noop() {
        let (mut s, _) = scheduler();
        s.start(pattern(1)).unwrap();
        s.pass();
        let tick = s.current_tick();
        let mut other = pattern(4);
        other.tempo_bpm = 90.0;
        s.start(other).unwrap();
        assert_eq!(s.pattern().unwrap().measures, 1);
        assert_eq!(s.tempo(), 120.0);
        assert_eq!(s.current_tick(), tick);
    }

    #[test]
    fn stop_silences_and_keeps_cursor() {
        let (mut s, recorder) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        p.drum_track.push(NoteEvent::new(1, 3, 100));
        s.start(p).unwrap();
        s.pass();
        assert_eq!(s.active_voice_count(), 2);
        let tick = s.current_tick();

        s.stop();
        assert!(!s.is_running());
        assert_eq!(s.active_voice_count(), 0);
        assert_eq!(s.sink().stopped.len(), 2);
        assert_eq!(s.current_tick(), tick);
        assert_eq!(recorder.last_pads(), Some(Vec::new()));

        s.sink_mut().advance(1.0);
        assert_eq!(s.pass(), 0);
        assert_eq!(s.current_tick(), tick);
    }

    #[test]
    fn restart_resumes_from_cursor() {
        let (mut s, _) = scheduler();
        s.start(pattern(1)).unwrap();
        s.pass();
        s.stop();
        s.sink_mut().clock = 5.0;
        s.start(pattern(1)).unwrap();
        assert_eq!(s.current_tick(), 20);
        assert_eq!(s.next_fire_time(), 5.0);
    }

    #[test]
    fn set_position_reports_measure_and_beat() {
        let (mut s, recorder) = scheduler();
        s.set_pattern(pattern(2)).unwrap();
        s.set_position(200).unwrap();
        let pos = s.position();
        assert_eq!((pos.measure, pos.beat), (1, 3));
        assert_eq!(recorder.last_position(), Some(pos));

        s.set_position(900).unwrap();
        assert_eq!(s.current_tick(), 132);
    }

    #[test]
    fn set_position_without_pattern_fails() {
        let (mut s, _) = scheduler();
        assert_eq!(s.set_position(10), Err(EngineError::NoPattern));
    }

    #[test]
    fn set_position_while_running_reanchors() {
        let (mut s, _) = scheduler();
        s.start(pattern(1)).unwrap();
        s.pass();
        s.sink_mut().clock = 3.0;
        s.set_position(96).unwrap();
        assert_eq!(s.next_fire_time(), 3.0);
        assert_eq!(s.position().beat, 2);
    }

    #[test]
    fn reset_returns_to_start() {
        let (mut s, _) = scheduler();
        s.start(pattern(1)).unwrap();
        s.pass();
        s.reset();
        assert_eq!(s.current_tick(), 0);
        assert_eq!(s.position(), Position::start());
    }

    #[test]
    fn drum_parameters_come_from_pad() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 3, 127));
        s.start(p).unwrap();
        s.pass();
        let (_, req) = s.sink().scheduled[0];
        assert!((req.playback_rate - 2.0).abs() < 1e-12);
        assert_eq!(req.pan, -0.5);
        assert!((req.gain - 0.5).abs() < 1e-6);
        assert_eq!(req.stop_time, None);
        assert_eq!(req.bus, Bus::Drum);
    }

    #[test]
    fn bass_uses_offset_level_and_duration() {
        let (mut s, _) = scheduler();
        let mut kit = kit();
        kit.bass_level = 50;
        s.set_kit(kit);
        let mut p = pattern(1);
        p.bass_track.push(NoteEvent::with_duration(0, 12, 127, 48));
        s.start(p).unwrap();
        s.pass();
        let (_, req) = s.sink().scheduled[0];
        assert!((req.playback_rate - 2.0).abs() < 1e-12);
        assert!((req.gain - 0.5).abs() < 1e-6);
        assert_eq!(req.bus, Bus::Bass);
        let stop = req.stop_time.unwrap();
        assert!((stop - 48.0 * SPT_120).abs() < 1e-9);
    }

    #[test]
    fn drum_fires_before_bass_on_same_tick() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.bass_track.push(NoteEvent::new(0, 0, 100));
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        s.start(p).unwrap();
        s.pass();
        let buses: Vec<Bus> = s.sink().scheduled.iter().map(|(_, r)| r.bus).collect();
        assert_eq!(buses, [Bus::Drum, Bus::Bass]);
    }

    #[test]
    fn unresolvable_events_are_skipped() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 4, 100)); // sound not loaded
        p.drum_track.push(NoteEvent::new(0, 59, 100)); // pad not assigned
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        s.start(p).unwrap();
        assert_eq!(s.pass(), 1);
        assert!(s.is_running());
    }

    #[test]
    fn mute_group_in_pattern() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 1, 100));
        p.drum_track.push(NoteEvent::new(4, 2, 100));
        s.start(p).unwrap();
        s.pass();
        let first = s.sink().scheduled[0].0;
        assert_eq!(s.sink().stopped, [first]);
        assert_eq!(s.active_voice_count(), 1);
    }

    #[test]
    fn finished_voices_are_released() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        s.start(p).unwrap();
        s.pass();
        let handle = s.sink().scheduled[0].0;
        s.sink_mut().finish(handle);
        s.sink_mut().finish(handle);
        assert_eq!(s.collect_finished(), 2);
        assert_eq!(s.active_voice_count(), 0);
    }

    #[test]
    fn triggered_pads_are_bank_relative() {
        let (mut s, recorder) = scheduler();
        let mut kit = kit();
        while kit.pads.len() < 24 {
            kit.pads.push(PadAssignment::new("kick1"));
        }
        s.set_kit(kit);
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 23, 100));
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        s.start(p).unwrap();
        s.pass();
        assert_eq!(recorder.last_pads(), Some(vec![3, 0]));
    }

    #[test]
    fn pattern_swap_wraps_cursor() {
        let (mut s, _) = scheduler();
        s.start(pattern(2)).unwrap();
        s.set_position(500).unwrap();
        s.set_tempo(100.0).unwrap();
        s.set_pattern(pattern(1)).unwrap();
        assert_eq!(s.current_tick(), 500 % 384);
        assert_eq!(s.tempo(), 100.0);
        assert!(s.is_running());
    }

    #[test]
    fn trigger_pad_plays_now_when_stopped() {
        let (mut s, recorder) = scheduler();
        s.sink_mut().clock = 2.5;
        let handle = s.trigger_pad(0, 127).unwrap();
        assert_eq!(s.sink().scheduled[0].0, handle);
        assert_eq!(s.sink().start_times(), [2.5]);
        assert_eq!(recorder.last_pads(), Some(vec![0]));
        assert!(s.trigger_pad(50, 127).is_none());
    }

    #[test]
    fn stop_mute_group_only_hits_that_group() {
        let (mut s, _) = scheduler();
        s.trigger_pad(0, 100);
        s.trigger_pad(1, 100);
        s.stop_mute_group(1);
        assert_eq!(s.active_voice_count(), 1);
    }

    #[test]
    fn late_wake_catches_up() {
        let (mut s, _) = scheduler();
        let mut p = pattern(1);
        p.drum_track.push(NoteEvent::new(0, 0, 100));
        p.drum_track.push(NoteEvent::new(96, 0, 100));
        s.start(p).unwrap();
        s.sink_mut().clock = 1.0;
        assert_eq!(s.pass(), 2);
        assert!(s.next_fire_time() >= 1.1);
    }
}
