//! Headless controller for the groovebox sequencer.
//!
//! Owns a [`Scheduler`] on a dedicated control thread and drives its
//! periodic wake. Callers talk to it through [`Controller`]; every command
//! that can fail is validated on the control thread and answered before the
//! call returns.

mod error;
mod render;
mod samples;
mod transport;

use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use gb_audio::mixer::level_to_gain;
use gb_audio::{AudioError, CpalSink, SampleLoader};
use gb_engine::{AudioSink, EngineError, Scheduler};

// Re-export common types so callers don't need the lower crates directly.
pub use error::ControllerError;
pub use gb_engine::{Bus, EngineConfig};
pub use gb_formats::{load_session, load_session_file, FormatError, Session};
pub use gb_ir::{analyze_pattern, seconds_per_tick, Frame, Kit, Pattern, Position, Tick};
pub use render::{render_frames, render_to_wav};
pub use samples::{load_sample_dir, SampleSet};
pub use transport::{Transport, PAD_FLASH};

use samples::install;
use transport::TransportPublisher;

type Reply<T> = Sender<T>;

enum Command {
    Start(Pattern, Reply<Result<(), EngineError>>),
    Stop(Reply<()>),
    Reset(Reply<()>),
    SetPosition(Tick, Reply<Result<(), EngineError>>),
    SetTempo(f64, Reply<Result<(), EngineError>>),
    SetPattern(Pattern, Reply<Result<(), EngineError>>),
    SetKit(Kit),
    TriggerPad(i16, u8, Reply<bool>),
    StopMuteGroup(u8),
    BusLevel(Bus, u8),
    MasterLevel(u8),
    LoadSamples(SampleSet, Reply<usize>),
    ClearSamples,
    Shutdown,
}

/// Handle to a running control thread. Dropping it stops playback.
pub struct Controller {
    commands: Sender<Command>,
    transport: Arc<Transport>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    /// Start a controller playing through the default output device.
    pub fn open_default(config: EngineConfig) -> Result<Self, ControllerError> {
        Self::spawn(config, CpalSink::open)
    }

    /// Start a controller on a sink built by `make_sink`. The sink is
    /// created on the control thread and never leaves it.
    pub fn spawn<S, F>(config: EngineConfig, make_sink: F) -> Result<Self, ControllerError>
    where
        S: AudioSink + SampleLoader + 'static,
        F: FnOnce() -> Result<S, AudioError> + Send + 'static,
    {
        if !config.horizon_covers_wake() {
            log::warn!(
                "schedule-ahead {}s is shorter than the {:?} wake interval",
                config.schedule_ahead,
                config.wake_interval
            );
        }
        let (commands, command_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);
        let transport = Arc::new(Transport::new());
        let shared = transport.clone();

        let thread = std::thread::Builder::new()
            .name("gb-control".into())
            .spawn(move || {
                let sink = match make_sink() {
                    Ok(sink) => sink,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                control_thread(Scheduler::new(sink, config), command_rx, shared);
            })
            .map_err(ControllerError::Spawn)?;

        ready_rx.recv().map_err(|_| ControllerError::Disconnected)??;
        Ok(Self {
            commands,
            transport,
            thread: Some(thread),
        })
    }

    // --- Transport ---

    /// Start looping `pattern`. No-op if already running.
    pub fn start(&self, pattern: Pattern) -> Result<(), ControllerError> {
        Ok(self.request(|reply| Command::Start(pattern, reply))??)
    }

    /// Stop playback and silence every voice. Applied before returning.
    pub fn stop(&self) -> Result<(), ControllerError> {
        self.request(Command::Stop)
    }

    /// Move the cursor back to tick 0. Applied before returning.
    pub fn reset(&self) -> Result<(), ControllerError> {
        self.request(Command::Reset)
    }

    pub fn set_position(&self, tick: Tick) -> Result<(), ControllerError> {
        Ok(self.request(|reply| Command::SetPosition(tick, reply))??)
    }

    pub fn set_tempo(&self, bpm: f64) -> Result<(), ControllerError> {
        Ok(self.request(|reply| Command::SetTempo(bpm, reply))??)
    }

    /// Swap the pattern, running or not.
    pub fn set_pattern(&self, pattern: Pattern) -> Result<(), ControllerError> {
        Ok(self.request(|reply| Command::SetPattern(pattern, reply))??)
    }

    pub fn set_kit(&self, kit: Kit) -> Result<(), ControllerError> {
        self.send(Command::SetKit(kit))
    }

    /// Play a kit pad immediately. Returns whether a voice started.
    pub fn trigger_pad(&self, pad: i16, velocity: u8) -> Result<bool, ControllerError> {
        self.request(|reply| Command::TriggerPad(pad, velocity, reply))
    }

    pub fn stop_mute_group(&self, group: u8) -> Result<(), ControllerError> {
        self.send(Command::StopMuteGroup(group))
    }

    // --- Mixer ---

    /// Set a bus level, 0-100.
    pub fn set_bus_level(&self, bus: Bus, level: u8) -> Result<(), ControllerError> {
        self.send(Command::BusLevel(bus, level))
    }

    /// Set the master level, 0-100.
    pub fn set_master_level(&self, level: u8) -> Result<(), ControllerError> {
        self.send(Command::MasterLevel(level))
    }

    // --- Samples ---

    /// Decode every WAV in `dir` and make it playable. Returns how many loaded.
    pub fn preload_samples(&self, dir: &Path) -> Result<usize, ControllerError> {
        let set = load_sample_dir(dir)?;
        self.load_samples(set)
    }

    /// Make already-decoded samples playable.
    pub fn load_samples(&self, samples: SampleSet) -> Result<usize, ControllerError> {
        self.request(|reply| Command::LoadSamples(samples, reply))
    }

    /// Forget every instrument mapping.
    pub fn clear_samples(&self) -> Result<(), ControllerError> {
        self.send(Command::ClearSamples)
    }

    // --- State ---

    pub fn is_running(&self) -> bool {
        self.transport.is_running()
    }

    pub fn position(&self) -> Position {
        self.transport.position()
    }

    pub fn current_tick(&self) -> Tick {
        self.transport.position().tick
    }

    pub fn active_voice_count(&self) -> usize {
        self.transport.active_voices()
    }

    /// Bank-relative pads triggered within the last [`PAD_FLASH`].
    pub fn active_pads(&self) -> Vec<u8> {
        self.transport.active_pads()
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    fn send(&self, command: Command) -> Result<(), ControllerError> {
        self.commands.send(command).map_err(|_| ControllerError::Disconnected)
    }

    fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, ControllerError> {
        let (reply, answer) = bounded(1);
        self.send(make(reply))?;
        answer.recv().map_err(|_| ControllerError::Disconnected)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

fn control_thread<S: AudioSink + SampleLoader>(
    mut scheduler: Scheduler<S>,
    commands: Receiver<Command>,
    transport: Arc<Transport>,
) {
    scheduler.set_observer(Box::new(TransportPublisher(transport.clone())));
    let ticker = crossbeam_channel::tick(scheduler.config().wake_interval);
    let idle = crossbeam_channel::never();
    log::debug!("control thread up");

    loop {
        // armed while running, or while stopped voices still need reaping
        let wake = if scheduler.is_running() || scheduler.active_voice_count() > 0 {
            &ticker
        } else {
            &idle
        };
        select! {
            recv(commands) -> msg => match msg {
                Ok(Command::Shutdown) | Err(_) => break,
                Ok(command) => handle(&mut scheduler, &transport, command),
            },
            recv(wake) -> _ => {
                scheduler.pass();
            }
        }
        publish(&scheduler, &transport);
    }

    scheduler.stop();
    publish(&scheduler, &transport);
    log::debug!("control thread down");
}

fn handle<S: AudioSink + SampleLoader>(scheduler: &mut Scheduler<S>, transport: &Transport, command: Command) {
    match command {
        Command::Start(pattern, reply) => {
            let result = scheduler.start(pattern);
            if result.is_ok() {
                scheduler.pass();
            }
            publish(scheduler, transport);
            let _ = reply.send(result);
        }
        Command::Stop(reply) => {
            scheduler.stop();
            publish(scheduler, transport);
            let _ = reply.send(());
        }
        Command::Reset(reply) => {
            scheduler.reset();
            publish(scheduler, transport);
            let _ = reply.send(());
        }
        Command::SetPosition(tick, reply) => {
            let _ = reply.send(scheduler.set_position(tick));
        }
        Command::SetTempo(bpm, reply) => {
            let _ = reply.send(scheduler.set_tempo(bpm));
        }
        Command::SetPattern(pattern, reply) => {
            let _ = reply.send(scheduler.set_pattern(pattern));
        }
        Command::SetKit(kit) => scheduler.set_kit(kit),
        Command::TriggerPad(pad, velocity, reply) => {
            let started = scheduler.trigger_pad(pad, velocity).is_some();
            publish(scheduler, transport);
            let _ = reply.send(started);
        }
        Command::StopMuteGroup(group) => scheduler.stop_mute_group(group),
        Command::BusLevel(bus, level) => scheduler.sink_mut().set_bus_gain(bus, level_to_gain(level)),
        Command::MasterLevel(level) => scheduler.sink_mut().set_master_gain(level_to_gain(level)),
        Command::LoadSamples(set, reply) => {
            let (sink, cache) = scheduler.sink_and_samples_mut();
            let _ = reply.send(install(sink, cache, set));
        }
        Command::ClearSamples => scheduler.samples_mut().clear(),
        Command::Shutdown => {}
    }
}

fn publish<S: AudioSink>(scheduler: &Scheduler<S>, transport: &Transport) {
    transport.set_running(scheduler.is_running());
    transport.set_voices(scheduler.active_voice_count());
}
