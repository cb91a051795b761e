//! groovebox CLI: headless playback and WAV export of a session file.
//!
//! Usage:
//!   gb-cli session.json --samples ./kit
//!   gb-cli session.json --samples ./kit --wav out.wav --seconds 8

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use gb_master::{analyze_pattern, load_sample_dir, load_session_file, render_to_wav, Controller, SampleSet};

#[derive(Parser, Debug)]
#[command(name = "gb-cli", about = "Play or render a groovebox pattern")]
struct Args {
    /// Session file (pattern + kit, JSON)
    session: PathBuf,

    /// Directory of WAV samples named after their instrument ids
    #[arg(long)]
    samples: Option<PathBuf>,

    /// Render to this WAV file instead of playing
    #[arg(long)]
    wav: Option<PathBuf>,

    /// How long to play or render, in seconds. Live playback runs until
    /// interrupted when omitted.
    #[arg(long)]
    seconds: Option<f64>,

    /// Override the pattern's tempo (BPM)
    #[arg(long)]
    tempo: Option<f64>,

    /// Sample rate for WAV export
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut session = load_session_file(&args.session)
        .with_context(|| format!("failed to load {}", args.session.display()))?;
    if let Some(bpm) = args.tempo {
        session.pattern.tempo_bpm = bpm;
    }

    println!("Pattern:  {}", session.pattern.name);
    println!("Kit:      {}", session.kit.name);
    println!();
    print!("{}", analyze_pattern(&session.pattern, &session.kit));
    println!();

    let samples = match &args.samples {
        Some(dir) => load_sample_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?,
        None => {
            log::warn!("no --samples directory given, playback will be silent");
            SampleSet::new()
        }
    };

    match &args.wav {
        Some(path) => {
            let seconds = args.seconds.unwrap_or_else(|| loop_seconds(&session.pattern));
            println!("Rendering {:.1}s to {} at {} Hz...", seconds, path.display(), args.sample_rate);
            let wav = render_to_wav(&session.pattern, &session.kit, &samples, args.sample_rate, seconds)?;
            std::fs::write(path, &wav).with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} bytes", wav.len());
        }
        None => play(session, samples, args.seconds)?,
    }
    Ok(())
}

fn play(session: gb_master::Session, samples: SampleSet, seconds: Option<f64>) -> anyhow::Result<()> {
    let ctrl = Controller::open_default(Default::default()).context("failed to open audio output")?;
    let loaded = ctrl.load_samples(samples)?;
    log::info!("{} samples ready", loaded);
    ctrl.set_kit(session.kit)?;
    ctrl.start(session.pattern)?;
    println!("Playing... (Ctrl-C to quit)");

    let deadline = seconds.map(|s| Instant::now() + Duration::from_secs_f64(s.max(0.0)));
    while deadline.map_or(true, |d| Instant::now() < d) {
        let pos = ctrl.position();
        print!(
            "\rMeasure: {:3} | Beat: {} | Voices: {:2}",
            pos.measure,
            pos.beat,
            ctrl.active_voice_count()
        );
        let _ = std::io::stdout().flush();
        std::thread::sleep(Duration::from_millis(10));
    }

    ctrl.stop()?;
    println!("\rDone.                                  ");
    Ok(())
}

fn loop_seconds(pattern: &gb_master::Pattern) -> f64 {
    pattern.total_ticks() as f64 * gb_master::seconds_per_tick(pattern.tempo_bpm)
}
