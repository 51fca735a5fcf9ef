use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;

use beatfinder::audio::ClickTrack;

/// Writes a metronome-style WAV with clicks at a fixed tempo
#[derive(Parser)]
#[command(name = "click-track", version)]
struct Args {
    /// Where to write the WAV file
    output: PathBuf,

    /// Tempo of the clicks [beats per minute]
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,

    /// Length of the track in seconds
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Sample rate in Hz
    #[arg(long = "sample_rate", default_value_t = ClickTrack::DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// Position of the first click in seconds
    #[arg(long, default_value_t = 0.0)]
    start: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    ensure!(
        args.bpm.is_finite() && args.bpm > 0.0,
        "BPM must be positive, got {}",
        args.bpm
    );
    ensure!(
        args.seconds.is_finite() && args.seconds > 0.0,
        "Length must be positive, got {}",
        args.seconds
    );
    ensure!(args.sample_rate > 0, "Sample rate must be positive");
    ensure!(args.start >= 0.0, "Start must not be negative, got {}", args.start);

    let track = ClickTrack::new(args.bpm, args.seconds)
        .with_sample_rate(args.sample_rate)
        .with_start(args.start);
    track.write_wav(&args.output)?;

    println!(
        "Wrote {} clicks at {} BPM to {}",
        track.beat_times().len(),
        args.bpm,
        args.output.display()
    );
    Ok(())
}
