use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use beatfinder::{
    audio::DynamicBeatTracker,
    config::{AnalysisParameters, Config, DEFAULT_TIGHTNESS},
    error::{BeatfinderError, ValidationError},
    guide::Timecode,
    pipeline::{run_batch, run_single, BatchOutcome, ConsoleReporter, FileProcessor, Reporter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Process one file
    Single,
    /// Process every supported file in a directory
    Batch,
}

#[derive(Parser)]
#[command(
    name = "beatfinder",
    version,
    about = "Creates timeline guides matching the song beat",
    long_about = "Beatfinder detects the beats of a song and writes one timeline guide per beat, ready to be imported into Kdenlive."
)]
struct Cli {
    /// Input audio file (single mode; prompted for when missing)
    input_file: Option<PathBuf>,

    /// Output txt file for beat times (single mode only)
    #[arg(long = "output_file")]
    output_file: Option<PathBuf>,

    /// Initial BPM guess [float, beats per minute]
    #[arg(long)]
    bpm: Option<f64>,

    /// Offset to add to the beat times [HH:MM:SS]
    #[arg(long, default_value = "0:00:0")]
    offset: Timecode,

    /// Tightness of beat distribution around tempo
    #[arg(long, default_value_t = DEFAULT_TIGHTNESS)]
    tightness: f64,

    /// Processing mode
    #[arg(long, value_enum, default_value_t = Mode::Single)]
    mode: Mode,

    /// Directory scanned for audio files in batch mode
    #[arg(long = "input_dir", default_value = ".")]
    input_dir: PathBuf,

    /// Directory to save output files in batch mode
    #[arg(long = "output_dir", default_value = ".")]
    output_dir: PathBuf,

    /// Configuration file with [tracker] settings (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail instead of prompting when no input file is given
    #[arg(long = "no_prompt")]
    no_prompt: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Hide the batch progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = e
                .downcast_ref::<BeatfinderError>()
                .map(BeatfinderError::user_message)
                .unwrap_or_else(|| format!("{:#}", e));
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = if cli.verbose { "debug" } else { "error" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    debug!("Starting beatfinder v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(config_path) => {
            debug!("Loading configuration from {}", config_path.display());
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };

    let tracker = DynamicBeatTracker::with_config(config.tracker);
    let params = AnalysisParameters {
        tempo_hint: cli.bpm,
        tightness: cli.tightness,
        offset: cli.offset,
    };
    let reporter = ConsoleReporter::new(!cli.quiet);

    match cli.mode {
        Mode::Single => {
            let input = match &cli.input_file {
                Some(path) => path.clone(),
                None if cli.no_prompt => {
                    return Err(BeatfinderError::from(ValidationError::NoInputGiven).into())
                }
                None => prompt_for_input()?,
            };

            // Per-file failures were already logged; they do not change the exit code
            run_single(&tracker, &input, cli.output_file.as_deref(), &params, &reporter)?;
        }
        Mode::Batch => {
            if cli.input_file.is_some() || cli.output_file.is_some() {
                warn!("Input and output file arguments are ignored in batch mode");
            }

            let processor = FileProcessor::new(&tracker, &params, &reporter);
            match run_batch(&processor, &cli.input_dir, &cli.output_dir)? {
                BatchOutcome::NoFilesFound { input_dir } => {
                    reporter.message(&format!(
                        "No supported audio files found in {}.",
                        describe_dir(&input_dir)
                    ));
                }
                BatchOutcome::Completed(report) => {
                    debug!("{} of {} file(s) written", report.written, report.processed);
                    reporter.message(&format!(
                        "Batch processing completed. Processed {} file(s). Outputs saved to '{}'.",
                        report.processed,
                        report.output_dir.display()
                    ));
                }
            }
        }
    }

    Ok(())
}

fn prompt_for_input() -> Result<PathBuf> {
    print!("Enter the input file path: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let path = line.trim_end_matches(['\r', '\n']);
    if path.is_empty() {
        return Err(BeatfinderError::from(ValidationError::NoInputGiven).into());
    }
    Ok(PathBuf::from(path))
}

fn describe_dir(dir: &Path) -> String {
    if dir == Path::new(".") {
        "the current directory".to_string()
    } else {
        format!("'{}'", dir.display())
    }
}
