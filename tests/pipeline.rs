//! End-to-end tests for the beatfinder pipeline and CLI
//!
//! Fixtures are synthetic click tracks written into temporary directories.

use std::fs;
use std::path::Path;
use std::process::Command;

use beatfinder::{
    audio::{ClickTrack, DynamicBeatTracker},
    config::AnalysisParameters,
    guide::Timecode,
    pipeline::{run_batch, run_single, BatchOutcome, FileOutcome, FileProcessor, SilentReporter},
};
use tempfile::TempDir;

/// Parse a guide line back into (seconds, index)
fn parse_guide_line(line: &str) -> (f64, usize) {
    let (timestamp, index) = line.split_once(' ').expect("line has a space");
    let (clock, fraction) = match timestamp.split_once('.') {
        Some((clock, fraction)) => {
            assert_eq!(fraction.len(), 6, "fraction of {:?} must have 6 digits", line);
            (clock, format!("0.{}", fraction).parse::<f64>().unwrap())
        }
        None => (timestamp, 0.0),
    };

    let fields: Vec<&str> = clock.split(':').collect();
    assert_eq!(fields.len(), 3, "{:?} is not H:MM:SS", line);
    assert_eq!(fields[1].len(), 2);
    assert_eq!(fields[2].len(), 2);

    let hours: f64 = fields[0].parse().unwrap();
    let minutes: f64 = fields[1].parse().unwrap();
    let seconds: f64 = fields[2].parse().unwrap();

    (hours * 3600.0 + minutes * 60.0 + seconds + fraction, index.parse().unwrap())
}

fn read_guides(path: &Path) -> Vec<(f64, usize)> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(parse_guide_line)
        .collect()
}

#[test]
fn test_click_track_produces_offset_guides() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("clicks.wav");
    ClickTrack::new(120.0, 10.0).with_start(0.25).write_wav(&input).unwrap();

    let tracker = DynamicBeatTracker::new();
    let params = AnalysisParameters {
        offset: Timecode::parse("0:01:00").unwrap(),
        ..Default::default()
    };

    let outcome = run_single(&tracker, &input, None, &params, &SilentReporter).unwrap();
    let summary = match outcome {
        FileOutcome::Written(summary) => summary,
        FileOutcome::Failed { error, .. } => panic!("tracking failed: {}", error),
    };
    assert_eq!(summary.output, temp.path().join("clicks.wav_beats.txt"));
    assert!((110.0..130.0).contains(&summary.tempo), "tempo {:.2}", summary.tempo);

    let guides = read_guides(&summary.output);
    assert_eq!(guides.len(), summary.beats);
    assert!(guides.len() >= 14, "only {} guides", guides.len());

    for (i, (seconds, index)) in guides.iter().enumerate() {
        assert_eq!(*index, i);
        assert!(*seconds >= 60.0, "guide {} at {:.3}s is before the offset", i, seconds);
        assert!(*seconds < 70.5);
    }
    assert!(guides.windows(2).all(|pair| pair[0].0 < pair[1].0));
}

#[test]
fn test_batch_over_click_tracks() {
    let temp = TempDir::new().unwrap();
    let input_dir = temp.path().join("music");
    let output_dir = temp.path().join("guides").join("nested");
    fs::create_dir(&input_dir).unwrap();

    ClickTrack::new(100.0, 6.0).write_wav(input_dir.join("slow.wav")).unwrap();
    ClickTrack::new(140.0, 6.0).write_wav(input_dir.join("fast.WAV")).unwrap();
    fs::write(input_dir.join("broken.flac"), b"definitely not flac").unwrap();
    fs::write(input_dir.join("readme.txt"), b"ignore me").unwrap();

    let tracker = DynamicBeatTracker::new();
    let params = AnalysisParameters::default();
    let processor = FileProcessor::new(&tracker, &params, &SilentReporter);

    let outcome = run_batch(&processor, &input_dir, &output_dir).unwrap();
    let report = match outcome {
        BatchOutcome::Completed(report) => report,
        other => panic!("unexpected outcome {:?}", other),
    };
    assert_eq!(report.processed, 3);
    assert_eq!(report.written, 2);

    assert!(!read_guides(&output_dir.join("slow_beats.txt")).is_empty());
    assert!(!read_guides(&output_dir.join("fast_beats.txt")).is_empty());
    assert!(!output_dir.join("broken_beats.txt").exists());
    assert!(!output_dir.join("readme_beats.txt").exists());
}

#[test]
fn test_cli_missing_input_exits_with_failure() {
    let temp = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_beatfinder"))
        .arg("missing.wav")
        .current_dir(temp.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("File 'missing.wav' not found."));
}

#[test]
fn test_cli_rejects_malformed_offset() {
    let temp = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_beatfinder"))
        .args(["song.wav", "--offset", "1:2"])
        .current_dir(temp.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_rejects_second_sixty_in_offset() {
    let temp = TempDir::new().unwrap();
    for offset in ["0:00:60", "23:59:60"] {
        let output = Command::new(env!("CARGO_BIN_EXE_beatfinder"))
            .args(["song.wav", "--offset", offset])
            .current_dir(temp.path())
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(2), "offset {} should be rejected", offset);
    }
}

#[test]
fn test_cli_batch_without_audio_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), b"nothing to see").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_beatfinder"))
        .args(["--mode", "batch", "--output_dir", "out", "--quiet"])
        .current_dir(temp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No supported audio files found"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_cli_single_run_with_explicit_output() {
    let temp = TempDir::new().unwrap();
    ClickTrack::new(120.0, 6.0)
        .write_wav(temp.path().join("song.wav"))
        .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_beatfinder"))
        .args(["song.wav", "--output_file", "guides.txt", "--bpm", "120", "--offset", "0:00:10"])
        .current_dir(temp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Analyzing song.wav..."));
    assert!(stdout.contains("song.wav BPM: 120.00"));
    assert!(stdout.contains("Writing timeline guides to guides.txt..."));

    let guides = read_guides(&temp.path().join("guides.txt"));
    assert!(!guides.is_empty());
    assert!(guides.iter().all(|(seconds, _)| *seconds >= 10.0));
}

#[test]
fn test_cli_no_prompt_without_input() {
    let temp = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_beatfinder"))
        .arg("--no_prompt")
        .current_dir(temp.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input file given."));
}
