//! # Beatfinder
//!
//! Find the beats of a song and turn them into timeline guides for video
//! editors such as Kdenlive.
//!
//! Each detected beat becomes one guide line `<timestamp> <index>`, where the
//! timestamp is the beat position shifted by a user supplied offset.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use beatfinder::{
//!     audio::DynamicBeatTracker,
//!     config::AnalysisParameters,
//!     pipeline::{run_single, ConsoleReporter},
//! };
//!
//! # fn main() -> beatfinder::Result<()> {
//! let tracker = DynamicBeatTracker::new();
//! let params = AnalysisParameters::default();
//! let reporter = ConsoleReporter::new(false);
//!
//! let outcome = run_single(&tracker, Path::new("song.wav"), None, &params, &reporter)?;
//! println!("written: {}", outcome.is_written());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`audio`] - Decoding and beat tracking
//! - [`guide`] - Timecodes and the guide file format
//! - [`pipeline`] - Single-file and batch drivers
//! - [`config`] - Tracker tuning and run parameters
//!
//! ## Custom Trackers
//!
//! Anything implementing [`BeatTracker`](audio::BeatTracker) can drive the
//! pipeline:
//!
//! ```rust
//! use beatfinder::audio::{BeatEstimate, BeatTracker};
//!
//! struct Metronome;
//!
//! impl BeatTracker for Metronome {
//!     fn track(
//!         &self,
//!         samples: &[f32],
//!         sample_rate: u32,
//!         _tempo_hint: Option<f64>,
//!         _tightness: f64,
//!     ) -> beatfinder::Result<BeatEstimate> {
//!         let seconds = samples.len() as f64 / sample_rate as f64;
//!         let beat_times = (0..).map(|i| i as f64 * 0.5).take_while(|&t| t < seconds).collect();
//!         Ok(BeatEstimate { tempo: 120.0, beat_times })
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "metronome"
//!     }
//! }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod guide;
pub mod pipeline;

pub use crate::{
    audio::{BeatTracker, DynamicBeatTracker},
    config::{AnalysisParameters, Config},
    error::{BeatfinderError, Result},
    guide::Timecode,
};
