//! # Audio Analysis Module
//!
//! Decodes audio files and finds their beats.
//!
//! ## Core Features
//!
//! - **Decoding**: WAV through `hound`, MP3/FLAC through `symphonia`
//! - **Onset Detection**: spectral flux over a centred STFT
//! - **Tempo Estimation**: autocorrelation weighted by a tempo prior
//! - **Beat Tracking**: dynamic programming over the onset envelope, behind
//!   the swappable [`BeatTracker`] trait
//!
//! ## Usage
//!
//! ```rust,no_run
//! use beatfinder::audio::{AudioLoader, BeatTracker, DynamicBeatTracker};
//!
//! # fn main() -> beatfinder::Result<()> {
//! let audio = AudioLoader::load("song.wav")?;
//! let tracker = DynamicBeatTracker::new();
//! let estimate = tracker.track(&audio.mono_samples(), audio.sample_rate, None, 100.0)?;
//!
//! println!("Detected BPM: {:.2}", estimate.tempo);
//! println!("Found {} beats", estimate.beat_times.len());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod onset;
pub mod synth;
pub mod tempo;
pub mod tracker;
pub mod types;

pub use loader::{AudioLoader, SUPPORTED_EXTENSIONS};
pub use synth::ClickTrack;
pub use tracker::{BeatTracker, DynamicBeatTracker};
pub use types::{AudioData, BeatEstimate};
