use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    guide::Timecode,
};

/// Default beat-phase strictness handed to the tracker
pub const DEFAULT_TIGHTNESS: f64 = 100.0;

/// Main configuration, loadable from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Beat tracker tuning
    pub tracker: TrackerConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()
    }
}

/// Tuning of the dynamic-programming beat tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// FFT size of the onset analysis
    pub n_fft: usize,

    /// Samples between successive onset frames
    pub hop_length: usize,

    /// Centre of the tempo prior (BPM)
    pub start_bpm: f64,

    /// Width of the tempo prior, in octaves
    pub std_bpm: f64,

    /// Fastest tempo the estimator may pick (BPM)
    pub max_tempo: f64,

    /// Autocorrelation window in seconds
    pub ac_size: f64,

    /// Drop weak beats at the start and end of the track
    pub trim: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            start_bpm: 120.0,
            std_bpm: 1.0,
            max_tempo: 320.0,
            ac_size: 8.0,
            trim: true,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_fft == 0 || !self.n_fft.is_power_of_two() {
            return Err(invalid("tracker.n_fft", self.n_fft));
        }

        if self.hop_length == 0 || self.hop_length > self.n_fft {
            return Err(invalid("tracker.hop_length", self.hop_length));
        }

        for (key, value) in [
            ("tracker.start_bpm", self.start_bpm),
            ("tracker.std_bpm", self.std_bpm),
            ("tracker.max_tempo", self.max_tempo),
            ("tracker.ac_size", self.ac_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(key, value));
            }
        }

        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> crate::error::BeatfinderError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

/// Per-run analysis parameters, shared read-only by every processed file
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParameters {
    /// Tempo to use instead of estimating one (BPM)
    pub tempo_hint: Option<f64>,

    /// How strictly beats must follow the tempo
    pub tightness: f64,

    /// Added to every emitted timestamp
    pub offset: Timecode,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            tempo_hint: None,
            tightness: DEFAULT_TIGHTNESS,
            offset: Timecode::ZERO,
        }
    }
}
