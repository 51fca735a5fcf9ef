use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the beatfinder library
#[derive(Error, Debug)]
pub enum BeatfinderError {
    #[error("Audio processing error: {0}")]
    Audio(#[from] AudioError),

    #[error("Beat tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Invalid offset: {0}")]
    Offset(#[from] OffsetError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Audio decoding errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load audio file '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("No audio could be decoded from '{path}'")]
    NoAudio { path: String },
}

/// Errors raised by a beat tracker
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Cannot track beats in an empty signal")]
    EmptySignal,

    #[error("Invalid tracking parameters: {details}")]
    InvalidParameters { details: String },

    #[error("Beat tracking failed: {reason}")]
    AnalysisFailed { reason: String },
}

/// Offset strings must look like `H:MM:SS` on a 24h clock
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OffsetError {
    #[error("'{input}' does not match the format HH:MM:SS")]
    InvalidFormat { input: String },
}

/// A guide file could not be created or written
#[derive(Error, Debug)]
#[error("Cannot write timeline guides to '{}': {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Pre-flight problems that stop a run before any file is processed
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("File '{}' not found.", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Input directory '{}' not found.", path.display())]
    InputDirectoryNotFound { path: PathBuf },

    #[error("No input file given.")]
    NoInputGiven,

    #[error("Output directory '{}' {reason}.", path.display())]
    OutputDirectory { path: PathBuf, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using BeatfinderError
pub type Result<T> = std::result::Result<T, BeatfinderError>;

impl BeatfinderError {
    /// Whether this error belongs to a single input file.
    ///
    /// Per-file errors are logged and the run continues; everything else
    /// stops the run before processing starts.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Audio(_) | Self::Tracking(_) | Self::Write(_) | Self::Io(_)
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Audio(AudioError::UnsupportedFormat { format }) => {
                format!("Audio format '{}' is not supported. Use WAV, MP3 or FLAC.", format)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Validation(e) => e.to_string(),
            _ => self.to_string(),
        }
    }
}

impl WriteError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
