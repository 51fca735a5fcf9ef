//! Synthetic click tracks with known beat positions.

use std::f32::consts::PI;
use std::io;
use std::path::Path;

use crate::error::WriteError;

/// A metronome-style signal: short decaying tone bursts at a fixed tempo
#[derive(Debug, Clone, PartialEq)]
pub struct ClickTrack {
    pub bpm: f64,
    pub seconds: f64,
    pub sample_rate: u32,

    /// Position of the first click in seconds
    pub start: f64,
}

impl ClickTrack {
    pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

    const CLICK_FREQUENCY: f32 = 1000.0;
    const CLICK_SECONDS: f64 = 0.03;
    const AMPLITUDE: f32 = 0.8;

    pub fn new(bpm: f64, seconds: f64) -> Self {
        Self {
            bpm,
            seconds,
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            start: 0.0,
        }
    }

    pub fn with_start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Click positions in seconds
    pub fn beat_times(&self) -> Vec<f64> {
        let interval = 60.0 / self.bpm;
        (0..)
            .map(|i| self.start + i as f64 * interval)
            .take_while(|&t| t < self.seconds)
            .collect()
    }

    /// Render mono samples
    pub fn render(&self) -> Vec<f32> {
        let rate = self.sample_rate as f64;
        let mut samples = vec![0.0f32; (self.seconds * rate) as usize];
        let click_len = (Self::CLICK_SECONDS * rate) as usize;

        for beat in self.beat_times() {
            let onset = (beat * rate).round() as usize;
            for (n, slot) in samples.iter_mut().skip(onset).take(click_len).enumerate() {
                let t = n as f32 / self.sample_rate as f32;
                let envelope = (-5.0 * n as f32 / click_len as f32).exp();
                *slot = Self::AMPLITUDE * envelope * (2.0 * PI * Self::CLICK_FREQUENCY * t).sin();
            }
        }

        samples
    }

    /// Write the rendered track as a mono 16-bit WAV
    pub fn write_wav<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteError> {
        let path = path.as_ref();
        let to_write_error = |e: hound::Error| match e {
            hound::Error::IoError(io) => WriteError::new(path, io),
            other => WriteError::new(path, io::Error::new(io::ErrorKind::Other, other.to_string())),
        };

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec).map_err(to_write_error)?;
        for sample in self.render() {
            writer
                .write_sample((sample * i16::MAX as f32) as i16)
                .map_err(to_write_error)?;
        }
        writer.finalize().map_err(to_write_error)
    }
}
