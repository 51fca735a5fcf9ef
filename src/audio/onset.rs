use realfft::RealFftPlanner;
use rustfft::num_complex::Complex;

use crate::config::TrackerConfig;
use crate::error::{Result, TrackingError};

/// Log compression applied to magnitudes before differencing
const COMPRESSION: f32 = 100.0;

/// Onset strength over time, one value per analysis frame
#[derive(Debug, Clone)]
pub struct OnsetEnvelope {
    pub values: Vec<f32>,

    /// Frames per second
    pub frame_rate: f64,
}

impl OnsetEnvelope {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// No frame carries any onset energy
    pub fn is_silent(&self) -> bool {
        self.values.iter().all(|&v| v <= 0.0)
    }

    pub fn frame_to_seconds(&self, frame: usize) -> f64 {
        frame as f64 / self.frame_rate
    }
}

/// Compute the spectral-flux onset envelope of a mono signal.
///
/// Frames are centred: frame `t` covers samples around `t * hop_length`,
/// with the signal zero-padded by `n_fft / 2` on both sides.
pub fn onset_strength(
    samples: &[f32],
    sample_rate: u32,
    config: &TrackerConfig,
) -> Result<OnsetEnvelope> {
    if samples.is_empty() {
        return Err(TrackingError::EmptySignal.into());
    }
    if sample_rate == 0 {
        return Err(TrackingError::InvalidParameters {
            details: "sample rate must be positive".to_string(),
        }
        .into());
    }

    let n_fft = config.n_fft;
    let hop = config.hop_length;
    let pad = n_fft / 2;
    let n_frames = 1 + samples.len() / hop;

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);
    let mut input_buffer = fft.make_input_vec();
    let mut spectrum_buffer: Vec<Complex<f32>> = fft.make_output_vec();

    // Periodic Hann window
    let window: Vec<f32> = (0..n_fft)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / n_fft as f32).cos())
        .collect();

    let mut previous = vec![0.0f32; spectrum_buffer.len()];
    let mut values = Vec::with_capacity(n_frames);

    for frame in 0..n_frames {
        let start = (frame * hop) as isize - pad as isize;
        for (i, slot) in input_buffer.iter_mut().enumerate() {
            let idx = start + i as isize;
            *slot = if idx >= 0 && (idx as usize) < samples.len() {
                samples[idx as usize] * window[i]
            } else {
                0.0
            };
        }

        fft.process(&mut input_buffer, &mut spectrum_buffer)
            .map_err(|e| TrackingError::AnalysisFailed {
                reason: format!("FFT processing failed: {}", e),
            })?;

        let mut flux = 0.0f32;
        for (bin, prev) in spectrum_buffer.iter().zip(previous.iter_mut()) {
            let current = (1.0 + COMPRESSION * bin.norm()).ln();
            if frame > 0 {
                flux += (current - *prev).max(0.0);
            }
            *prev = current;
        }

        values.push(flux / spectrum_buffer.len() as f32);
    }

    let envelope = OnsetEnvelope {
        values,
        frame_rate: sample_rate as f64 / hop as f64,
    };

    tracing::debug!(
        "Onset envelope: {} frames at {:.2} frames/s",
        envelope.len(),
        envelope.frame_rate
    );
    Ok(envelope)
}
