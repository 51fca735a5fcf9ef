use std::path::PathBuf;

/// Decoded audio with metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples (interleaved for stereo, mono for single channel)
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Duration in seconds
    pub duration: f64,

    /// Source file path
    pub file_path: PathBuf,
}

impl AudioData {
    pub fn new(
        samples: Vec<f32>,
        sample_rate: u32,
        channels: u16,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        let frames = samples.len() / channels.max(1) as usize;
        let duration = if sample_rate > 0 {
            frames as f64 / sample_rate as f64
        } else {
            0.0
        };

        Self {
            samples,
            sample_rate,
            channels,
            duration,
            file_path: file_path.into(),
        }
    }

    /// Get mono mix of all channels
    pub fn mono_samples(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }

        self.samples
            .chunks(self.channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    }
}

/// Beat tracker output: a tempo and the beat positions it found
#[derive(Debug, Clone, PartialEq)]
pub struct BeatEstimate {
    /// Estimated tempo in BPM (0.0 when nothing rhythmic was found)
    pub tempo: f64,

    /// Beat positions in seconds from the start of the file, in order
    pub beat_times: Vec<f64>,
}

impl BeatEstimate {
    /// Whether beat positions never move backwards
    pub fn is_ordered(&self) -> bool {
        self.beat_times.windows(2).all(|pair| pair[0] <= pair[1])
    }
}
