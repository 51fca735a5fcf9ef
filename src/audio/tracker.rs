use crate::audio::onset::{onset_strength, OnsetEnvelope};
use crate::audio::tempo::estimate_tempo;
use crate::audio::types::BeatEstimate;
use crate::config::TrackerConfig;
use crate::error::{Result, TrackingError};

/// A beat-tracking backend.
///
/// Implementations receive mono PCM and must return beat positions in
/// seconds, non-negative and in chronological order.
pub trait BeatTracker {
    /// Detect the tempo and beat positions of a signal
    ///
    /// # Arguments
    /// * `samples` - Mono samples normalized to [-1.0, 1.0]
    /// * `sample_rate` - Sample rate in Hz
    /// * `tempo_hint` - Tempo to use instead of estimating one (BPM)
    /// * `tightness` - How strictly beats must follow the tempo
    fn track(
        &self,
        samples: &[f32],
        sample_rate: u32,
        tempo_hint: Option<f64>,
        tightness: f64,
    ) -> Result<BeatEstimate>;

    /// Get the name of this tracker (for logging)
    fn name(&self) -> &'static str;
}

/// Dynamic-programming beat tracker.
///
/// Picks the beat sequence that maximises onset strength at the beats
/// minus a penalty for gaps that stray from the tempo period. The
/// `tightness` argument scales that penalty.
pub struct DynamicBeatTracker {
    config: TrackerConfig,
}

impl DynamicBeatTracker {
    /// Create a new tracker with default configuration
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create a new tracker with custom configuration
    pub fn with_config(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn check_parameters(&self, tempo_hint: Option<f64>, tightness: f64) -> Result<()> {
        self.config.validate().map_err(|e| TrackingError::InvalidParameters {
            details: e.to_string(),
        })?;

        if let Some(bpm) = tempo_hint {
            if !bpm.is_finite() || bpm <= 0.0 {
                return Err(TrackingError::InvalidParameters {
                    details: format!("tempo hint must be strictly positive, got {}", bpm),
                }
                .into());
            }
        }

        if !tightness.is_finite() || tightness < 0.0 {
            return Err(TrackingError::InvalidParameters {
                details: format!("tightness must be non-negative, got {}", tightness),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for DynamicBeatTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatTracker for DynamicBeatTracker {
    fn track(
        &self,
        samples: &[f32],
        sample_rate: u32,
        tempo_hint: Option<f64>,
        tightness: f64,
    ) -> Result<BeatEstimate> {
        self.check_parameters(tempo_hint, tightness)?;

        let envelope = onset_strength(samples, sample_rate, &self.config)?;
        if envelope.is_silent() {
            tracing::debug!("No onsets found, returning an empty beat sequence");
            return Ok(BeatEstimate {
                tempo: 0.0,
                beat_times: vec![],
            });
        }

        let tempo = match tempo_hint {
            Some(bpm) => bpm,
            None => estimate_tempo(&envelope, &self.config),
        };

        let frames = beat_frames(&envelope, tempo, tightness, self.config.trim);
        let beat_times: Vec<f64> = frames.iter().map(|&f| envelope.frame_to_seconds(f)).collect();

        tracing::debug!(
            "Tracked {} beats at {:.2} BPM (tightness {})",
            beat_times.len(),
            tempo,
            tightness
        );

        Ok(BeatEstimate { tempo, beat_times })
    }

    fn name(&self) -> &'static str {
        "dynamic-programming"
    }
}

/// Beat frame indices for an envelope at a fixed tempo
fn beat_frames(envelope: &OnsetEnvelope, tempo: f64, tightness: f64, trim: bool) -> Vec<usize> {
    // Kernel and transition table never outgrow the envelope
    let period = (60.0 * envelope.frame_rate / tempo)
        .round()
        .min(envelope.len() as f64)
        .max(1.0);

    let onsets = normalize(&envelope.values);
    let local = local_score(&onsets, period);
    let (cumulative, backlink) = accumulate(&local, period, tightness);

    let Some(tail) = last_beat(&cumulative) else {
        return vec![];
    };

    let mut beats = vec![tail];
    while let Some(previous) = backlink[beats[beats.len() - 1]] {
        beats.push(previous);
    }
    beats.reverse();

    if trim {
        trim_beats(&local, beats)
    } else {
        beats
    }
}

/// Scale by the sample standard deviation
fn normalize(values: &[f32]) -> Vec<f64> {
    let values: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    let n = values.len();
    if n < 2 {
        return values;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = variance.sqrt();

    if std > 0.0 {
        values.iter().map(|v| v / std).collect()
    } else {
        values
    }
}

/// Smooth onsets with a Gaussian spanning one period each side
fn local_score(onsets: &[f64], period: f64) -> Vec<f64> {
    let half = period as isize;
    let kernel: Vec<f64> = (-half..=half)
        .map(|k| (-0.5 * (k as f64 * 32.0 / period).powi(2)).exp())
        .collect();

    (0..onsets.len() as isize)
        .map(|i| {
            kernel
                .iter()
                .zip(-half..=half)
                .filter_map(|(w, k)| {
                    let idx = i + k;
                    (idx >= 0 && (idx as usize) < onsets.len()).then(|| w * onsets[idx as usize])
                })
                .sum()
        })
        .collect()
}

/// Forward pass: best cumulative score ending at each frame and the beat before it
fn accumulate(local: &[f64], period: f64, tightness: f64) -> (Vec<f64>, Vec<Option<usize>>) {
    let min_offset = ((period / 2.0).round() as isize).max(1);
    let max_offset = ((2.0 * period).round() as isize)
        .min(local.len() as isize)
        .max(min_offset);

    // Gaps of exactly one period cost nothing
    let transitions: Vec<(isize, f64)> = (min_offset..=max_offset)
        .rev()
        .map(|gap| (-gap, -tightness * (gap as f64 / period).ln().powi(2)))
        .collect();

    let max_local = local.iter().cloned().fold(f64::MIN, f64::max);
    let mut cumulative = vec![0.0; local.len()];
    let mut backlink = vec![None; local.len()];
    let mut first_beat = true;

    for i in 0..local.len() {
        let mut best_score = f64::NEG_INFINITY;
        let mut best_idx = -1isize;

        for &(offset, cost) in &transitions {
            let idx = i as isize + offset;
            let candidate = if idx >= 0 { cost + cumulative[idx as usize] } else { cost };
            if candidate > best_score {
                best_score = candidate;
                best_idx = idx;
            }
        }

        cumulative[i] = local[i] + best_score;

        // Quiet intro frames never start a chain
        if first_beat && local[i] < 0.01 * max_local {
            backlink[i] = None;
        } else {
            backlink[i] = (best_idx >= 0).then_some(best_idx as usize);
            first_beat = false;
        }
    }

    (cumulative, backlink)
}

/// Last local maximum of the cumulative score that clears half the median peak
fn last_beat(cumulative: &[f64]) -> Option<usize> {
    let n = cumulative.len();
    if n == 0 {
        return None;
    }

    let is_peak: Vec<bool> = (0..n)
        .map(|i| {
            let before = cumulative[i.saturating_sub(1)];
            let after = cumulative[(i + 1).min(n - 1)];
            cumulative[i] > before && cumulative[i] >= after
        })
        .collect();

    let mut peaks: Vec<f64> = (0..n).filter(|&i| is_peak[i]).map(|i| cumulative[i]).collect();
    if peaks.is_empty() {
        return Some(n - 1);
    }
    let median = median(&mut peaks);

    (0..n)
        .rev()
        .find(|&i| {
            let score = if is_peak[i] { cumulative[i] } else { 0.0 };
            score * 2.0 > median
        })
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Drop weak beats at both ends of the sequence
fn trim_beats(local: &[f64], beats: Vec<usize>) -> Vec<usize> {
    const HANN: [f64; 5] = [0.0, 0.5, 1.0, 0.5, 0.0];

    let scores: Vec<f64> = beats.iter().map(|&b| local[b]).collect();
    let smooth: Vec<f64> = (0..scores.len() as isize)
        .map(|i| {
            HANN.iter()
                .zip(-2isize..=2)
                .filter_map(|(w, k)| {
                    let idx = i + k;
                    (idx >= 0 && (idx as usize) < scores.len()).then(|| w * scores[idx as usize])
                })
                .sum()
        })
        .collect();

    if smooth.is_empty() {
        return beats;
    }

    let rms = (smooth.iter().map(|s| s * s).sum::<f64>() / smooth.len() as f64).sqrt();
    let threshold = 0.5 * rms;

    match (
        smooth.iter().position(|&s| s > threshold),
        smooth.iter().rposition(|&s| s > threshold),
    ) {
        (Some(first), Some(last)) => beats[first..=last].to_vec(),
        _ => beats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth::ClickTrack;
    use crate::error::BeatfinderError;

    const RATE: u32 = ClickTrack::DEFAULT_SAMPLE_RATE;

    fn intervals(beats: &[f64]) -> Vec<f64> {
        beats.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    #[test]
    fn test_tracker_name() {
        assert_eq!(DynamicBeatTracker::default().name(), "dynamic-programming");
    }

    #[test]
    fn test_click_track_at_120_bpm() {
        let clicks = ClickTrack::new(120.0, 12.0).with_start(0.25).render();
        let estimate = DynamicBeatTracker::new().track(&clicks, RATE, None, 100.0).unwrap();

        assert!(
            (110.0..130.0).contains(&estimate.tempo),
            "tempo {:.2} should be close to 120",
            estimate.tempo
        );
        assert!(estimate.beat_times.len() >= 18, "only {} beats", estimate.beat_times.len());
        assert!(estimate.beat_times.iter().all(|&t| t >= 0.0));
        assert!(estimate.beat_times.windows(2).all(|pair| pair[0] < pair[1]));

        let gaps = intervals(&estimate.beat_times);
        let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
        assert!((mean_gap - 0.5).abs() < 0.03, "mean gap {:.3}", mean_gap);
    }

    #[test]
    fn test_tempo_hint_is_used_as_tempo() {
        let clicks = ClickTrack::new(100.0, 10.0).with_start(0.3).render();
        let estimate = DynamicBeatTracker::new().track(&clicks, RATE, Some(100.0), 100.0).unwrap();

        assert_eq!(estimate.tempo, 100.0);
        let gaps = intervals(&estimate.beat_times);
        let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
        assert!((mean_gap - 0.6).abs() < 0.03, "mean gap {:.3}", mean_gap);
    }

    #[test]
    fn test_silence_has_no_beats() {
        let silence = vec![0.0f32; RATE as usize * 3];
        let estimate = DynamicBeatTracker::new().track(&silence, RATE, None, 100.0).unwrap();

        assert_eq!(estimate.tempo, 0.0);
        assert!(estimate.beat_times.is_empty());
    }

    #[test]
    fn test_tracking_is_repeatable() {
        let clicks = ClickTrack::new(128.0, 8.0).render();
        let tracker = DynamicBeatTracker::new();

        let first = tracker.track(&clicks, RATE, None, 100.0).unwrap();
        let second = tracker.track(&clicks, RATE, None, 100.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_parameters() {
        let clicks = ClickTrack::new(120.0, 2.0).render();
        let tracker = DynamicBeatTracker::new();

        for (hint, tightness) in [
            (Some(0.0), 100.0),
            (Some(-90.0), 100.0),
            (None, -1.0),
            (None, f64::NAN),
        ] {
            let result = tracker.track(&clicks, RATE, hint, tightness);
            assert!(
                matches!(
                    result,
                    Err(BeatfinderError::Tracking(TrackingError::InvalidParameters { .. }))
                ),
                "hint {:?} tightness {} should be rejected",
                hint,
                tightness
            );
        }
    }

    #[test]
    fn test_empty_signal_is_an_error() {
        let result = DynamicBeatTracker::new().track(&[], RATE, None, 100.0);
        assert!(matches!(result, Err(BeatfinderError::Tracking(TrackingError::EmptySignal))));
    }

    #[test]
    fn test_very_short_signal() {
        let blip = vec![0.5f32; 300];
        let estimate = DynamicBeatTracker::new().track(&blip, RATE, None, 100.0).unwrap();
        assert!(estimate.beat_times.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_tiny_tempo_hint_stays_bounded() {
        let clicks = ClickTrack::new(120.0, 3.0).with_start(0.2).render();
        let estimate = DynamicBeatTracker::new()
            .track(&clicks, RATE, Some(0.0001), 100.0)
            .unwrap();

        assert_eq!(estimate.tempo, 0.0001);
        assert!(estimate.beat_times.len() <= 3, "{} beats", estimate.beat_times.len());
        assert!(estimate.beat_times.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(estimate.beat_times.iter().all(|&t| (0.0..3.1).contains(&t)));
    }

    #[test]
    fn test_trim_drops_weak_edges() {
        let local = vec![0.1, 5.0, 5.0, 5.0, 5.0, 5.0, 0.1];
        let beats: Vec<usize> = (0..local.len()).collect();
        assert_eq!(trim_beats(&local, beats), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_last_beat_picks_final_strong_peak() {
        let cumulative = [0.0, 3.0, 1.0, 4.0, 2.0, 5.0, 0.5, 0.2];
        assert_eq!(last_beat(&cumulative), Some(5));
        assert_eq!(last_beat(&[]), None);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), 2.5);
    }
}
