use crate::audio::onset::OnsetEnvelope;
use crate::config::TrackerConfig;

/// Estimate a global tempo (BPM) from an onset envelope.
///
/// Scores every autocorrelation lag inside the `ac_size` window by
/// `ln(1 + 1e6 * r)` plus a log-normal prior centred on `start_bpm`, and
/// returns the tempo of the best lag. Falls back to `start_bpm` when the
/// envelope carries no periodicity to measure.
pub fn estimate_tempo(envelope: &OnsetEnvelope, config: &TrackerConfig) -> f64 {
    let n = envelope.len();
    if n < 2 {
        return config.start_bpm;
    }

    let max_lag = ((config.ac_size * envelope.frame_rate).round() as usize).min(n - 1);
    let acf = autocorrelation(&envelope.values, max_lag);

    if acf[0] <= 0.0 {
        return config.start_bpm;
    }

    let log_start = config.start_bpm.log2();
    let mut best: Option<(f64, f64)> = None;

    for (lag, &r) in acf.iter().enumerate().skip(1) {
        let bpm = 60.0 * envelope.frame_rate / lag as f64;
        if bpm > config.max_tempo {
            continue;
        }

        let strength = (1e6 * (r / acf[0]).max(0.0)).ln_1p();
        let prior = -0.5 * ((bpm.log2() - log_start) / config.std_bpm).powi(2);
        let score = strength + prior;

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((bpm, score));
        }
    }

    let tempo = best.map_or(config.start_bpm, |(bpm, _)| bpm);
    tracing::debug!("Estimated tempo: {:.2} BPM (max lag {})", tempo, max_lag);
    tempo
}

/// Raw autocorrelation for lags `0..=max_lag`
fn autocorrelation(values: &[f32], max_lag: usize) -> Vec<f64> {
    (0..=max_lag)
        .map(|lag| {
            values
                .iter()
                .zip(values[lag..].iter())
                .map(|(&a, &b)| a as f64 * b as f64)
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse_envelope(period_frames: usize, frames: usize, frame_rate: f64) -> OnsetEnvelope {
        let values = (0..frames)
            .map(|i| if i % period_frames == 0 { 1.0 } else { 0.0 })
            .collect();
        OnsetEnvelope { values, frame_rate }
    }

    #[test]
    fn test_autocorrelation() {
        let acf = autocorrelation(&[1.0, 0.0, 1.0, 0.0], 3);
        assert_eq!(acf, vec![2.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_pulse_train_tempo() {
        // 50 frames per second, pulse every 25 frames = 120 BPM
        let envelope = pulse_envelope(25, 1000, 50.0);
        let tempo = estimate_tempo(&envelope, &TrackerConfig::default());
        assert!((tempo - 120.0).abs() < 1e-9, "got {}", tempo);
    }

    #[test]
    fn test_prior_prefers_start_bpm_over_half_tempo() {
        // Pulses every 20 frames at 50 fps = 150 BPM; lag 40 (75 BPM) matches too
        let envelope = pulse_envelope(20, 1000, 50.0);
        let tempo = estimate_tempo(&envelope, &TrackerConfig::default());
        assert!((tempo - 150.0).abs() < 1e-9, "got {}", tempo);
    }

    #[test]
    fn test_silent_envelope_falls_back_to_start_bpm() {
        let envelope = OnsetEnvelope { values: vec![0.0; 500], frame_rate: 50.0 };
        let config = TrackerConfig { start_bpm: 98.0, ..Default::default() };
        assert_eq!(estimate_tempo(&envelope, &config), 98.0);

        let single = OnsetEnvelope { values: vec![1.0], frame_rate: 50.0 };
        assert_eq!(estimate_tempo(&single, &config), 98.0);
    }

    #[test]
    fn test_max_tempo_is_respected() {
        // Pulses every 5 frames at 50 fps = 600 BPM
        let envelope = pulse_envelope(5, 1000, 50.0);
        let tempo = estimate_tempo(&envelope, &TrackerConfig::default());
        assert!(tempo <= 320.0);
    }
}
