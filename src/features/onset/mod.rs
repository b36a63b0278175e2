//! Onset detection
//!
//! Finds discrete rhythmic events (transients) in a decoded buffer:
//! - Energy flux (all depths)
//! - Spectral flux, blended in at Detailed/Deep depth
//! - Peak picking relative to the strongest peak
//! - Sample-accurate refinement of each detected frame
//!
//! Detection runs on a peak-normalized copy, so onset times and strengths do not
//! depend on the input gain.

pub mod consensus;
pub mod energy_flux;
pub mod peak_picking;
pub mod spectral_flux;
pub mod threshold;

use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, DetectorParams};
use crate::error::AnalysisError;
use crate::io::AudioBuffer;
use crate::preprocessing::normalization::normalize_peak;
use crate::preprocessing::silence::SilenceDetector;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Fraction of the local peak amplitude that marks the start of a transient
const ATTACK_LEVEL: f32 = 0.5;

/// Window after the onset over which the transient peak (strength) is measured
const STRENGTH_WINDOW_MS: f32 = 10.0;

/// A detected rhythmic event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnsetEvent {
    /// Onset time in seconds, within [0, duration)
    pub time_seconds: f32,

    /// Onset position in samples
    pub sample: usize,

    /// Relative strength (0.0-1.0, strongest onset = 1.0)
    pub strength: f32,
}

impl OnsetEvent {
    /// Build an event from a time in seconds (used by callers with pre-computed onsets)
    pub fn at(time_seconds: f32, strength: f32, sample_rate: u32) -> Self {
        Self {
            time_seconds,
            sample: (time_seconds * sample_rate as f32).round().max(0.0) as usize,
            strength,
        }
    }
}

/// Extract onsets from a buffer
///
/// # Arguments
///
/// * `buffer` - Decoded mono audio
/// * `params` - Detector parameters of the requested analysis depth
/// * `config` - Supplies the silence floor and the minimum onset gap
///
/// # Returns
///
/// Onsets in strictly increasing time order
///
/// # Errors
///
/// Returns `AnalysisError::InsufficientSignal` when the buffer is empty, its peak
/// is below the silence floor, or no onset clears the detection threshold.
/// Callers should treat this as "groove unanalyzable", not as a fatal error.
pub fn extract_onsets(
    buffer: &AudioBuffer,
    params: &DetectorParams,
    config: &AnalysisConfig,
) -> Result<Vec<OnsetEvent>, AnalysisError> {
    if buffer.is_empty() {
        return Err(AnalysisError::InsufficientSignal(
            "Empty audio buffer".to_string(),
        ));
    }

    let silence = SilenceDetector {
        threshold_db: config.silence_floor_db,
        frame_size: params.frame_size,
    };
    if silence.is_silent(buffer.samples()) {
        return Err(AnalysisError::InsufficientSignal(format!(
            "Peak level below silence floor ({:.1} dBFS)",
            config.silence_floor_db
        )));
    }

    let samples = normalize_peak(buffer.samples());

    let energy = energy_flux::energy_flux(&samples, params.frame_size, params.hop_size)?;
    let detection = if params.use_spectral_flux {
        let spectral = spectral_flux::spectral_flux(&samples, params.frame_size, params.hop_size)?;
        consensus::blend_detection_functions(&[&energy, &spectral])
    } else {
        consensus::normalize_detection_function(&energy)
    };

    let max_value = detection.iter().copied().fold(0.0f32, f32::max);
    if max_value <= EPSILON {
        return Err(AnalysisError::InsufficientSignal(
            "Detection function is flat".to_string(),
        ));
    }

    let threshold = max_value * 10.0_f32.powf(params.threshold_db / 20.0);
    let peaks = peak_picking::find_peaks(&detection, threshold);

    let mut candidates: Vec<usize> = peaks
        .iter()
        .map(|&(frame, _)| refine_onset(&samples, frame, params.frame_size, params.hop_size))
        .collect();
    candidates.sort_unstable();

    let sample_rate = buffer.sample_rate() as f32;
    let min_gap = ((config.min_onset_gap_ms / 1000.0) * sample_rate) as usize;
    let merged = merge_close_onsets(&candidates, min_gap.max(1));

    if merged.is_empty() {
        return Err(AnalysisError::InsufficientSignal(
            "No onsets above detection threshold".to_string(),
        ));
    }

    let attack_len = ((STRENGTH_WINDOW_MS / 1000.0) * sample_rate).max(1.0) as usize;
    let peaks_at: Vec<f32> = merged
        .iter()
        .map(|&sample| transient_peak(&samples, sample, attack_len))
        .collect();
    let strongest = peaks_at.iter().copied().fold(0.0f32, f32::max).max(EPSILON);

    let onsets: Vec<OnsetEvent> = merged
        .iter()
        .zip(peaks_at.iter())
        .map(|(&sample, &peak)| OnsetEvent {
            time_seconds: sample as f32 / sample_rate,
            sample,
            strength: (peak / strongest).clamp(0.0, 1.0),
        })
        .collect();

    log::debug!(
        "Extracted {} onsets ({} raw peaks, threshold={:.4}, spectral={})",
        onsets.len(),
        peaks.len(),
        threshold,
        params.use_spectral_flux
    );

    Ok(onsets)
}

/// Locate the transient start inside the window of a detection frame
///
/// Searches the frame window plus one hop before it and returns the first
/// sample whose magnitude reaches half of the local peak.
fn refine_onset(samples: &[f32], frame: usize, frame_size: usize, hop_size: usize) -> usize {
    let frame_start = frame * hop_size;
    let start = frame_start.saturating_sub(hop_size).min(samples.len() - 1);
    let end = (frame_start + frame_size).min(samples.len());

    if start >= end {
        return start;
    }

    let region = &samples[start..end];
    let peak = region.iter().map(|x| x.abs()).fold(0.0f32, f32::max);
    if peak <= EPSILON {
        return frame_start.min(samples.len() - 1);
    }

    let level = peak * ATTACK_LEVEL;
    region
        .iter()
        .position(|x| x.abs() >= level)
        .map(|offset| start + offset)
        .unwrap_or(start)
}

/// Peak magnitude of the transient starting at `sample`
fn transient_peak(samples: &[f32], sample: usize, len: usize) -> f32 {
    let end = (sample + len).min(samples.len());
    samples[sample.min(end)..end]
        .iter()
        .map(|x| x.abs())
        .fold(0.0f32, f32::max)
}

/// Merge sorted candidate positions closer than `min_gap` samples, keeping the earliest
fn merge_close_onsets(candidates: &[usize], min_gap: usize) -> Vec<usize> {
    let mut merged: Vec<usize> = Vec::with_capacity(candidates.len());

    for &sample in candidates {
        match merged.last() {
            Some(&last) if sample < last + min_gap => {}
            _ => merged.push(sample),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisDepth;
    use crate::test_signals::{click_track, render_clicks};

    const SR: u32 = 44100;

    fn extract(samples: Vec<f32>, depth: AnalysisDepth) -> Result<Vec<OnsetEvent>, AnalysisError> {
        let config = AnalysisConfig::default();
        let buffer = AudioBuffer::new(samples, SR).unwrap();
        extract_onsets(&buffer, config.detector(depth), &config)
    }

    #[test]
    fn test_click_times_are_sample_accurate() {
        let times: Vec<f32> = (0..8).map(|i| 0.25 + i as f32 * 0.5).collect();
        let samples = render_clicks(&times, &[1.0; 8], 4.5, SR);

        for depth in [AnalysisDepth::Quick, AnalysisDepth::Detailed, AnalysisDepth::Deep] {
            let onsets = extract(samples.clone(), depth).unwrap();
            assert_eq!(onsets.len(), 8, "depth {:?}", depth);
            for (onset, &t) in onsets.iter().zip(times.iter()) {
                assert!(
                    (onset.time_seconds - t).abs() < 0.001,
                    "depth {:?}: expected {:.4}, got {:.4}",
                    depth,
                    t,
                    onset.time_seconds
                );
            }
        }
    }

    #[test]
    fn test_onsets_strictly_increasing_and_in_range() {
        let samples = click_track(120.0, 4, 6.0, SR);
        let duration = samples.len() as f32 / SR as f32;
        let onsets = extract(samples, AnalysisDepth::Detailed).unwrap();

        for pair in onsets.windows(2) {
            assert!(pair[1].time_seconds > pair[0].time_seconds);
        }
        for onset in &onsets {
            assert!(onset.time_seconds >= 0.0 && onset.time_seconds < duration);
            assert!(onset.strength > 0.0 && onset.strength <= 1.0);
        }
    }

    #[test]
    fn test_amplitude_invariance() {
        let loud = click_track(100.0, 2, 5.0, SR);
        let quiet: Vec<f32> = loud.iter().map(|x| x * 0.05).collect();

        let a = extract(loud, AnalysisDepth::Detailed).unwrap();
        let b = extract(quiet, AnalysisDepth::Detailed).unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.sample, y.sample);
            assert!((x.strength - y.strength).abs() < 1e-4);
        }
    }

    #[test]
    fn test_deterministic() {
        let samples = click_track(93.0, 4, 4.0, SR);
        let a = extract(samples.clone(), AnalysisDepth::Deep).unwrap();
        let b = extract(samples, AnalysisDepth::Deep).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ghost_notes_are_weaker() {
        let times = [0.2, 0.5, 0.8, 1.1, 1.4, 1.7];
        let amps = [1.0, 0.2, 1.0, 0.2, 1.0, 0.2];
        let samples = render_clicks(&times, &amps, 2.5, SR);
        let onsets = extract(samples, AnalysisDepth::Detailed).unwrap();

        assert_eq!(onsets.len(), 6);
        assert!((onsets[1].strength - 0.2).abs() < 0.02);
        assert!((onsets[2].strength - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_silence_is_insufficient_signal() {
        let err = extract(vec![0.0; SR as usize * 2], AnalysisDepth::Quick).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientSignal(_)));
    }

    #[test]
    fn test_merge_close_onsets_keeps_earliest() {
        let merged = merge_close_onsets(&[100, 100, 120, 5000], 50);
        assert_eq!(merged, vec![100, 5000]);
    }

    #[test]
    fn test_transient_peak_window() {
        let samples = [0.0, 0.2, -0.9, 0.1, 0.95];
        assert_eq!(transient_peak(&samples, 1, 2), 0.9);
        assert_eq!(transient_peak(&samples, 4, 10), 0.95);
    }

    #[test]
    fn test_onset_event_at() {
        let event = OnsetEvent::at(0.5, 1.0, 44100);
        assert_eq!(event.sample, 22050);
    }
}
