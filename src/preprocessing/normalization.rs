//! Peak normalization
//!
//! Onset detection works on a peak-normalized working copy so that detected
//! onsets and their strengths do not depend on the input gain.
//!
//! # Example
//!
//! ```
//! use groove_dsp::preprocessing::normalization::normalize_peak;
//!
//! let normalized = normalize_peak(&[0.25, -0.5, 0.1]);
//! assert_eq!(normalized, vec![0.5, -1.0, 0.2]);
//! ```

/// Numerical stability epsilon for divisions
const EPSILON: f32 = 1e-10;

/// Convert a linear amplitude to dBFS, `-inf` for (near) zero
pub fn amplitude_to_db(amplitude: f32) -> f32 {
    if amplitude > EPSILON {
        20.0 * amplitude.log10()
    } else {
        f32::NEG_INFINITY
    }
}

/// Peak-normalize a copy of the samples to unit peak
///
/// Silent input is returned unchanged.
pub fn normalize_peak(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);

    if peak <= EPSILON {
        log::warn!("Audio is silent or extremely quiet, cannot normalize");
        return samples.to_vec();
    }

    let gain = 1.0 / peak;
    log::debug!(
        "Peak normalization: peak={:.2} dB, gain={:.2} dB",
        amplitude_to_db(peak),
        amplitude_to_db(gain)
    );

    samples.iter().map(|&x| x * gain).collect()
}
