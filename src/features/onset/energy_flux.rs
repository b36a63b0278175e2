//! Energy flux onset detection function
//!
//! Rise of frame-by-frame RMS energy.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size), zero-padding the tail
//! 2. Compute RMS energy per frame
//! 3. Compute energy rise: E_flux[n] = max(0, E[n] - E[n-1]), with E[-1] = 0
//!
//! Entry `n` of the returned function describes the energy that entered with
//! frame `n`, so a transient at the very first sample still produces a rise.
//!
//! # Example
//!
//! ```
//! use groove_dsp::features::onset::energy_flux::energy_flux;
//!
//! let mut samples = vec![0.0f32; 8192];
//! samples[4096] = 1.0;
//! let flux = energy_flux(&samples, 1024, 256)?;
//! assert_eq!(flux.len(), 32);
//! # Ok::<(), groove_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// Compute the energy flux detection function
///
/// # Reference
///
/// Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
/// A Tutorial on Onset Detection in Music Signals.
/// *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.
///
/// # Arguments
///
/// * `samples` - Audio samples (mono, peak-normalized)
/// * `frame_size` - Frame size for analysis
/// * `hop_size` - Hop size between frames
///
/// # Returns
///
/// One non-negative rise value per frame (`ceil(len / hop_size)` frames)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if frame or hop size is zero
pub fn energy_flux(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let num_frames = samples.len().div_ceil(hop_size);

    log::debug!(
        "Energy flux: {} samples, frame={}, hop={}, {} frames",
        samples.len(),
        frame_size,
        hop_size,
        num_frames
    );

    let mut flux = Vec::with_capacity(num_frames);
    let mut prev_rms = 0.0f32;

    for i in 0..num_frames {
        let start = i * hop_size;
        let end = (start + frame_size).min(samples.len());

        // Divide by the nominal frame size: the tail is implicitly zero-padded
        let sum_sq: f32 = samples[start..end].iter().map(|&x| x * x).sum();
        let rms = (sum_sq / frame_size as f32).sqrt();

        flux.push((rms - prev_rms).max(0.0));
        prev_rms = rms;
    }

    Ok(flux)
}
