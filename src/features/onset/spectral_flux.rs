//! Spectral flux onset detection function
//!
//! Sum of positive magnitude changes between consecutive Hann-windowed STFT
//! frames. More sensitive than energy flux to soft transients that change the
//! spectrum without adding much energy (hats, ghost snares over a sustained bass).
//!
//! Frames are aligned with [`super::energy_flux::energy_flux`] so both
//! functions can be blended entry by entry.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::AnalysisError;

/// Compute the spectral flux detection function
///
/// # Arguments
///
/// * `samples` - Audio samples (mono, peak-normalized)
/// * `frame_size` - FFT / frame size
/// * `hop_size` - Hop size between frames
///
/// # Returns
///
/// One non-negative flux value per frame (`ceil(len / hop_size)` frames). The
/// spectrum before the first frame is taken as zero.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if frame or hop size is zero
pub fn spectral_flux(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if frame_size == 0 || hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame and hop size must be > 0".to_string(),
        ));
    }

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let num_frames = samples.len().div_ceil(hop_size);
    let num_bins = frame_size / 2 + 1;

    log::debug!(
        "Spectral flux: {} frames, fft={}, {} bins",
        num_frames,
        frame_size,
        num_bins
    );

    let window: Vec<f32> = (0..frame_size)
        .map(|n| {
            0.5 - 0.5 * (2.0 * std::f32::consts::PI * n as f32 / frame_size as f32).cos()
        })
        .collect();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);

    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];
    let mut prev_magnitudes = vec![0.0f32; num_bins];
    let mut magnitudes = vec![0.0f32; num_bins];
    let mut flux = Vec::with_capacity(num_frames);

    for i in 0..num_frames {
        let start = i * hop_size;

        for (n, slot) in buffer.iter_mut().enumerate() {
            let x = samples.get(start + n).copied().unwrap_or(0.0);
            *slot = Complex::new(x * window[n], 0.0);
        }

        fft.process(&mut buffer);

        let mut sum = 0.0f32;
        for (k, mag) in magnitudes.iter_mut().enumerate() {
            *mag = buffer[k].norm();
            sum += (*mag - prev_magnitudes[k]).max(0.0);
        }

        flux.push(sum);
        std::mem::swap(&mut prev_magnitudes, &mut magnitudes);
    }

    Ok(flux)
}
