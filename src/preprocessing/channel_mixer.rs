//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::AnalysisError;

/// Downmix interleaved multi-channel samples to mono by averaging channels
///
/// # Arguments
///
/// * `samples` - Interleaved samples (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// Mono samples, one per frame. A trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero
pub fn downmix_interleaved(samples: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(samples.to_vec());
    }

    if samples.len() % channels != 0 {
        log::warn!(
            "Interleaved buffer of {} samples is not a multiple of {} channels, dropping partial frame",
            samples.len(),
            channels
        );
    }

    let scale = 1.0 / channels as f32;
    Ok(samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}
