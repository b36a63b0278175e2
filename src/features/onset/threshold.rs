//! Order statistics used for thresholding
//!
//! Percentile and median helpers shared by the onset, swing and ghost-note
//! stages. NaN values sort as equal and never panic.

use crate::error::AnalysisError;

fn sorted_copy(values: &[f32]) -> Vec<f32> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Median of the values (mean of the two middle values for even lengths)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if values are empty
pub fn median(values: &[f32]) -> Result<f32, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty values for median".to_string(),
        ));
    }

    let sorted = sorted_copy(values);
    let mid = sorted.len() / 2;

    Ok(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) * 0.5
    } else {
        sorted[mid]
    })
}

/// Compute percentile-based threshold
///
/// # Arguments
///
/// * `values` - Values to threshold
/// * `percentile` - Percentile (0.0-1.0), e.g., 0.75 for the 75th percentile
///
/// # Returns
///
/// The value at index `floor(len * percentile)` of the sorted values (clamped)
///
/// # Errors
///
/// Returns `AnalysisError` if values are empty or percentile is out of range
pub fn percentile_threshold(values: &[f32], percentile: f32) -> Result<f32, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty values for threshold calculation".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&percentile) {
        return Err(AnalysisError::InvalidInput(format!(
            "Percentile must be in [0.0, 1.0], got {}",
            percentile
        )));
    }

    let sorted = sorted_copy(values);
    let idx = ((sorted.len() as f32) * percentile) as usize;

    Ok(sorted[idx.min(sorted.len() - 1)])
}
