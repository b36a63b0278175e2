//! Detection function consensus
//!
//! Combines frame-aligned detection functions (energy flux, spectral flux) into
//! one curve. Each input is normalised to its own maximum before averaging, so
//! the result is in [0, 1] and independent of input gain.

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Average max-normalised detection functions entry by entry
///
/// Functions with no energy (max below epsilon) contribute zeros. Inputs of
/// unequal length are truncated to the shortest.
///
/// # Example
///
/// ```
/// use groove_dsp::features::onset::consensus::blend_detection_functions;
///
/// let a = vec![0.0, 2.0, 1.0];
/// let b = vec![0.0, 10.0, 10.0];
/// assert_eq!(blend_detection_functions(&[&a, &b]), vec![0.0, 1.0, 0.75]);
/// ```
pub fn blend_detection_functions(functions: &[&[f32]]) -> Vec<f32> {
    let len = functions.iter().map(|f| f.len()).min().unwrap_or(0);
    if len == 0 {
        return Vec::new();
    }

    let weight = 1.0 / functions.len() as f32;
    let mut blended = vec![0.0f32; len];

    for function in functions {
        let max = function[..len].iter().copied().fold(0.0f32, f32::max);
        if max <= EPSILON {
            continue;
        }
        for (out, &v) in blended.iter_mut().zip(function.iter()) {
            *out += weight * v / max;
        }
    }

    blended
}

/// Normalise a single detection function to unit maximum
pub fn normalize_detection_function(function: &[f32]) -> Vec<f32> {
    blend_detection_functions(&[function])
}
