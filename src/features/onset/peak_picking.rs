//! Peak picking on onset detection functions
//!
//! Finds local maxima of a detection function that exceed a threshold.

/// Find peaks in a detection function
///
/// A peak is an entry strictly greater than its left neighbour and greater than
/// or equal to its right neighbour (`>=` so the first entry of a plateau wins).
/// The first and last entries only need to beat their single neighbour.
///
/// # Arguments
///
/// * `signal` - Detection function values
/// * `threshold` - Absolute minimum peak height (exclusive)
///
/// # Returns
///
/// `(index, value)` pairs in index order
///
/// # Example
///
/// ```
/// use groove_dsp::features::onset::peak_picking::find_peaks;
///
/// let signal = vec![0.0, 0.5, 1.0, 0.7, 0.3, 0.9, 0.2];
/// let peaks = find_peaks(&signal, 0.5);
/// assert_eq!(peaks, vec![(2, 1.0), (5, 0.9)]);
/// ```
pub fn find_peaks(signal: &[f32], threshold: f32) -> Vec<(usize, f32)> {
    let n = signal.len();
    let mut peaks = Vec::new();

    for i in 0..n {
        let value = signal[i];
        if value <= threshold {
            continue;
        }

        let rises = i == 0 || value > signal[i - 1];
        let holds = i + 1 == n || value >= signal[i + 1];

        if rises && holds {
            peaks.push((i, value));
        }
    }

    log::debug!(
        "Found {} peaks in signal of length {} (threshold={:.4})",
        peaks.len(),
        n,
        threshold
    );

    peaks
}
