//! Tempo candidate refinement and octave folding
//!
//! Turns the dominant IOI cluster into a precise beat period and resolves
//! half/double-time ambiguity against the plausible tempo range.

use super::ioi_histogram::harmonic_multiple;

/// Maximum number of octave steps when folding into the plausible range
const MAX_OCTAVE_STEPS: u32 = 16;

/// Refine a period estimate from every interval that is a multiple of it
///
/// Least-squares fit of `d = n * p` over intervals with `|d - n * p0| < tolerance`,
/// i.e. `p = sum(d) / sum(n)`. Returns `p0` when nothing supports it.
pub fn refine_period(period: f32, intervals: &[f32], tolerance: f32) -> f32 {
    let mut sum_d = 0.0f64;
    let mut sum_n = 0.0f64;

    for &d in intervals {
        if let Some(n) = harmonic_multiple(period, d, tolerance) {
            sum_d += d as f64;
            sum_n += n as f64;
        }
    }

    if sum_n > 0.0 {
        (sum_d / sum_n) as f32
    } else {
        period
    }
}

/// Fold a tempo into `[min_bpm, max_bpm]` by halving or doubling
///
/// The candidate reached with the fewest octave steps is kept, so a tempo that
/// already lies in the range is returned unchanged.
pub fn fold_into_range(bpm: f32, min_bpm: f32, max_bpm: f32) -> f32 {
    if bpm <= 0.0 || !bpm.is_finite() {
        return bpm;
    }

    let mut folded = bpm;
    let mut steps = 0;
    while folded > max_bpm && steps < MAX_OCTAVE_STEPS {
        folded /= 2.0;
        steps += 1;
    }
    while folded < min_bpm && steps < MAX_OCTAVE_STEPS {
        folded *= 2.0;
        steps += 1;
    }

    if (folded - bpm).abs() > f32::EPSILON {
        log::debug!("Folded tempo {:.2} -> {:.2} BPM", bpm, folded);
    }

    folded
}
