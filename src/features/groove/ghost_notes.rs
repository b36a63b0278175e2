//! Ghost-note detection
//!
//! A ghost note is an onset much weaker than the accented hits. The accent
//! reference is a high percentile of the strength distribution rather than the
//! maximum, so a single loud hit does not turn every other onset into a ghost.

use crate::features::onset::threshold::percentile_threshold;
use crate::features::onset::OnsetEvent;

/// Fraction of onsets that are ghost notes
///
/// # Arguments
///
/// * `onsets` - Detected onsets
/// * `strength_ratio` - Ghost if `strength < strength_ratio * reference`
/// * `reference_percentile` - Percentile of strengths used as reference (0.0-1.0)
///
/// # Returns
///
/// Ghost fraction in [0, 1]; 0 for an empty list or invalid percentile
pub fn ghost_note_fraction(onsets: &[OnsetEvent], strength_ratio: f32, reference_percentile: f32) -> f32 {
    if onsets.is_empty() {
        return 0.0;
    }

    let strengths: Vec<f32> = onsets.iter().map(|o| o.strength).collect();
    let reference = match percentile_threshold(&strengths, reference_percentile) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ghost-note reference unavailable: {}", e);
            return 0.0;
        }
    };

    let cutoff = reference * strength_ratio;
    let ghosts = strengths.iter().filter(|&&s| s < cutoff).count();
    let fraction = ghosts as f32 / strengths.len() as f32;

    log::debug!(
        "Ghost notes: {}/{} below {:.3} (reference {:.3})",
        ghosts,
        strengths.len(),
        cutoff,
        reference
    );

    fraction
}
