//! Pocket score
//!
//! `10 - |push_pull - optimum| / bias_divisor - (1 - consistency) * consistency_weight`,
//! clamped to [0, 10]. With the default optimum of -15 ms the best pocket sits
//! slightly ahead of the grid.

use crate::config::AnalysisConfig;

/// Maximum pocket score
pub const MAX_POCKET: f32 = 10.0;

/// Score how well a performance sits in the pocket
///
/// # Example
///
/// ```
/// use groove_dsp::analysis::pocket::pocket_score;
/// use groove_dsp::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert!((pocket_score(-15.0, 1.0, &config) - 10.0).abs() < 1e-6);
/// assert!((pocket_score(0.0, 1.0, &config) - 8.5).abs() < 1e-6);
/// assert!((pocket_score(0.0, 0.0, &config) - 3.5).abs() < 1e-6);
/// ```
pub fn pocket_score(push_pull_ms: f32, consistency: f32, config: &AnalysisConfig) -> f32 {
    let bias_penalty = (push_pull_ms - config.pocket_optimum_ms).abs() / config.pocket_bias_divisor;
    let spread_penalty = (1.0 - consistency.clamp(0.0, 1.0)) * config.pocket_consistency_weight;

    let score = MAX_POCKET - bias_penalty - spread_penalty;
    if score.is_finite() {
        score.clamp(0.0, MAX_POCKET)
    } else {
        0.0
    }
}
