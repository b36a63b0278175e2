//! Pairwise rhythmic compatibility
//!
//! Scores every unordered pair of analyzed samples on a 0-10 scale:
//! - swing closeness: full credit within `swing_full_credit_diff`, linear decay
//!   to zero at `swing_zero_credit_diff`
//! - identical timing feel
//! - equal (full) or adjacent (partial) humanization level
//! - both pocket scores at or above the pocket floor
//!
//! Every term depends on the pair only through symmetric quantities, so
//! `score(a, b) == score(b, a)`.

use crate::config::{AnalysisConfig, CompatibilityWeights};
use crate::error::AnalysisError;

use super::result::{CompatibilityResult, GrooveAnalysis, PairCompatibility};

/// Swing credit in [0, 1] for a swing difference in percentage points
fn swing_credit(diff: f32, weights: &CompatibilityWeights) -> f32 {
    if diff <= weights.swing_full_credit_diff {
        1.0
    } else if diff >= weights.swing_zero_credit_diff {
        0.0
    } else {
        (weights.swing_zero_credit_diff - diff)
            / (weights.swing_zero_credit_diff - weights.swing_full_credit_diff)
    }
}

/// Compatibility score of two analyses (0.0-10.0) with its rationale tag
///
/// Rationale priority: `swing_mismatch`, `feel_mismatch`, `humanization_mismatch`,
/// `swing_match`, `compatible`.
pub fn compatibility_score(
    a: &GrooveAnalysis,
    b: &GrooveAnalysis,
    weights: &CompatibilityWeights,
) -> (f32, &'static str) {
    let ga = &a.groove_metrics;
    let gb = &b.groove_metrics;

    let swing_diff = (ga.swing_percentage - gb.swing_percentage).abs();
    let swing_points = weights.swing * swing_credit(swing_diff, weights);

    let same_feel = ga.timing_feel == gb.timing_feel;
    let feel_points = if same_feel { weights.feel } else { 0.0 };

    let rank_diff = ga
        .humanization_level
        .rank()
        .abs_diff(gb.humanization_level.rank());
    let humanization_points = match rank_diff {
        0 => weights.humanization,
        1 => weights.humanization * weights.humanization_adjacent_fraction,
        _ => 0.0,
    };

    let pocket_points = if ga.pocket_score >= weights.pocket_floor && gb.pocket_score >= weights.pocket_floor {
        weights.pocket
    } else {
        0.0
    };

    let score = swing_points + feel_points + humanization_points + pocket_points;
    let score = if score.is_finite() { score.clamp(0.0, 10.0) } else { 0.0 };

    let rationale = if swing_diff >= weights.swing_zero_credit_diff {
        "swing_mismatch"
    } else if !same_feel {
        "feel_mismatch"
    } else if rank_diff > 1 {
        "humanization_mismatch"
    } else if swing_diff <= weights.swing_full_credit_diff {
        "swing_match"
    } else {
        "compatible"
    };

    (score, rationale)
}

/// Score every pair of a collection and pick the best pair
///
/// # Arguments
///
/// * `samples` - `(identifier, analysis)` pairs
/// * `config` - Supplies the compatibility weights
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for fewer than two samples
pub fn compare(
    samples: &[(String, GrooveAnalysis)],
    config: &AnalysisConfig,
) -> Result<CompatibilityResult, AnalysisError> {
    if samples.len() < 2 {
        return Err(AnalysisError::InvalidInput(format!(
            "Compatibility needs at least 2 samples, got {}",
            samples.len()
        )));
    }

    let mut pairs = Vec::with_capacity(samples.len() * (samples.len() - 1) / 2);
    for i in 0..samples.len() {
        for j in (i + 1)..samples.len() {
            let (score, rationale) = compatibility_score(&samples[i].1, &samples[j].1, &config.compatibility);
            pairs.push(PairCompatibility {
                first_id: samples[i].0.clone(),
                second_id: samples[j].0.clone(),
                first_index: i,
                second_index: j,
                compatibility_score: score,
                rationale: rationale.to_string(),
            });
        }
    }

    let mut best = &pairs[0];
    for pair in &pairs[1..] {
        if pair.compatibility_score > best.compatibility_score {
            best = pair;
        }
    }
    let best_pair = best.clone();

    log::debug!(
        "Compared {} samples ({} pairs), best {} + {} = {:.2} ({})",
        samples.len(),
        pairs.len(),
        best_pair.first_id,
        best_pair.second_id,
        best_pair.compatibility_score,
        best_pair.rationale
    );

    Ok(CompatibilityResult { pairs, best_pair })
}
