//! Humanization classifier
//!
//! Ordered consistency cut points from [`HumanizationThresholds`]; below the
//! lowest cut point the average deviation separates "human" from "drunk".

use crate::config::HumanizationThresholds;

use super::result::HumanizationLevel;

/// Map consistency and average deviation to a humanization level
pub fn classify_humanization(
    consistency: f32,
    average_deviation_ms: f32,
    thresholds: &HumanizationThresholds,
) -> HumanizationLevel {
    let level = if consistency >= thresholds.mechanical_min_consistency {
        HumanizationLevel::Mechanical
    } else if consistency >= thresholds.tight_min_consistency {
        HumanizationLevel::Tight
    } else if consistency >= thresholds.loose_min_consistency {
        HumanizationLevel::Loose
    } else if consistency >= thresholds.human_min_consistency {
        HumanizationLevel::Human
    } else if average_deviation_ms >= thresholds.drunk_min_deviation_ms {
        HumanizationLevel::Drunk
    } else {
        HumanizationLevel::Human
    };

    log::debug!(
        "Humanization: {} (consistency {:.3}, avg dev {:.1} ms)",
        level.name(),
        consistency,
        average_deviation_ms
    );

    level
}
