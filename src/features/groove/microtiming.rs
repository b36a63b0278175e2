//! Microtiming profile
//!
//! Statistics of the signed onset-to-grid offsets:
//! - push/pull: mean offset (negative = ahead of the grid, positive = behind)
//! - average deviation: mean absolute offset
//! - consistency: `1 - std / (beat * consistency_beat_fraction)`, clamped to [0, 1]

use serde::{Deserialize, Serialize};

use crate::features::grid::GridAlignment;

/// Offset statistics of one alignment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicrotimingProfile {
    /// Mean signed offset in ms
    pub push_pull_ms: f32,

    /// Mean absolute offset in ms
    pub average_deviation_ms: f32,

    /// Population standard deviation of offsets in ms
    pub std_dev_ms: f32,

    /// 1 = perfectly uniform deviations, 0 = spread of a quarter beat or more
    pub consistency: f32,
}

impl MicrotimingProfile {
    /// Profile used when no grid could be built
    pub fn neutral() -> Self {
        Self {
            push_pull_ms: 0.0,
            average_deviation_ms: 0.0,
            std_dev_ms: 0.0,
            consistency: 0.0,
        }
    }
}

/// Compute offset statistics over all aligned onsets
///
/// # Arguments
///
/// * `alignment` - Grid alignment (swung grid when swing was measured)
/// * `consistency_beat_fraction` - Fraction of the beat whose spread maps to consistency 0
///
/// # Returns
///
/// [`MicrotimingProfile::neutral`] for an empty alignment
pub fn profile_microtiming(alignment: &GridAlignment, consistency_beat_fraction: f32) -> MicrotimingProfile {
    let n = alignment.onsets.len();
    if n == 0 || alignment.beat_period <= 0.0 {
        return MicrotimingProfile::neutral();
    }

    let offsets: Vec<f64> = alignment.onsets.iter().map(|o| o.offset_ms as f64).collect();
    let mean = offsets.iter().sum::<f64>() / n as f64;
    let mean_abs = offsets.iter().map(|x| x.abs()).sum::<f64>() / n as f64;
    let variance = offsets.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt() as f32;

    let spread_scale = alignment.beat_period * 1000.0 * consistency_beat_fraction;
    let consistency = if spread_scale > 0.0 {
        (1.0 - std_dev / spread_scale).clamp(0.0, 1.0)
    } else {
        0.0
    };

    log::debug!(
        "Microtiming: push/pull {:.2} ms, avg dev {:.2} ms, std {:.2} ms, consistency {:.3}",
        mean,
        mean_abs,
        std_dev,
        consistency
    );

    MicrotimingProfile {
        push_pull_ms: mean as f32,
        average_deviation_ms: mean_abs as f32,
        std_dev_ms: std_dev,
        consistency,
    }
}
