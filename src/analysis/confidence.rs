//! Confidence scoring module
//!
//! Threads the tempo confidence through every grid-relative metric. Swing and
//! timing confidences can never exceed the tempo confidence they were measured
//! against.
//!
//! # Confidence Components
//!
//! 1. **Tempo**: IOI cluster dominance from the tempo estimator
//! 2. **Swing**: tempo confidence x share of beats with a measured off-beat
//! 3. **Timing**: tempo confidence x microtiming consistency
//! 4. **Overall**: weighted combination (tempo 40%, swing 30%, timing 30%)

use serde::{Deserialize, Serialize};

/// Confidence of each derived metric group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrooveConfidence {
    /// Tempo confidence (0.0-1.0)
    pub tempo: f32,

    /// Swing confidence (0.0-1.0)
    pub swing: f32,

    /// Microtiming / pocket confidence (0.0-1.0)
    pub timing: f32,

    /// Weighted average of the above
    pub overall: f32,
}

impl GrooveConfidence {
    /// All-zero confidence for unanalyzable input
    pub fn none() -> Self {
        Self {
            tempo: 0.0,
            swing: 0.0,
            timing: 0.0,
            overall: 0.0,
        }
    }
}

/// Combine stage confidences
///
/// # Arguments
///
/// * `tempo_confidence` - Confidence of the tempo estimate
/// * `swing_coverage` - Share of spanned beats with an off-beat onset (`None` = none measured)
/// * `consistency` - Microtiming consistency
pub fn compute_confidence(
    tempo_confidence: f32,
    swing_coverage: Option<f32>,
    consistency: f32,
) -> GrooveConfidence {
    let tempo = tempo_confidence.clamp(0.0, 1.0);
    let swing = swing_coverage
        .map(|coverage| tempo * coverage.clamp(0.0, 1.0))
        .unwrap_or(0.0);
    let timing = tempo * consistency.clamp(0.0, 1.0);

    let overall = (tempo * 0.4 + swing * 0.3 + timing * 0.3).clamp(0.0, 1.0);

    log::debug!(
        "Confidence: tempo={:.3}, swing={:.3}, timing={:.3}, overall={:.3}",
        tempo,
        swing,
        timing,
        overall
    );

    GrooveConfidence {
        tempo,
        swing,
        timing,
        overall,
    }
}
