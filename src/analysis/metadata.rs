//! Analysis metadata structures

use serde::{Deserialize, Serialize};

use crate::config::AnalysisDepth;

/// Analysis metadata
///
/// Carries no wall-clock fields, so repeated analyses of the same input serialize
/// identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrooveMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of detected onsets
    pub onset_count: usize,

    /// Analysis depth used
    pub depth: AnalysisDepth,

    /// Grid lines per beat used for microtiming
    pub grid_subdivisions: u32,

    /// Fraction of frames above the silence floor (0.0-1.0)
    pub signal_activity: f32,

    /// Algorithm version
    pub algorithm_version: String,
}

impl GrooveMetadata {
    /// Metadata with the crate version as algorithm version
    pub fn new(
        duration_seconds: f32,
        sample_rate: u32,
        depth: AnalysisDepth,
        grid_subdivisions: u32,
    ) -> Self {
        Self {
            duration_seconds,
            sample_rate,
            onset_count: 0,
            depth,
            grid_subdivisions,
            signal_activity: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
