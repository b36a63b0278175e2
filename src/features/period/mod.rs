//! Tempo estimation
//!
//! Convert an onset list to a base tempo and confidence using inter-onset-interval
//! clustering:
//! - IOI histogram clustering and harmonic scoring
//! - Period refinement and octave folding into the plausible range

pub mod candidate_filter;
pub mod ioi_histogram;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::features::onset::OnsetEvent;
use ioi_histogram::{IoiCluster, MAX_MULTIPLE};

/// Minimum number of onsets needed for a tempo estimate
pub const MIN_ONSETS_FOR_TEMPO: usize = 4;

/// Tempo estimate with confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoEstimate {
    /// Tempo in BPM (0.0 = unknown)
    pub bpm: f32,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

impl TempoEstimate {
    /// Unknown tempo (too few onsets or no periodicity)
    pub fn unknown() -> Self {
        Self {
            bpm: 0.0,
            confidence: 0.0,
        }
    }

    /// True when a positive tempo was estimated
    pub fn is_known(&self) -> bool {
        self.bpm > 0.0
    }

    /// Beat period in seconds, `None` for an unknown tempo
    pub fn beat_period(&self) -> Option<f32> {
        if self.is_known() {
            Some(60.0 / self.bpm)
        } else {
            None
        }
    }

    /// True when the tempo is known but its confidence is below `threshold`
    pub fn is_ambiguous(&self, threshold: f32) -> bool {
        self.is_known() && self.confidence < threshold
    }
}

/// Estimate the base tempo from an onset sequence
///
/// # Arguments
///
/// * `onsets` - Onsets in increasing time order
/// * `config` - Supplies the tempo range and IOI cluster tolerance
///
/// # Returns
///
/// `TempoEstimate` whose BPM lies in `[min_bpm, max_bpm]`, or
/// [`TempoEstimate::unknown`] for fewer than 4 onsets or no usable intervals.
///
/// # Algorithm
///
/// 1. Cluster all pairwise IOIs and score clusters by harmonic support
/// 2. Pick the best-scoring cluster (ties: shorter interval)
/// 3. Refine its period from all supporting intervals
/// 4. Fold into the plausible tempo range by halving/doubling
/// 5. Confidence = `(best - rival) / (best + rival)` where `rival` is the best
///    score among clusters that are not harmonically related to the winner and
///    repeat back-to-back somewhere in the onsets (off-beat offsets of a swung
///    pattern alternate and never compete)
///
/// Deterministic for identical input.
pub fn estimate_tempo(onsets: &[OnsetEvent], config: &AnalysisConfig) -> TempoEstimate {
    if onsets.len() < MIN_ONSETS_FOR_TEMPO {
        log::warn!(
            "Only {} onsets, need {} for tempo estimation",
            onsets.len(),
            MIN_ONSETS_FOR_TEMPO
        );
        return TempoEstimate::unknown();
    }

    let times: Vec<f32> = onsets.iter().map(|o| o.time_seconds).collect();
    let tolerance = config.ioi_cluster_tolerance_ms / 1000.0;

    // Shortest interval of interest: 16th notes at the fastest plausible tempo
    let min_ioi = 60.0 / (config.max_bpm * 4.0);
    // Longest: two beats at the slowest plausible tempo
    let max_ioi = 2.0 * 60.0 / config.min_bpm;

    let intervals = ioi_histogram::collect_intervals(&times, min_ioi, max_ioi);
    let mut clusters = ioi_histogram::cluster_intervals(&intervals, tolerance);
    if clusters.is_empty() {
        log::warn!("No inter-onset intervals within {:.3}-{:.3}s", min_ioi, max_ioi);
        return TempoEstimate::unknown();
    }
    ioi_histogram::score_clusters(&mut clusters, tolerance);

    let mut best: &IoiCluster = &clusters[0];
    for cluster in &clusters[1..] {
        if cluster.score > best.score {
            best = cluster;
        }
    }

    let rival = clusters
        .iter()
        .filter(|c| !ioi_histogram::harmonically_related(c.interval, best.interval, tolerance))
        .filter(|c| ioi_histogram::chain_count(&times, c.interval, tolerance) > 0)
        .map(|c| c.score)
        .fold(0.0f32, f32::max);

    let confidence = if best.score > 0.0 {
        ((best.score - rival) / (best.score + rival)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let period = candidate_filter::refine_period(best.interval, &intervals, tolerance);
    if period <= 0.0 {
        return TempoEstimate::unknown();
    }

    let raw_bpm = 60.0 / period;
    let bpm = candidate_filter::fold_into_range(raw_bpm, config.min_bpm, config.max_bpm);

    log::debug!(
        "Tempo: {:.2} BPM (raw {:.2}, {} clusters, best score {:.1}, rival {:.1}, confidence {:.3}, multiples<={})",
        bpm,
        raw_bpm,
        clusters.len(),
        best.score,
        rival,
        confidence,
        MAX_MULTIPLE
    );

    TempoEstimate { bpm, confidence }
}
