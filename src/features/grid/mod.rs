//! Metrical grid alignment
//!
//! Maps each onset onto a hypothesised 4/4 grid built from the beat period:
//! - Anchor (beat phase) selection by weighted beat-line agreement
//! - Per-onset nearest grid line and signed offset in milliseconds
//!
//! Onsets are assigned independently; there is no global path optimisation.
//! An onset equidistant between two grid lines goes to the earlier line.

use serde::{Deserialize, Serialize};

use crate::features::onset::OnsetEvent;

/// An onset placed on the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedOnset {
    /// Onset time in seconds
    pub time_seconds: f32,

    /// Onset strength (0.0-1.0)
    pub strength: f32,

    /// Beat containing the onset, counted from the anchor (may be negative)
    pub beat_index: i64,

    /// Position of the onset inside its beat, in [0, 1)
    pub beat_fraction: f32,

    /// Beat of the nearest grid line (`beat_index + 1` when the line is the next downbeat)
    pub grid_beat: i64,

    /// Nearest grid position as a fraction of the beat, in [0, 1)
    pub grid_position: f32,

    /// Signed offset from the grid line in ms (negative = ahead, positive = behind)
    pub offset_ms: f32,
}

/// Onsets aligned to one grid hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAlignment {
    /// Time of the beat line the grid is anchored to, in seconds
    pub anchor_seconds: f32,

    /// Beat period in seconds
    pub beat_period: f32,

    /// Grid lines per beat
    pub subdivisions: u32,

    /// Position of the swung off-beat line, `None` for a straight grid
    pub swing_fraction: Option<f32>,

    /// Aligned onsets in time order
    pub onsets: Vec<AlignedOnset>,
}

impl GridAlignment {
    /// Number of beats between the first and last aligned onset (inclusive)
    pub fn beats_spanned(&self) -> usize {
        match (self.onsets.first(), self.onsets.last()) {
            (Some(first), Some(last)) => (last.beat_index - first.beat_index + 1).max(0) as usize,
            _ => 0,
        }
    }
}

/// Choose the beat phase of the grid
///
/// Every onset is tried as anchor; the winner maximises the strength-weighted
/// number of onsets that fall within `tolerance` seconds of a beat line. Ties go
/// to the earliest onset.
///
/// # Returns
///
/// Anchor time in seconds, `None` for an empty onset list or a non-positive period
pub fn select_anchor(onsets: &[OnsetEvent], beat_period: f32, tolerance: f32) -> Option<f32> {
    if onsets.is_empty() || beat_period <= 0.0 {
        return None;
    }

    let tolerance_fraction = (tolerance / beat_period).min(0.5);
    let mut best: Option<(f32, f32)> = None;

    for candidate in onsets {
        let support: f32 = onsets
            .iter()
            .filter(|o| {
                let (_, fraction) = beat_position(o.time_seconds, candidate.time_seconds, beat_period);
                fraction < tolerance_fraction || 1.0 - fraction < tolerance_fraction
            })
            .map(|o| o.strength)
            .sum();

        match best {
            Some((_, best_support)) if support <= best_support => {}
            _ => best = Some((candidate.time_seconds, support)),
        }
    }

    best.map(|(anchor, support)| {
        log::debug!("Grid anchor at {:.4}s (support {:.2})", anchor, support);
        anchor
    })
}

/// Grid line positions within one beat, including the closing line at 1.0
///
/// With a swing fraction `s` and an even number of subdivisions the first half
/// of the beat `[0, s]` and the second half `[s, 1]` are each split evenly, so
/// the off-beat eighth sits at `s`. Odd subdivisions ignore swing.
pub fn grid_lines(subdivisions: u32, swing_fraction: Option<f32>) -> Vec<f32> {
    let n = subdivisions.max(1);

    match swing_fraction {
        Some(s) if n % 2 == 0 => {
            let half = n / 2;
            let mut lines = Vec::with_capacity(n as usize + 1);
            for k in 0..half {
                lines.push(s * k as f32 / half as f32);
            }
            for k in 0..half {
                lines.push(s + (1.0 - s) * k as f32 / half as f32);
            }
            lines.push(1.0);
            lines
        }
        _ => (0..=n).map(|k| k as f32 / n as f32).collect(),
    }
}

/// Align onsets to the grid anchored at `anchor_seconds`
///
/// # Arguments
///
/// * `onsets` - Onsets in time order
/// * `beat_period` - Beat period in seconds (must be positive)
/// * `anchor_seconds` - Time of one beat line
/// * `subdivisions` - Grid lines per beat (2 = 8ths, 4 = 16ths)
/// * `swing_fraction` - Off-beat line position for a swung grid, `None` for straight
pub fn align_onsets(
    onsets: &[OnsetEvent],
    beat_period: f32,
    anchor_seconds: f32,
    subdivisions: u32,
    swing_fraction: Option<f32>,
) -> GridAlignment {
    let lines = grid_lines(subdivisions, swing_fraction);

    let aligned = onsets
        .iter()
        .map(|onset| {
            let (beat_index, beat_fraction) =
                beat_position(onset.time_seconds, anchor_seconds, beat_period);

            let (line_idx, line) = nearest_line(&lines, beat_fraction);
            let wraps = line_idx == lines.len() - 1;

            AlignedOnset {
                time_seconds: onset.time_seconds,
                strength: onset.strength,
                beat_index,
                beat_fraction,
                grid_beat: if wraps { beat_index + 1 } else { beat_index },
                grid_position: if wraps { 0.0 } else { line },
                offset_ms: (beat_fraction - line) * beat_period * 1000.0,
            }
        })
        .collect();

    GridAlignment {
        anchor_seconds,
        beat_period,
        subdivisions: subdivisions.max(1),
        swing_fraction,
        onsets: aligned,
    }
}

/// Share of onsets whose nearest 16th-note grid line is an odd 16th
///
/// The 16th grid honours the swing fraction, so swung eighths land on the
/// off-beat line and do not count. A high share means an 8th-note grid would
/// mistake 16th notes for large timing deviations.
pub fn sixteenth_share(
    onsets: &[OnsetEvent],
    beat_period: f32,
    anchor_seconds: f32,
    swing_fraction: Option<f32>,
) -> f32 {
    if onsets.is_empty() {
        return 0.0;
    }

    let lines = grid_lines(4, swing_fraction);
    let alignment = align_onsets(onsets, beat_period, anchor_seconds, 4, swing_fraction);
    let odd = alignment
        .onsets
        .iter()
        .filter(|o| o.grid_position == lines[1] || o.grid_position == lines[3])
        .count();

    odd as f32 / onsets.len() as f32
}

/// Beat index and fraction in [0, 1) of `time` relative to the anchor
fn beat_position(time: f32, anchor: f32, beat_period: f32) -> (i64, f32) {
    let beats = ((time - anchor) / beat_period) as f64;
    let mut index = beats.floor() as i64;
    let mut fraction = (beats - index as f64) as f32;
    if fraction >= 1.0 {
        index += 1;
        fraction = 0.0;
    }
    (index, fraction.max(0.0))
}

/// Index and position of the nearest line; ties resolve to the earlier line
fn nearest_line(lines: &[f32], fraction: f32) -> (usize, f32) {
    let mut best = (0, lines[0]);
    let mut best_distance = (fraction - lines[0]).abs();

    for (idx, &line) in lines.iter().enumerate().skip(1) {
        let distance = (fraction - line).abs();
        if distance < best_distance {
            best = (idx, line);
            best_distance = distance;
        }
    }

    best
}
