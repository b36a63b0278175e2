//! Swing analysis
//!
//! For each beat the strongest onset in the off-beat eighth slot gives the swing
//! fraction of that beat. The reported swing is the median over beats, which
//! keeps stray ghost onsets from dragging the value.
//!
//! Onsets sitting on a straight 16th line (the "e" or the "a") only count when
//! the beat has no other off-beat candidate, so an accented or rushed "a" in a
//! 16th pattern is not mistaken for a hard-swung eighth.

use serde::{Deserialize, Serialize};

use crate::features::grid::GridAlignment;
use crate::features::onset::threshold::median;

/// Lowest reported swing percentage (straight eighths)
pub const STRAIGHT_SWING: f32 = 50.0;

/// Highest reported swing percentage
pub const MAX_SWING: f32 = 75.0;

/// Eighth-note slots of a beat: downbeat, off-beat, next downbeat
const EIGHTH_SLOTS: [f32; 3] = [0.0, 0.5, 1.0];

/// Straight 16th lines inside the off-beat slot
const SIXTEENTH_LINES: [f32; 2] = [0.25, 0.75];

/// Distance (beat fraction) within which an onset counts as sitting on a 16th line
const SIXTEENTH_LINE_TOLERANCE: f32 = 0.03;

/// Swing measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingEstimate {
    /// Swing percentage in [50, 75]
    pub percentage: f32,

    /// Number of beats with an off-beat onset
    pub beats_measured: usize,
}

impl SwingEstimate {
    /// Off-beat line position as a beat fraction (`percentage / 100`)
    pub fn fraction(&self) -> f32 {
        self.percentage / 100.0
    }
}

/// Measure swing on a straight-grid alignment
///
/// # Returns
///
/// `None` when no beat has an onset in its off-beat slot
pub fn analyze_swing(alignment: &GridAlignment) -> Option<SwingEstimate> {
    // Chosen off-beat per beat
    let mut per_beat: Vec<OffbeatCandidate> = Vec::new();

    for onset in &alignment.onsets {
        if !in_offbeat_slot(onset.beat_fraction) {
            continue;
        }
        let candidate = OffbeatCandidate {
            beat: onset.beat_index,
            fraction: onset.beat_fraction,
            strength: onset.strength,
            between_lines: !on_sixteenth_line(onset.beat_fraction),
        };

        match per_beat.last_mut() {
            Some(last) if last.beat == candidate.beat => {
                if candidate.beats(last) {
                    *last = candidate;
                }
            }
            _ => per_beat.push(candidate),
        }
    }

    let values: Vec<f32> = per_beat
        .iter()
        .map(|c| (c.fraction * 100.0).clamp(STRAIGHT_SWING, MAX_SWING))
        .collect();

    let percentage = median(&values).ok()?.clamp(STRAIGHT_SWING, MAX_SWING);

    log::debug!(
        "Swing {:.1}% over {} beats (of {} spanned)",
        percentage,
        values.len(),
        alignment.beats_spanned()
    );

    Some(SwingEstimate {
        percentage,
        beats_measured: values.len(),
    })
}

#[derive(Debug, Clone, Copy)]
struct OffbeatCandidate {
    beat: i64,
    fraction: f32,
    strength: f32,
    between_lines: bool,
}

impl OffbeatCandidate {
    /// Onsets between the 16th lines outrank onsets on them, then strength decides
    fn beats(&self, other: &OffbeatCandidate) -> bool {
        match (self.between_lines, other.between_lines) {
            (true, false) => true,
            (false, true) => false,
            _ => self.strength > other.strength,
        }
    }
}

fn on_sixteenth_line(fraction: f32) -> bool {
    SIXTEENTH_LINES
        .iter()
        .any(|&line| (fraction - line).abs() < SIXTEENTH_LINE_TOLERANCE)
}

/// Nearest eighth slot is the off-beat (ties go to the earlier slot)
fn in_offbeat_slot(fraction: f32) -> bool {
    let mut best = 0;
    let mut best_distance = (fraction - EIGHTH_SLOTS[0]).abs();
    for (idx, &slot) in EIGHTH_SLOTS.iter().enumerate().skip(1) {
        let distance = (fraction - slot).abs();
        if distance < best_distance {
            best = idx;
            best_distance = distance;
        }
    }
    best == 1
}
