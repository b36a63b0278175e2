//! Era classification
//!
//! Nearest match of a groove against a static table of per-decade swing ranges,
//! humanization profiles and genre keywords.
//!
//! Resolution order:
//! 1. Exactly one decade range contains the swing: that decade
//! 2. Several contain it: keep the ones whose humanization profile matches; a
//!    genre hint may break a remaining tie; otherwise "unknown"
//! 3. None contain it: the single nearest range within the match tolerance,
//!    otherwise "unknown"

use super::result::{HumanizationLevel, UNKNOWN_ERA};

use HumanizationLevel::*;

/// Groove profile of one decade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraProfile {
    /// Decade label
    pub label: &'static str,

    /// Inclusive swing percentage range
    pub swing_range: (f32, f32),

    /// Typical humanization levels
    pub humanization: &'static [HumanizationLevel],

    /// Lowercase genre keywords matched against the hint
    pub genre_keywords: &'static [&'static str],
}

impl EraProfile {
    fn contains(&self, swing: f32) -> bool {
        swing >= self.swing_range.0 && swing <= self.swing_range.1
    }

    fn distance(&self, swing: f32) -> f32 {
        if self.contains(swing) {
            0.0
        } else {
            (swing - self.swing_range.0)
                .abs()
                .min((swing - self.swing_range.1).abs())
        }
    }

    fn matches_humanization(&self, level: HumanizationLevel) -> bool {
        self.humanization.contains(&level)
    }

    fn matches_genre(&self, hint: &str) -> bool {
        self.genre_keywords.iter().any(|k| hint.contains(k))
    }
}

/// Per-decade profiles, oldest first
pub static ERA_PROFILES: [EraProfile; 5] = [
    EraProfile {
        label: "1960s",
        swing_range: (58.0, 70.0),
        humanization: &[Loose, Human],
        genre_keywords: &["soul", "motown", "jazz", "rhythm and blues", "r&b"],
    },
    EraProfile {
        label: "1970s",
        swing_range: (54.0, 64.0),
        humanization: &[Tight, Loose, Human],
        genre_keywords: &["funk", "disco", "breakbeat"],
    },
    EraProfile {
        label: "1980s",
        swing_range: (50.0, 56.0),
        humanization: &[Mechanical, Tight],
        genre_keywords: &["electro", "synth", "new wave", "freestyle"],
    },
    EraProfile {
        label: "1990s",
        swing_range: (56.0, 68.0),
        humanization: &[Tight, Loose],
        genre_keywords: &["boom bap", "golden age", "jungle", "trip hop"],
    },
    EraProfile {
        label: "2000s+",
        swing_range: (52.0, 66.0),
        humanization: &[Loose, Human, Drunk],
        genre_keywords: &["neo-soul", "neo soul", "lofi", "lo-fi", "beat scene", "trap"],
    },
];

/// Classify the production era of a groove
///
/// # Arguments
///
/// * `swing` - Swing percentage
/// * `level` - Humanization level
/// * `genre_hint` - Optional free-form genre (case-insensitive keyword match)
/// * `tolerance` - Largest swing distance accepted when no range contains the swing
///
/// # Example
///
/// ```
/// use groove_dsp::analysis::era::classify_era;
/// use groove_dsp::analysis::result::HumanizationLevel;
///
/// assert_eq!(classify_era(51.0, HumanizationLevel::Mechanical, None, 2.0), "1980s");
/// assert_eq!(classify_era(69.0, HumanizationLevel::Human, None, 2.0), "1960s");
/// ```
pub fn classify_era(
    swing: f32,
    level: HumanizationLevel,
    genre_hint: Option<&str>,
    tolerance: f32,
) -> &'static str {
    let hint = genre_hint.map(|h| h.to_lowercase());

    let containing: Vec<&EraProfile> = ERA_PROFILES.iter().filter(|p| p.contains(swing)).collect();

    let candidates = if containing.is_empty() {
        let nearest = ERA_PROFILES
            .iter()
            .map(|p| p.distance(swing))
            .fold(f32::INFINITY, f32::min);
        if !(nearest <= tolerance) {
            log::debug!("Era: swing {:.1}% outside every range", swing);
            return UNKNOWN_ERA;
        }
        ERA_PROFILES
            .iter()
            .filter(|p| p.distance(swing) <= nearest)
            .collect()
    } else {
        containing
    };

    let label = resolve(&candidates, level, hint.as_deref());
    log::debug!(
        "Era: {} (swing {:.1}%, {}, {} candidates)",
        label,
        swing,
        level.name(),
        candidates.len()
    );
    label
}

fn resolve(candidates: &[&EraProfile], level: HumanizationLevel, hint: Option<&str>) -> &'static str {
    if let [only] = candidates {
        return only.label;
    }

    let by_feel: Vec<&EraProfile> = candidates
        .iter()
        .copied()
        .filter(|p| p.matches_humanization(level))
        .collect();
    if let [only] = by_feel.as_slice() {
        return only.label;
    }

    let pool: &[&EraProfile] = if by_feel.is_empty() { candidates } else { &by_feel };
    if let Some(hint) = hint {
        let by_genre: Vec<&EraProfile> = pool.iter().copied().filter(|p| p.matches_genre(hint)).collect();
        if let [only] = by_genre.as_slice() {
            return only.label;
        }
    }

    UNKNOWN_ERA
}
