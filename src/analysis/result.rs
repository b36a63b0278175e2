//! Analysis result types

use serde::{Deserialize, Serialize};

use super::confidence::GrooveConfidence;
use super::metadata::GrooveMetadata;

/// Era label used when no decade can be decided
pub const UNKNOWN_ERA: &str = "unknown";

/// Timing feel relative to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingFeel {
    /// Consistently ahead of the grid (pushing)
    Ahead,
    /// Within the deadband around the grid
    On,
    /// Consistently behind the grid (laid back)
    Behind,
}

impl TimingFeel {
    /// Classify a push/pull bias with a symmetric deadband around zero
    ///
    /// # Example
    ///
    /// ```
    /// use groove_dsp::analysis::result::TimingFeel;
    ///
    /// assert_eq!(TimingFeel::from_push_pull(-8.0, 5.0), TimingFeel::Ahead);
    /// assert_eq!(TimingFeel::from_push_pull(5.0, 5.0), TimingFeel::On);
    /// assert_eq!(TimingFeel::from_push_pull(12.0, 5.0), TimingFeel::Behind);
    /// ```
    pub fn from_push_pull(push_pull_ms: f32, deadband_ms: f32) -> Self {
        if push_pull_ms < -deadband_ms {
            TimingFeel::Ahead
        } else if push_pull_ms > deadband_ms {
            TimingFeel::Behind
        } else {
            TimingFeel::On
        }
    }

    /// Lowercase label
    pub fn name(&self) -> &'static str {
        match self {
            TimingFeel::Ahead => "ahead",
            TimingFeel::On => "on",
            TimingFeel::Behind => "behind",
        }
    }
}

/// Humanization level, ordered from most to least precise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanizationLevel {
    /// Quantized / machine-exact
    Mechanical,
    /// Very small, consistent deviations
    Tight,
    /// Noticeable but controlled deviations
    Loose,
    /// Natural performance spread
    Human,
    /// Large, inconsistent deviations
    Drunk,
}

impl HumanizationLevel {
    /// Position on the ordered scale (mechanical = 0 .. drunk = 4)
    pub fn rank(&self) -> u8 {
        match self {
            HumanizationLevel::Mechanical => 0,
            HumanizationLevel::Tight => 1,
            HumanizationLevel::Loose => 2,
            HumanizationLevel::Human => 3,
            HumanizationLevel::Drunk => 4,
        }
    }

    /// Lowercase label
    pub fn name(&self) -> &'static str {
        match self {
            HumanizationLevel::Mechanical => "mechanical",
            HumanizationLevel::Tight => "tight",
            HumanizationLevel::Loose => "loose",
            HumanizationLevel::Human => "human",
            HumanizationLevel::Drunk => "drunk",
        }
    }
}

/// Ghost-note density bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostNoteDensity {
    /// No ghost notes
    None,
    /// Occasional ghost notes
    Low,
    /// Regular ghost notes
    Medium,
    /// Ghost notes dominate
    High,
}

impl GhostNoteDensity {
    /// Bucket a ghost fraction with ascending cut points for low / medium / high
    pub fn from_fraction(fraction: f32, cut_points: [f32; 3]) -> Self {
        if fraction >= cut_points[2] {
            GhostNoteDensity::High
        } else if fraction >= cut_points[1] {
            GhostNoteDensity::Medium
        } else if fraction >= cut_points[0] {
            GhostNoteDensity::Low
        } else {
            GhostNoteDensity::None
        }
    }

    /// Lowercase label
    pub fn name(&self) -> &'static str {
        match self {
            GhostNoteDensity::None => "none",
            GhostNoteDensity::Low => "low",
            GhostNoteDensity::Medium => "medium",
            GhostNoteDensity::High => "high",
        }
    }
}

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisFlag {
    /// Silence, too short, or no detectable onsets; metrics are neutral defaults
    InsufficientSignal,
    /// Fewer onsets than tempo estimation needs; grid metrics are neutral
    TooFewOnsets,
    /// Tempo confidence below the usability threshold
    AmbiguousTempo,
    /// No beat had an off-beat onset; swing defaults to straight
    NoOffbeats,
    /// Grid-relative metrics (swing, pocket) rest on an unreliable grid
    UnreliableGrid,
}

/// Groove metrics of one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrooveMetrics {
    /// Swing percentage (50.0-75.0, 50 = straight)
    pub swing_percentage: f32,

    /// Feel relative to the grid
    pub timing_feel: TimingFeel,

    /// Pocket score (0.0-10.0)
    pub pocket_score: f32,

    /// Humanization level
    pub humanization_level: HumanizationLevel,

    /// Ghost-note density
    pub ghost_note_density: GhostNoteDensity,
}

/// Timing metrics of one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingMetrics {
    /// Mean absolute offset from the grid in ms
    pub average_deviation_ms: f32,

    /// Swing as "on:off" ratio, e.g. "64:36"
    pub swing_ratio: String,

    /// Mean signed offset in ms (negative = ahead, positive = behind)
    pub push_pull_ms: f32,

    /// Uniformity of deviations (0.0-1.0, 1 = perfectly uniform)
    pub consistency: f32,
}

/// Format a swing percentage as an "on:off" ratio
///
/// # Example
///
/// ```
/// use groove_dsp::analysis::result::swing_ratio;
///
/// assert_eq!(swing_ratio(64.0), "64:36");
/// assert_eq!(swing_ratio(57.6), "58:42");
/// ```
pub fn swing_ratio(swing_percentage: f32) -> String {
    let on = swing_percentage.round().clamp(0.0, 100.0) as u32;
    format!("{}:{}", on, 100 - on)
}

/// Complete groove analysis of one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrooveAnalysis {
    /// Tempo in BPM (0.0 = unknown)
    pub bpm: f32,

    /// Tempo confidence (0.0-1.0)
    pub bpm_confidence: f32,

    /// Groove metrics
    pub groove_metrics: GrooveMetrics,

    /// Timing metrics
    pub timing_metrics: TimingMetrics,

    /// Decade label ("1960s" .. "2000s+") or "unknown"
    pub era_classification: String,

    /// Matching reference labels in catalog order (empty when none match)
    pub similar_to: Vec<String>,

    /// Human-readable description
    pub summary: String,

    /// Confidence of each derived metric group
    pub confidence: GrooveConfidence,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,

    /// Analysis metadata
    pub metadata: GrooveMetadata,
}

impl GrooveAnalysis {
    /// True when the flag is set
    pub fn has_flag(&self, flag: AnalysisFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Compatibility of one unordered pair of samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCompatibility {
    /// Identifier of the first sample
    pub first_id: String,

    /// Identifier of the second sample
    pub second_id: String,

    /// Index of the first sample in the compared collection
    pub first_index: usize,

    /// Index of the second sample in the compared collection
    pub second_index: usize,

    /// Compatibility score (0.0-10.0)
    pub compatibility_score: f32,

    /// Short rationale tag, e.g. "swing_match" or "feel_mismatch"
    pub rationale: String,
}

/// Pairwise compatibility over a collection of analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    /// Every unordered pair `(i, j)` with `i < j`, in index order
    pub pairs: Vec<PairCompatibility>,

    /// Highest-scoring pair (ties: first in index order)
    pub best_pair: PairCompatibility,
}
