//! Configuration parameters for groove analysis
//!
//! Every tunable of the pipeline lives here so that collaborators can recalibrate
//! the classifiers without touching the algorithms. The whole structure derives
//! serde with `#[serde(default)]`, so a partial JSON document only overrides the
//! fields it names.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Analysis depth, trading detector sensitivity and grid resolution for runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    /// Energy flux only, coarse hop
    Quick,
    /// Energy + spectral flux, medium hop (default)
    #[default]
    Detailed,
    /// Energy + spectral flux, fine hop, 16th-note grid
    Deep,
}

impl AnalysisDepth {
    /// Lowercase name used in metadata and logs
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisDepth::Quick => "quick",
            AnalysisDepth::Detailed => "detailed",
            AnalysisDepth::Deep => "deep",
        }
    }
}

/// Per-call options supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Analysis depth (default: Detailed)
    #[serde(default)]
    pub depth: AnalysisDepth,

    /// Free-form genre hint passed through to the era classifier
    #[serde(default)]
    pub genre_hint: Option<String>,
}

impl AnalysisOptions {
    /// Options with the given depth and no genre hint
    pub fn with_depth(depth: AnalysisDepth) -> Self {
        Self {
            depth,
            genre_hint: None,
        }
    }

    /// Attach a genre hint
    pub fn genre_hint(mut self, hint: impl Into<String>) -> Self {
        self.genre_hint = Some(hint.into());
        self
    }
}

/// Onset detector and grid parameters for one analysis depth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Analysis frame size in samples
    pub frame_size: usize,

    /// Hop size between frames in samples
    pub hop_size: usize,

    /// Peak threshold in dB relative to the strongest detection-function peak
    pub threshold_db: f32,

    /// Blend spectral flux (STFT) into the energy flux detection function
    pub use_spectral_flux: bool,

    /// Grid lines per beat used for microtiming (2 = 8ths, 4 = 16ths)
    pub grid_subdivisions: u32,
}

/// Cut points for the humanization classifier
///
/// Consistency thresholds are checked in order, highest first. Below
/// `human_min_consistency` the level is `drunk` when the average deviation
/// reaches `drunk_min_deviation_ms`, otherwise `human`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizationThresholds {
    /// Minimum consistency for "mechanical" (default: 0.98)
    pub mechanical_min_consistency: f32,
    /// Minimum consistency for "tight" (default: 0.95)
    pub tight_min_consistency: f32,
    /// Minimum consistency for "loose" (default: 0.90)
    pub loose_min_consistency: f32,
    /// Minimum consistency for "human" (default: 0.80)
    pub human_min_consistency: f32,
    /// Average deviation at which low consistency reads as "drunk" (default: 20 ms)
    pub drunk_min_deviation_ms: f32,
}

impl Default for HumanizationThresholds {
    fn default() -> Self {
        Self {
            mechanical_min_consistency: 0.98,
            tight_min_consistency: 0.95,
            loose_min_consistency: 0.90,
            human_min_consistency: 0.80,
            drunk_min_deviation_ms: 20.0,
        }
    }
}

/// Weights of the pairwise compatibility score (sum of max credits = 10)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityWeights {
    /// Points for swing closeness (default: 5.0)
    pub swing: f32,
    /// Swing difference that still earns full credit, in percentage points (default: 5.0)
    pub swing_full_credit_diff: f32,
    /// Swing difference at which the credit reaches zero (default: 20.0)
    pub swing_zero_credit_diff: f32,
    /// Points for identical timing feel (default: 2.0)
    pub feel: f32,
    /// Points for identical humanization level (default: 2.0)
    pub humanization: f32,
    /// Fraction of `humanization` granted for adjacent levels (default: 0.5)
    pub humanization_adjacent_fraction: f32,
    /// Points when both pocket scores reach `pocket_floor` (default: 1.0)
    pub pocket: f32,
    /// Pocket score floor for the pocket bonus (default: 7.0)
    pub pocket_floor: f32,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            swing: 5.0,
            swing_full_credit_diff: 5.0,
            swing_zero_credit_diff: 20.0,
            feel: 2.0,
            humanization: 2.0,
            humanization_adjacent_fraction: 0.5,
            pocket: 1.0,
            pocket_floor: 7.0,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Tempo
    /// Lower bound of the plausible tempo range (default: 40.0)
    pub min_bpm: f32,

    /// Upper bound of the plausible tempo range (default: 200.0)
    pub max_bpm: f32,

    /// Tempo confidence below which grid metrics are flagged unreliable (default: 0.3)
    pub tempo_usability_threshold: f32,

    /// Width of an inter-onset-interval cluster in milliseconds (default: 25.0)
    pub ioi_cluster_tolerance_ms: f32,

    // Onset detection
    /// Peak level below which a buffer counts as silent, in dBFS (default: -60.0)
    pub silence_floor_db: f32,

    /// Onsets closer than this are merged (default: 30 ms)
    pub min_onset_gap_ms: f32,

    /// Detector parameters for [`AnalysisDepth::Quick`]
    pub quick: DetectorParams,

    /// Detector parameters for [`AnalysisDepth::Detailed`]
    pub detailed: DetectorParams,

    /// Detector parameters for [`AnalysisDepth::Deep`]
    pub deep: DetectorParams,

    // Microtiming
    /// Offset spread is normalised by this fraction of the beat (default: 0.25)
    pub consistency_beat_fraction: f32,

    /// Share of onsets on 16th-note lines that refines an 8th-note grid to 16ths (default: 0.2)
    pub sixteenth_grid_min_share: f32,

    /// Push/pull deadband for the "on" timing feel (default: 5.0 ms)
    pub timing_feel_deadband_ms: f32,

    // Pocket
    /// Designed pocket optimum in ms, negative = ahead (default: -15.0)
    pub pocket_optimum_ms: f32,

    /// Divisor for the bias penalty (default: 10.0)
    pub pocket_bias_divisor: f32,

    /// Weight of the inconsistency penalty (default: 5.0)
    pub pocket_consistency_weight: f32,

    // Classifiers
    /// Humanization cut points
    pub humanization: HumanizationThresholds,

    /// Onsets weaker than this fraction of the reference strength are ghost candidates (default: 0.5)
    pub ghost_strength_ratio: f32,

    /// Percentile of onset strength used as the accent reference (default: 0.75)
    pub ghost_reference_percentile: f32,

    /// Ghost-note fraction cut points for low / medium / high (default: 0.05, 0.15, 0.35)
    pub ghost_density_cut_points: [f32; 3],

    /// Minimum similarity for a reference-artist match (default: 0.0)
    pub reference_min_similarity: f32,

    /// Swing distance to the nearest era range still accepted when no range contains
    /// the sample (default: 2.0 percentage points)
    pub era_match_tolerance: f32,

    /// Compatibility score weights
    pub compatibility: CompatibilityWeights,

    // Decoder
    /// File extensions the decoder accepts (lowercase, no dot)
    pub supported_extensions: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_bpm: 40.0,
            max_bpm: 200.0,
            tempo_usability_threshold: 0.3,
            ioi_cluster_tolerance_ms: 25.0,
            silence_floor_db: -60.0,
            min_onset_gap_ms: 30.0,
            quick: DetectorParams {
                frame_size: 2048,
                hop_size: 512,
                threshold_db: -20.0,
                use_spectral_flux: false,
                grid_subdivisions: 2,
            },
            detailed: DetectorParams {
                frame_size: 1024,
                hop_size: 256,
                threshold_db: -26.0,
                use_spectral_flux: true,
                grid_subdivisions: 2,
            },
            deep: DetectorParams {
                frame_size: 1024,
                hop_size: 128,
                threshold_db: -32.0,
                use_spectral_flux: true,
                grid_subdivisions: 4,
            },
            consistency_beat_fraction: 0.25,
            sixteenth_grid_min_share: 0.2,
            timing_feel_deadband_ms: 5.0,
            pocket_optimum_ms: -15.0,
            pocket_bias_divisor: 10.0,
            pocket_consistency_weight: 5.0,
            humanization: HumanizationThresholds::default(),
            ghost_strength_ratio: 0.5,
            ghost_reference_percentile: 0.75,
            ghost_density_cut_points: [0.05, 0.15, 0.35],
            reference_min_similarity: 0.0,
            era_match_tolerance: 2.0,
            compatibility: CompatibilityWeights::default(),
            supported_extensions: ["wav", "mp3", "flac", "m4a", "ogg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalysisConfig {
    /// Detector parameters for the requested depth
    pub fn detector(&self, depth: AnalysisDepth) -> &DetectorParams {
        match depth {
            AnalysisDepth::Quick => &self.quick,
            AnalysisDepth::Detailed => &self.detailed,
            AnalysisDepth::Deep => &self.deep,
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.min_bpm > 0.0 && self.max_bpm > self.min_bpm) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid tempo range: {:.1}-{:.1} BPM",
                self.min_bpm, self.max_bpm
            )));
        }

        // Octave folding needs at least one doubling inside the range
        if self.max_bpm < self.min_bpm * 2.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Tempo range {:.1}-{:.1} BPM must span at least one octave",
                self.min_bpm, self.max_bpm
            )));
        }

        for (name, params) in [
            ("quick", &self.quick),
            ("detailed", &self.detailed),
            ("deep", &self.deep),
        ] {
            if params.frame_size == 0 || params.hop_size == 0 {
                return Err(AnalysisError::InvalidInput(format!(
                    "Detector '{}' needs non-zero frame and hop sizes",
                    name
                )));
            }
            if params.grid_subdivisions == 0 {
                return Err(AnalysisError::InvalidInput(format!(
                    "Detector '{}' needs at least one grid subdivision",
                    name
                )));
            }
        }

        if self.consistency_beat_fraction <= 0.0 || self.pocket_bias_divisor <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "Normalisation divisors must be positive".to_string(),
            ));
        }

        let w = &self.compatibility;
        if w.swing_zero_credit_diff <= w.swing_full_credit_diff {
            return Err(AnalysisError::InvalidInput(
                "Swing zero-credit difference must exceed the full-credit difference".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the decoder accepts files with this extension (case-insensitive)
    pub fn supports_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.supported_extensions.iter().any(|e| *e == ext)
    }
}
