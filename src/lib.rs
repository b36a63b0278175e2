//! # Groove DSP
//!
//! A groove and timing analysis engine for sample-based production, measuring
//! how a recorded performance sits against its metrical grid.
//!
//! ## Features
//!
//! - **Onset Detection**: Energy and spectral flux with sample-accurate refinement
//! - **Tempo Estimation**: Inter-onset-interval clustering with octave folding
//! - **Swing & Microtiming**: Swing percentage, push/pull bias, consistency
//! - **Classification**: Pocket score, humanization level, era and reference grooves
//! - **Compatibility**: Pairwise groove compatibility across a set of samples
//! - **Batch**: Parallel analysis of many files with per-file outcomes
//!
//! ## Quick Start
//!
//! ```no_run
//! use groove_dsp::{analyze_file, AnalysisConfig, AnalysisOptions};
//!
//! let result = analyze_file("break.wav", &AnalysisOptions::default(), &AnalysisConfig::default())?;
//!
//! println!("BPM: {:.1} (confidence: {:.2})", result.bpm, result.bpm_confidence);
//! println!("Swing: {}", result.timing_metrics.swing_ratio);
//! println!("Pocket: {:.1}/10", result.groove_metrics.pocket_score);
//! # Ok::<(), groove_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline is a linear chain of pure stages:
//!
//! ```text
//! Decode → Onsets → Tempo → Grid → {Swing, Microtiming} → Pocket → Humanization → Era → References
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

#[cfg(test)]
mod test_signals;

use std::path::Path;
use std::time::Instant;

use analysis::confidence::{compute_confidence, GrooveConfidence};
use analysis::era::classify_era;
use analysis::humanization::classify_humanization;
use analysis::metadata::GrooveMetadata;
use analysis::pocket::pocket_score;
use analysis::reference::match_references;
use analysis::summary::summarize;
use features::groove::{analyze_swing, ghost_note_fraction, profile_microtiming, MicrotimingProfile};
use features::onset::{extract_onsets, OnsetEvent};
use features::period::{estimate_tempo, TempoEstimate, MIN_ONSETS_FOR_TEMPO};
use features::{grid, groove::swing::STRAIGHT_SWING};
use preprocessing::silence::SilenceDetector;

// Re-export main types
pub use analysis::batch::{analyze_batch, BatchOptions, BatchReport, FileOutcome, FileReport};
pub use analysis::compatibility::{compare, compatibility_score};
pub use analysis::result::{
    AnalysisFlag, CompatibilityResult, GhostNoteDensity, GrooveAnalysis, GrooveMetrics,
    HumanizationLevel, PairCompatibility, TimingFeel, TimingMetrics,
};
pub use config::{AnalysisConfig, AnalysisDepth, AnalysisOptions};
pub use error::{AnalysisError, ErrorKind};
pub use io::AudioBuffer;

/// Analyze mono samples
///
/// # Arguments
///
/// * `samples` - Mono audio samples, any gain (detection is amplitude-invariant)
/// * `sample_rate` - Sample rate in Hz
/// * `options` - Depth and optional genre hint
/// * `config` - Analysis configuration
///
/// # Returns
///
/// `GrooveAnalysis`. Silent or onset-free input yields a result flagged
/// [`AnalysisFlag::InsufficientSignal`] with neutral metrics, not an error.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate, non-finite
/// samples or an invalid configuration.
///
/// # Example
///
/// ```
/// use groove_dsp::{analyze_audio, AnalysisConfig, AnalysisFlag, AnalysisOptions};
///
/// let silence = vec![0.0f32; 44100];
/// let result = analyze_audio(&silence, 44100, &AnalysisOptions::default(), &AnalysisConfig::default())?;
/// assert!(result.has_flag(AnalysisFlag::InsufficientSignal));
/// assert_eq!(result.groove_metrics.swing_percentage, 50.0);
/// assert!((result.groove_metrics.pocket_score - 3.5).abs() < 1e-6);
/// # Ok::<(), groove_dsp::AnalysisError>(())
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    options: &AnalysisOptions,
    config: &AnalysisConfig,
) -> Result<GrooveAnalysis, AnalysisError> {
    let buffer = AudioBuffer::new(samples.to_vec(), sample_rate)?;
    analyze_buffer(&buffer, options, config)
}

/// Decode and analyze an audio file
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` for unsupported or corrupt files;
/// see [`analyze_audio`] for the remaining cases.
pub fn analyze_file(
    path: impl AsRef<Path>,
    options: &AnalysisOptions,
    config: &AnalysisConfig,
) -> Result<GrooveAnalysis, AnalysisError> {
    config.validate()?;
    let path = path.as_ref();
    log::debug!("Analyzing file {}", path.display());
    let buffer = io::decoder::decode_file(path, config)?;
    analyze_buffer(&buffer, options, config)
}

/// Analyze a decoded buffer
///
/// Runs onset detection, tempo estimation, grid alignment, swing and
/// microtiming, then the pocket, humanization, era and reference stages.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an invalid configuration.
/// Insufficient signal is reported through flags, not as an error.
pub fn analyze_buffer(
    buffer: &AudioBuffer,
    options: &AnalysisOptions,
    config: &AnalysisConfig,
) -> Result<GrooveAnalysis, AnalysisError> {
    config.validate()?;
    let start_time = Instant::now();

    let params = config.detector(options.depth);
    log::debug!(
        "Starting groove analysis: {} samples at {} Hz, depth={}",
        buffer.len(),
        buffer.sample_rate(),
        options.depth.name()
    );

    let mut metadata = GrooveMetadata::new(
        buffer.duration_seconds(),
        buffer.sample_rate(),
        options.depth,
        params.grid_subdivisions,
    );
    metadata.signal_activity = SilenceDetector {
        threshold_db: config.silence_floor_db,
        frame_size: params.frame_size,
    }
    .active_fraction(buffer.samples());

    // Stage 1: onsets
    let onsets = match extract_onsets(buffer, params, config) {
        Ok(onsets) => onsets,
        Err(AnalysisError::InsufficientSignal(msg)) => {
            log::warn!("Insufficient signal: {}", msg);
            return Ok(neutral_analysis(
                TempoEstimate::unknown(),
                &[],
                metadata,
                vec![AnalysisFlag::InsufficientSignal],
                config,
            ));
        }
        Err(e) => return Err(e),
    };
    metadata.onset_count = onsets.len();

    // Stage 2: tempo
    let tempo = estimate_tempo(&onsets, config);
    let Some(beat_period) = tempo.beat_period() else {
        let flag = if onsets.len() < MIN_ONSETS_FOR_TEMPO {
            AnalysisFlag::TooFewOnsets
        } else {
            AnalysisFlag::UnreliableGrid
        };
        log::warn!("Tempo unknown ({} onsets), grid metrics are neutral", onsets.len());
        return Ok(neutral_analysis(tempo, &onsets, metadata, vec![flag], config));
    };

    let mut flags = Vec::new();
    if tempo.is_ambiguous(config.tempo_usability_threshold) {
        log::warn!(
            "Ambiguous tempo: {:.2} BPM with confidence {:.3}",
            tempo.bpm,
            tempo.confidence
        );
        flags.push(AnalysisFlag::AmbiguousTempo);
        flags.push(AnalysisFlag::UnreliableGrid);
    }

    // Stage 3: grid anchor + swing on a straight eighth grid
    let tolerance = config.ioi_cluster_tolerance_ms / 1000.0;
    let anchor = grid::select_anchor(&onsets, beat_period, tolerance).ok_or_else(|| {
        AnalysisError::ProcessingError("Grid anchor selection failed".to_string())
    })?;
    let straight = grid::align_onsets(&onsets, beat_period, anchor, 2, None);
    let swing = analyze_swing(&straight);
    let swing_fraction = swing.map(|s| s.fraction());

    // Stage 4: microtiming against the swung grid, so swing is not read as drag
    let mut subdivisions = params.grid_subdivisions;
    if subdivisions < 4
        && grid::sixteenth_share(&onsets, beat_period, anchor, swing_fraction)
            >= config.sixteenth_grid_min_share
    {
        log::debug!("Refining grid to 16th notes");
        subdivisions = 4;
    }
    metadata.grid_subdivisions = subdivisions;

    let alignment = grid::align_onsets(&onsets, beat_period, anchor, subdivisions, swing_fraction);
    let mut profile = profile_microtiming(&alignment, config.consistency_beat_fraction);

    let swing_percentage = match swing {
        Some(s) => s.percentage,
        None => {
            log::warn!("No off-beat onsets; swing defaults to straight");
            flags.push(AnalysisFlag::NoOffbeats);
            profile.consistency = 0.0;
            STRAIGHT_SWING
        }
    };
    let swing_coverage = swing.map(|s| {
        let spanned = straight.beats_spanned().max(1);
        s.beats_measured as f32 / spanned as f32
    });

    // Stage 5: classifiers
    let confidence = compute_confidence(tempo.confidence, swing_coverage, profile.consistency);
    let groove_metrics = groove_metrics(swing_percentage, &profile, &onsets, config);

    let era = if swing.is_some() {
        classify_era(
            swing_percentage,
            groove_metrics.humanization_level,
            options.genre_hint.as_deref(),
            config.era_match_tolerance,
        )
    } else {
        analysis::result::UNKNOWN_ERA
    };
    let similar_to = match_references(
        swing_percentage,
        profile.push_pull_ms,
        groove_metrics.humanization_level,
        config.reference_min_similarity,
    );

    let mut result = GrooveAnalysis {
        bpm: tempo.bpm,
        bpm_confidence: tempo.confidence,
        timing_metrics: timing_metrics(swing_percentage, &profile),
        groove_metrics,
        era_classification: era.to_string(),
        similar_to,
        summary: String::new(),
        confidence,
        flags,
        metadata,
    };
    result.summary = summarize(&result);

    log::debug!(
        "Groove analysis complete: {:.2} BPM, swing {:.1}%, pocket {:.2}, {} in {:.2} ms",
        result.bpm,
        result.groove_metrics.swing_percentage,
        result.groove_metrics.pocket_score,
        result.groove_metrics.humanization_level.name(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    Ok(result)
}

fn groove_metrics(
    swing_percentage: f32,
    profile: &MicrotimingProfile,
    onsets: &[OnsetEvent],
    config: &AnalysisConfig,
) -> GrooveMetrics {
    let ghost_fraction = ghost_note_fraction(
        onsets,
        config.ghost_strength_ratio,
        config.ghost_reference_percentile,
    );

    GrooveMetrics {
        swing_percentage,
        timing_feel: TimingFeel::from_push_pull(profile.push_pull_ms, config.timing_feel_deadband_ms),
        pocket_score: pocket_score(profile.push_pull_ms, profile.consistency, config),
        humanization_level: classify_humanization(
            profile.consistency,
            profile.average_deviation_ms,
            &config.humanization,
        ),
        ghost_note_density: GhostNoteDensity::from_fraction(ghost_fraction, config.ghost_density_cut_points),
    }
}

fn timing_metrics(swing_percentage: f32, profile: &MicrotimingProfile) -> TimingMetrics {
    TimingMetrics {
        average_deviation_ms: profile.average_deviation_ms,
        swing_ratio: analysis::result::swing_ratio(swing_percentage),
        push_pull_ms: profile.push_pull_ms,
        consistency: profile.consistency,
    }
}

/// Result with neutral grid metrics (straight swing, zero push/pull and consistency)
fn neutral_analysis(
    tempo: TempoEstimate,
    onsets: &[OnsetEvent],
    mut metadata: GrooveMetadata,
    flags: Vec<AnalysisFlag>,
    config: &AnalysisConfig,
) -> GrooveAnalysis {
    let profile = MicrotimingProfile::neutral();
    metadata.onset_count = onsets.len();

    let mut result = GrooveAnalysis {
        bpm: tempo.bpm,
        bpm_confidence: tempo.confidence,
        groove_metrics: groove_metrics(STRAIGHT_SWING, &profile, onsets, config),
        timing_metrics: timing_metrics(STRAIGHT_SWING, &profile),
        era_classification: analysis::result::UNKNOWN_ERA.to_string(),
        similar_to: Vec::new(),
        summary: String::new(),
        confidence: GrooveConfidence::none(),
        flags,
        metadata,
    };
    result.summary = summarize(&result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_signals::{click_track, render_clicks, swung_times};

    const SR: u32 = 44100;

    fn analyze(samples: &[f32], depth: AnalysisDepth) -> GrooveAnalysis {
        analyze_audio(
            samples,
            SR,
            &AnalysisOptions::with_depth(depth),
            &AnalysisConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_silence_is_flagged_not_fatal() {
        for seconds in [0.0, 0.5, 3.0] {
            let samples = vec![0.0f32; (seconds * SR as f32) as usize];
            let result = analyze(&samples, AnalysisDepth::Detailed);
            assert!(result.has_flag(AnalysisFlag::InsufficientSignal));
            assert_eq!(result.groove_metrics.swing_percentage, 50.0);
            assert_eq!(result.timing_metrics.push_pull_ms, 0.0);
            assert_eq!(result.timing_metrics.consistency, 0.0);
            assert!((result.groove_metrics.pocket_score - 3.5).abs() < 1e-6);
            assert_eq!(result.era_classification, "unknown");
            assert!(result.similar_to.is_empty());
        }
    }

    #[test]
    fn test_on_grid_sixteenths() {
        let samples = click_track(120.0, 4, 8.0, SR);
        let result = analyze(&samples, AnalysisDepth::Detailed);

        assert!((result.bpm - 120.0).abs() < 0.5, "bpm {}", result.bpm);
        assert!((result.groove_metrics.swing_percentage - 50.0).abs() < 0.1);
        assert!(result.timing_metrics.push_pull_ms.abs() < 0.1);
        assert!(result.timing_metrics.consistency > 0.999);
        assert!((result.groove_metrics.pocket_score - 8.5).abs() < 0.02);
        assert_eq!(result.groove_metrics.humanization_level, HumanizationLevel::Mechanical);
        assert_eq!(result.groove_metrics.timing_feel, TimingFeel::On);
        assert_eq!(result.metadata.grid_subdivisions, 4);
    }

    #[test]
    fn test_swung_eighths() {
        let times = swung_times(90.0, 0.64, 16);
        let amps: Vec<f32> = (0..times.len()).map(|i| if i % 2 == 0 { 1.0 } else { 0.7 }).collect();
        let samples = render_clicks(&times, &amps, 11.5, SR);
        let result = analyze(&samples, AnalysisDepth::Detailed);

        assert!((result.bpm - 90.0).abs() < 1.0, "bpm {}", result.bpm);
        assert!((result.groove_metrics.swing_percentage - 64.0).abs() < 0.5);
        assert_eq!(result.timing_metrics.swing_ratio, "64:36");
        // Swing is measured against the swung grid, not counted as drag
        assert!(result.timing_metrics.push_pull_ms.abs() < 1.0);
        assert!(result.timing_metrics.consistency > 0.95);
        assert!(!result.has_flag(AnalysisFlag::NoOffbeats));
    }

    #[test]
    fn test_accented_early_sixteenths_read_straight() {
        // Straight 16ths at 120 BPM, loud "a" played 3 ms early
        let beat = 0.5f32;
        let amps_per_beat = [1.0f32, 0.5, 0.6, 0.9];
        let mut times = Vec::new();
        let mut amps = Vec::new();
        for k in 0..16 {
            for (j, &amp) in amps_per_beat.iter().enumerate() {
                let early = if j == 3 { 0.003 } else { 0.0 };
                times.push(0.1 + (k as f32 + j as f32 / 4.0) * beat - early);
                amps.push(amp);
            }
        }
        let samples = render_clicks(&times, &amps, 8.6, SR);
        let result = analyze(&samples, AnalysisDepth::Detailed);

        assert!((result.bpm - 120.0).abs() < 0.5, "bpm {}", result.bpm);
        assert!(result.groove_metrics.swing_percentage < 51.0, "swing {}", result.groove_metrics.swing_percentage);
        assert_eq!(result.timing_metrics.swing_ratio, "50:50");
        assert!(result.timing_metrics.consistency > 0.97);
        assert_eq!(result.metadata.grid_subdivisions, 4);
    }

    #[test]
    fn test_triplet_swing_tempo_is_not_ambiguous() {
        for bpm in [80.0f32, 90.0, 100.0] {
            let times = swung_times(bpm, 0.66, 16);
            let amps: Vec<f32> = (0..times.len()).map(|i| if i % 2 == 0 { 1.0 } else { 0.7 }).collect();
            let samples = render_clicks(&times, &amps, 0.6 + 16.0 * 60.0 / bpm, SR);
            let result = analyze(&samples, AnalysisDepth::Detailed);

            assert!((result.bpm - bpm).abs() < 1.0, "bpm {} for {}", result.bpm, bpm);
            assert!(!result.has_flag(AnalysisFlag::AmbiguousTempo), "confidence {}", result.bpm_confidence);
            assert!(!result.has_flag(AnalysisFlag::UnreliableGrid));
            assert!((result.groove_metrics.swing_percentage - 66.0).abs() < 0.5);
        }
    }

    #[test]
    fn test_quarter_notes_have_no_offbeats() {
        let samples = click_track(100.0, 1, 8.0, SR);
        let result = analyze(&samples, AnalysisDepth::Quick);

        assert!(result.has_flag(AnalysisFlag::NoOffbeats));
        assert_eq!(result.groove_metrics.swing_percentage, 50.0);
        assert_eq!(result.timing_metrics.consistency, 0.0);
        assert_eq!(result.era_classification, "unknown");
        assert_eq!(result.confidence.swing, 0.0);
    }

    #[test]
    fn test_too_few_onsets() {
        let samples = render_clicks(&[0.2, 0.7, 1.2], &[1.0; 3], 2.0, SR);
        let result = analyze(&samples, AnalysisDepth::Detailed);

        assert!(result.has_flag(AnalysisFlag::TooFewOnsets));
        assert_eq!(result.bpm, 0.0);
        assert_eq!(result.bpm_confidence, 0.0);
        assert_eq!(result.metadata.onset_count, 3);
        assert!((result.groove_metrics.pocket_score - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic_serialization() {
        let samples = click_track(97.0, 2, 6.0, SR);
        let a = serde_json::to_string(&analyze(&samples, AnalysisDepth::Deep)).unwrap();
        let b = serde_json::to_string(&analyze(&samples, AnalysisDepth::Deep)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_input() {
        let opts = AnalysisOptions::default();
        let config = AnalysisConfig::default();
        assert!(matches!(
            analyze_audio(&[0.0; 10], 0, &opts, &config),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            analyze_audio(&[f32::NAN; 10], SR, &opts, &config),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
