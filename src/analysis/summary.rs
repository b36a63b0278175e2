//! Natural-language summary of a groove analysis

use super::result::{AnalysisFlag, GhostNoteDensity, GrooveAnalysis, TimingFeel, UNKNOWN_ERA};

fn swing_phrase(swing: f32) -> &'static str {
    if swing < 52.0 {
        "straight"
    } else if swing < 58.0 {
        "lightly swung"
    } else if swing < 66.0 {
        "swung"
    } else {
        "heavily swung"
    }
}

fn feel_phrase(feel: TimingFeel) -> &'static str {
    match feel {
        TimingFeel::Ahead => "pushing ahead of the beat",
        TimingFeel::On => "sitting on the beat",
        TimingFeel::Behind => "laid back behind the beat",
    }
}

/// Build the summary sentence(s) for an analysis
///
/// The text depends only on the metrics, so it is deterministic.
pub fn summarize(analysis: &GrooveAnalysis) -> String {
    if analysis.has_flag(AnalysisFlag::InsufficientSignal) {
        return "No rhythmic content detected; the groove could not be analyzed.".to_string();
    }
    if analysis.bpm <= 0.0 {
        return format!(
            "Too few rhythmic events ({}) to establish a tempo; groove metrics are neutral.",
            analysis.metadata.onset_count
        );
    }

    let g = &analysis.groove_metrics;
    let t = &analysis.timing_metrics;

    let mut text = format!(
        "{:.1} BPM groove, {} ({}), {} ({:+.1} ms). Pocket {:.1}/10 with {} timing",
        analysis.bpm,
        swing_phrase(g.swing_percentage),
        t.swing_ratio,
        feel_phrase(g.timing_feel),
        t.push_pull_ms,
        g.pocket_score,
        g.humanization_level.name()
    );

    if g.ghost_note_density != GhostNoteDensity::None {
        text.push_str(&format!(" and {} ghost-note density", g.ghost_note_density.name()));
    }
    text.push('.');

    if analysis.era_classification != UNKNOWN_ERA {
        text.push_str(&format!(" Feels like the {}.", analysis.era_classification));
    }
    if !analysis.similar_to.is_empty() {
        text.push_str(&format!(" Similar to {}.", analysis.similar_to.join(", ")));
    }
    if analysis.has_flag(AnalysisFlag::AmbiguousTempo) || analysis.has_flag(AnalysisFlag::UnreliableGrid) {
        text.push_str(" Tempo is ambiguous; swing and pocket are low-confidence.");
    }

    text
}
