//! Example: Analyze a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--depth quick|detailed|deep] [--genre HINT] [--json] <file>

use groove_dsp::{analyze_file, AnalysisConfig, AnalysisDepth, AnalysisOptions};
use std::env;

fn parse_depth(s: &str) -> Result<AnalysisDepth, String> {
    match s {
        "quick" => Ok(AnalysisDepth::Quick),
        "detailed" => Ok(AnalysisDepth::Detailed),
        "deep" => Ok(AnalysisDepth::Deep),
        other => Err(format!("unknown depth '{}'", other)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut options = AnalysisOptions::default();
    let mut json = false;
    let mut path: Option<String> = None;

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--depth" => {
                let v = args.first().ok_or("--depth requires a value")?;
                options.depth = parse_depth(v)?;
                args.remove(0);
            }
            "--genre" => {
                let v = args.first().ok_or("--genre requires a value")?.clone();
                options = options.genre_hint(v);
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_file [--depth quick|detailed|deep] [--genre HINT] [--json] <file>"
                );
                return Ok(());
            }
            _ => path = Some(a),
        }
    }

    let Some(path) = path else {
        eprintln!("ERROR: Provide an audio file path. Use --help for usage.");
        std::process::exit(2);
    };

    let config = AnalysisConfig::default();
    let result = analyze_file(&path, &options, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let g = &result.groove_metrics;
    let t = &result.timing_metrics;
    println!("Groove Analysis: {}", path);
    println!("  BPM: {:.2} (confidence: {:.2})", result.bpm, result.bpm_confidence);
    println!("  Swing: {:.1}% ({})", g.swing_percentage, t.swing_ratio);
    println!("  Push/pull: {:+.1} ms ({})", t.push_pull_ms, g.timing_feel.name());
    println!("  Avg deviation: {:.1} ms, consistency: {:.3}", t.average_deviation_ms, t.consistency);
    println!("  Pocket: {:.1}/10", g.pocket_score);
    println!("  Humanization: {}", g.humanization_level.name());
    println!("  Ghost notes: {}", g.ghost_note_density.name());
    println!("  Era: {}", result.era_classification);
    if !result.similar_to.is_empty() {
        println!("  Similar to: {}", result.similar_to.join(", "));
    }
    if !result.flags.is_empty() {
        println!("  Flags: {:?}", result.flags);
    }
    println!("  Overall confidence: {:.2}", result.confidence.overall);
    println!();
    println!("{}", result.summary);

    Ok(())
}
