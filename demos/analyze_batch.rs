//! Example: Analyze multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] [--compare] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files (batch-level). Each file analysis is still single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.
//! - Ctrl-C is not wired up; the cancel flag is exposed through `BatchOptions::cancel`.

use groove_dsp::analysis::batch::default_jobs;
use groove_dsp::{analyze_batch, AnalysisConfig, AnalysisOptions, BatchOptions, FileOutcome, FileReport};
use std::env;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut compare = false;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--compare" => compare = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] [--compare] <file1> <file2> ...\n\
                     \n\
                     --jobs N    Parallel workers (default: CPU-1)\n\
                     --json      Emit one JSON object per line (JSONL)\n\
                     --compare   Score pairwise groove compatibility\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let total = paths.len();
    let batch = BatchOptions {
        max_jobs: jobs.unwrap_or_else(default_jobs),
        cancel: None,
        compare,
        on_progress: Some(Arc::new(move |file: &FileReport, done: usize| {
            eprintln!("[{}/{}] {}", done, total, file.path.display());
        })),
    };
    eprintln!("Batch: {} files, jobs={}", paths.len(), batch.max_jobs);

    let t0 = Instant::now();
    let report = analyze_batch(&paths, &AnalysisOptions::default(), &AnalysisConfig::default(), &batch);
    let wall_ms = t0.elapsed().as_secs_f64() * 1000.0;

    if json {
        for file in &report.files {
            println!("{}", serde_json::to_string(file)?);
        }
        if let Some(compatibility) = &report.compatibility {
            println!("{}", serde_json::to_string(compatibility)?);
        }
    } else {
        let total = report.files.len();
        for (idx, file) in report.files.iter().enumerate() {
            match &file.outcome {
                FileOutcome::Analyzed { analysis } => println!(
                    "[{}/{}] {}: BPM={:.2} (conf={:.3}) swing={} pocket={:.1} {} era={}",
                    idx + 1,
                    total,
                    file.path.display(),
                    analysis.bpm,
                    analysis.bpm_confidence,
                    analysis.timing_metrics.swing_ratio,
                    analysis.groove_metrics.pocket_score,
                    analysis.groove_metrics.humanization_level.name(),
                    analysis.era_classification
                ),
                FileOutcome::Failed { kind, message } => println!(
                    "[{}/{}] {}: ERROR ({}): {}",
                    idx + 1,
                    total,
                    file.path.display(),
                    kind,
                    message
                ),
                FileOutcome::Cancelled => {
                    println!("[{}/{}] {}: cancelled", idx + 1, total, file.path.display())
                }
            }
        }

        if let Some(compatibility) = &report.compatibility {
            println!();
            for pair in &compatibility.pairs {
                println!(
                    "  {} <-> {}: {:.2} ({})",
                    pair.first_id, pair.second_id, pair.compatibility_score, pair.rationale
                );
            }
            let best = &compatibility.best_pair;
            println!(
                "Best pair: {} + {} ({:.2})",
                best.first_id, best.second_id, best.compatibility_score
            );
        }
    }

    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        report.successes().len(),
        report.files.len(),
        wall_ms
    );

    Ok(())
}
