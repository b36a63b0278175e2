//! Integration tests for the groove analysis engine
//!
//! Fixtures are rendered on the fly and written as WAV files with `hound`, then
//! decoded through the symphonia decoder.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use groove_dsp::{
    analyze_audio, analyze_batch, analyze_file, compare, compatibility_score, AnalysisConfig,
    AnalysisDepth, AnalysisError, AnalysisFlag, AnalysisOptions, BatchOptions, ErrorKind,
    FileOutcome, FileReport, GrooveAnalysis, HumanizationLevel, TimingFeel,
};
use tempfile::TempDir;

const SR: u32 = 44100;

/// Decaying 1 kHz clicks at the given times
fn render_clicks(times: &[f32], amplitudes: &[f32], duration_seconds: f32) -> Vec<f32> {
    let sr = SR as f32;
    let mut samples = vec![0.0f32; (duration_seconds * sr) as usize];
    let click_len = (0.03 * sr) as usize;

    for (&t, &amp) in times.iter().zip(amplitudes.iter()) {
        let start = (t * sr).round() as usize;
        for i in 0..click_len {
            if let Some(slot) = samples.get_mut(start + i) {
                let time = i as f32 / sr;
                *slot += amp * (2.0 * std::f32::consts::PI * 1000.0 * time).cos() * (-time / 0.005).exp();
            }
        }
    }

    samples
}

/// Isochronous pattern, `per_beat` clicks per beat, accented downbeats
fn click_track(bpm: f32, per_beat: usize, beats: usize) -> Vec<f32> {
    let step = 60.0 / bpm / per_beat as f32;
    let times: Vec<f32> = (0..beats * per_beat).map(|i| 0.1 + i as f32 * step).collect();
    let amps: Vec<f32> = (0..times.len())
        .map(|i| if i % per_beat == 0 { 0.9 } else { 0.7 })
        .collect();
    let duration = times.last().copied().unwrap_or(0.0) + 0.5;
    render_clicks(&times, &amps, duration)
}

/// Swung eighths: downbeats at `k * beat`, off-beats at `(k + swing) * beat`
fn swung_track(bpm: f32, swing: f32, beats: usize) -> Vec<f32> {
    let beat = 60.0 / bpm;
    let mut times = Vec::new();
    let mut amps = Vec::new();
    for k in 0..beats {
        times.push(0.1 + k as f32 * beat);
        amps.push(0.9);
        times.push(0.1 + (k as f32 + swing) * beat);
        amps.push(0.6);
    }
    render_clicks(&times, &amps, 0.1 + beats as f32 * beat + 0.5)
}

/// Kick on beats 1 and 3, snare on 2 and 4 shifted by `snare_shift` seconds,
/// swung hi-hat off-beats
fn backbeat_track(bpm: f32, swing: f32, snare_shift: f32, beats: usize) -> Vec<f32> {
    let beat = 60.0 / bpm;
    let mut times = Vec::new();
    let mut amps = Vec::new();
    for k in 0..beats {
        if k % 2 == 0 {
            times.push(0.1 + k as f32 * beat);
            amps.push(1.0);
        } else {
            times.push(0.1 + k as f32 * beat + snare_shift);
            amps.push(0.9);
        }
        times.push(0.1 + (k as f32 + swing) * beat);
        amps.push(0.4);
    }
    render_clicks(&times, &amps, 0.1 + beats as f32 * beat + 0.5)
}

/// Deterministic pseudo-random jitter in [-1, 1]
fn jitter(seed: &mut u64) -> f32 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    ((*seed >> 33) as f32 / (1u64 << 31) as f32) * 2.0 - 1.0
}

fn write_wav_i16(path: &Path, samples: &[f32], channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: SR,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(v).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn write_wav_f32(path: &Path, samples: &[f32]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SR,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

fn fixture(dir: &TempDir, name: &str, samples: &[f32]) -> PathBuf {
    let path = dir.path().join(name);
    write_wav_f32(&path, samples);
    path
}

fn analyze(samples: &[f32]) -> GrooveAnalysis {
    analyze_audio(samples, SR, &AnalysisOptions::default(), &AnalysisConfig::default()).unwrap()
}

#[test]
fn test_on_grid_scenario_from_file() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sixteenths.wav");
    write_wav_i16(&path, &click_track(120.0, 4, 16), 2);

    let result = analyze_file(&path, &AnalysisOptions::default(), &AnalysisConfig::default()).unwrap();

    assert!((result.bpm - 120.0).abs() < 0.5, "bpm {}", result.bpm);
    assert!((result.groove_metrics.swing_percentage - 50.0).abs() < 0.1);
    assert!(result.timing_metrics.push_pull_ms.abs() < 0.1);
    assert!(result.timing_metrics.consistency > 0.999);
    assert!((result.groove_metrics.pocket_score - 8.5).abs() < 0.02);
    assert_eq!(result.groove_metrics.humanization_level, HumanizationLevel::Mechanical);
    assert_eq!(result.timing_metrics.swing_ratio, "50:50");
    assert_eq!(result.metadata.sample_rate, SR);
    assert!(result.metadata.duration_seconds > 8.0);
    assert!(!result.summary.is_empty());
}

#[test]
fn test_silence_file_yields_flagged_neutral_result() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "silence.wav", &vec![0.0; SR as usize * 2]);

    let result = analyze_file(&path, &AnalysisOptions::default(), &AnalysisConfig::default()).unwrap();

    assert!(result.has_flag(AnalysisFlag::InsufficientSignal));
    assert_eq!(result.groove_metrics.swing_percentage, 50.0);
    assert_eq!(result.timing_metrics.push_pull_ms, 0.0);
    assert_eq!(result.timing_metrics.consistency, 0.0);
    assert!((result.groove_metrics.pocket_score - 3.5).abs() < 1e-6);
    assert_eq!(result.bpm, 0.0);
}

#[test]
fn test_half_double_time_resolves_into_range() {
    let config = AnalysisConfig::default();

    let fast = analyze(&click_track(180.0, 1, 24));
    assert!(fast.bpm >= config.min_bpm && fast.bpm <= config.max_bpm);
    assert!((fast.bpm - 180.0).abs() < 1.0, "bpm {}", fast.bpm);

    let doubled = analyze(&click_track(90.0, 2, 12));
    assert!(doubled.bpm >= config.min_bpm && doubled.bpm <= config.max_bpm);
}

#[test]
fn test_swing_and_pocket_bounds() {
    let mut seed = 7u64;
    for depth in [AnalysisDepth::Quick, AnalysisDepth::Detailed, AnalysisDepth::Deep] {
        for &(bpm, swing, spread_ms) in &[(84.0, 0.5, 0.0), (92.0, 0.66, 8.0), (110.0, 0.58, 25.0), (70.0, 0.8, 40.0)] {
            let beat = 60.0 / bpm;
            let mut times = Vec::new();
            for k in 0..16 {
                for pos in [0.0, swing] {
                    let t = 0.2 + (k as f32 + pos) * beat + jitter(&mut seed) * spread_ms / 1000.0;
                    times.push(t);
                }
            }
            let amps: Vec<f32> = (0..times.len()).map(|_| 0.5 + 0.4 * jitter(&mut seed).abs()).collect();
            let samples = render_clicks(&times, &amps, 0.2 + 17.0 * beat);

            let result = analyze_audio(&samples, SR, &AnalysisOptions::with_depth(depth), &AnalysisConfig::default()).unwrap();
            let g = &result.groove_metrics;
            assert!((50.0..=75.0).contains(&g.swing_percentage), "swing {}", g.swing_percentage);
            assert!((0.0..=10.0).contains(&g.pocket_score), "pocket {}", g.pocket_score);
            assert!((0.0..=1.0).contains(&result.timing_metrics.consistency));
            assert!(result.timing_metrics.average_deviation_ms >= 0.0);
        }
    }
}

#[test]
fn test_laid_back_backbeat_reads_behind() {
    let result = analyze(&backbeat_track(100.0, 0.6, 0.030, 16));
    let g = &result.groove_metrics;

    assert!((result.bpm - 100.0).abs() < 0.5, "bpm {}", result.bpm);
    assert!((g.swing_percentage - 60.0).abs() < 0.5, "swing {}", g.swing_percentage);
    assert!((result.timing_metrics.push_pull_ms - 7.5).abs() < 0.5);
    assert_eq!(g.timing_feel, TimingFeel::Behind);
    assert_eq!(g.humanization_level, HumanizationLevel::Loose);
    assert!(result.similar_to.iter().any(|r| r == "Dilla"), "{:?}", result.similar_to);
    assert!(result.flags.is_empty(), "{:?}", result.flags);
}

#[test]
fn test_pushed_backbeat_reads_ahead() {
    let result = analyze(&backbeat_track(100.0, 0.6, -0.030, 16));
    let g = &result.groove_metrics;

    assert!((result.timing_metrics.push_pull_ms + 7.5).abs() < 0.5);
    assert_eq!(g.timing_feel, TimingFeel::Ahead);
    assert_eq!(g.humanization_level, HumanizationLevel::Loose);
    assert!(result.similar_to.iter().any(|r| r == "Benny Benjamin"), "{:?}", result.similar_to);
    assert!(!result.similar_to.iter().any(|r| r == "Dilla"));
}

#[test]
fn test_heavy_snare_drag_reads_human() {
    let result = analyze(&backbeat_track(100.0, 0.6, 0.040, 16));

    assert!((result.bpm - 100.0).abs() < 0.5, "bpm {}", result.bpm);
    assert!((result.timing_metrics.push_pull_ms - 10.0).abs() < 0.5);
    let consistency = result.timing_metrics.consistency;
    assert!(consistency > 0.86 && consistency < 0.90, "consistency {}", consistency);
    assert_eq!(result.groove_metrics.timing_feel, TimingFeel::Behind);
    assert_eq!(result.groove_metrics.humanization_level, HumanizationLevel::Human);
}

#[test]
fn test_jittered_performance_reads_loose() {
    let mut seed = 7u64;
    let beat = 0.6f32;
    let mut times = Vec::new();
    let mut amps = Vec::new();
    for k in 0..16 {
        for (pos, amp) in [(0.0f32, 1.0f32), (0.6, 0.6)] {
            times.push(0.2 + (k as f32 + pos) * beat + jitter(&mut seed) * 0.015);
            amps.push(amp);
        }
    }
    let result = analyze(&render_clicks(&times, &amps, 0.2 + 17.0 * beat));
    let g = &result.groove_metrics;

    assert!((result.bpm - 100.0).abs() < 1.0, "bpm {}", result.bpm);
    assert_eq!(g.timing_feel, TimingFeel::On);
    assert_eq!(g.humanization_level, HumanizationLevel::Loose);
    assert!(result.timing_metrics.average_deviation_ms > 5.0);
    assert!(result.similar_to.iter().any(|r| r == "Pete Rock"), "{:?}", result.similar_to);
}

#[test]
fn test_determinism_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "swing.wav", &swung_track(95.0, 0.6, 16));
    let options = AnalysisOptions::with_depth(AnalysisDepth::Deep).genre_hint("boom bap");
    let config = AnalysisConfig::default();

    let a = serde_json::to_string(&analyze_file(&path, &options, &config).unwrap()).unwrap();
    let b = serde_json::to_string(&analyze_file(&path, &options, &config).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_amplitude_invariance() {
    let loud = swung_track(88.0, 0.62, 12);
    let quiet: Vec<f32> = loud.iter().map(|x| x * 0.1).collect();

    let a = analyze(&loud);
    let b = analyze(&quiet);
    assert_eq!(a.bpm, b.bpm);
    assert_eq!(a.groove_metrics, b.groove_metrics);
    assert_eq!(a.timing_metrics, b.timing_metrics);
}

#[test]
fn test_swing_detected_from_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "swing64.wav", &swung_track(90.0, 0.64, 16));
    let result = analyze_file(&path, &AnalysisOptions::default(), &AnalysisConfig::default()).unwrap();

    assert!((result.bpm - 90.0).abs() < 1.0, "bpm {}", result.bpm);
    assert!((result.groove_metrics.swing_percentage - 64.0).abs() < 0.5);
    assert_eq!(result.timing_metrics.swing_ratio, "64:36");
}

#[test]
fn test_batch_picks_closest_swing_pair() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        fixture(&dir, "a62.wav", &swung_track(90.0, 0.62, 16)),
        fixture(&dir, "b64.wav", &swung_track(90.0, 0.64, 16)),
        fixture(&dir, "c40.wav", &swung_track(90.0, 0.40, 16)),
    ];

    let batch = BatchOptions {
        max_jobs: 2,
        cancel: None,
        compare: true,
        on_progress: None,
    };
    let report = analyze_batch(&paths, &AnalysisOptions::default(), &AnalysisConfig::default(), &batch);

    assert_eq!(report.successes().len(), 3);
    let compatibility = report.compatibility.expect("compatibility requested");
    assert_eq!(compatibility.pairs.len(), 3);
    let best = &compatibility.best_pair;
    assert_eq!((best.first_index, best.second_index), (0, 1));
    assert!(best.first_id.ends_with("a62.wav"));
    assert!(best.second_id.ends_with("b64.wav"));
}

#[test]
fn test_compare_symmetry_on_real_analyses() {
    let a = analyze(&swung_track(90.0, 0.58, 12));
    let b = analyze(&click_track(104.0, 2, 12));
    let weights = AnalysisConfig::default().compatibility;

    let (ab, _) = compatibility_score(&a, &b, &weights);
    let (ba, _) = compatibility_score(&b, &a, &weights);
    assert_eq!(ab, ba);
    assert!((0.0..=10.0).contains(&ab));

    let err = compare(&[("a".to_string(), a)], &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput(_)));
}

#[test]
fn test_unsupported_format_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loop.xyz");
    std::fs::write(&path, b"not audio").unwrap();

    let err = analyze_file(&path, &AnalysisOptions::default(), &AnalysisConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeError);
}

#[test]
fn test_batch_continues_after_failures() {
    let dir = TempDir::new().unwrap();
    let corrupt = dir.path().join("corrupt.wav");
    std::fs::write(&corrupt, b"RIFF garbage that is not a wave file").unwrap();
    let unsupported = dir.path().join("loop.xyz");
    std::fs::write(&unsupported, b"not audio").unwrap();

    let paths = vec![
        fixture(&dir, "one.wav", &swung_track(100.0, 0.6, 12)),
        unsupported,
        corrupt,
        fixture(&dir, "two.wav", &swung_track(100.0, 0.62, 12)),
    ];

    let batch = BatchOptions {
        max_jobs: 3,
        cancel: None,
        compare: true,
        on_progress: None,
    };
    let report = analyze_batch(&paths, &AnalysisOptions::default(), &AnalysisConfig::default(), &batch);

    assert_eq!(report.files.len(), 4);
    assert!(matches!(report.files[0].outcome, FileOutcome::Analyzed { .. }));
    assert!(matches!(
        report.files[1].outcome,
        FileOutcome::Failed { kind: ErrorKind::DecodeError, .. }
    ));
    assert!(matches!(
        report.files[2].outcome,
        FileOutcome::Failed { kind: ErrorKind::DecodeError, .. }
    ));
    assert!(matches!(report.files[3].outcome, FileOutcome::Analyzed { .. }));
    assert_eq!(report.failed_count(), 2);
    assert_eq!(report.compatibility.map(|c| c.pairs.len()), Some(1));
}

#[test]
fn test_cancelled_batch_reports_every_file() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        fixture(&dir, "one.wav", &click_track(100.0, 2, 8)),
        fixture(&dir, "two.wav", &click_track(100.0, 2, 8)),
    ];

    let batch = BatchOptions {
        max_jobs: 1,
        cancel: Some(Arc::new(AtomicBool::new(true))),
        compare: true,
        on_progress: None,
    };
    let report = analyze_batch(&paths, &AnalysisOptions::default(), &AnalysisConfig::default(), &batch);

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.cancelled_count(), 2);
    assert!(report.compatibility.is_none());
}

#[test]
fn test_cancel_mid_batch_keeps_finished_results() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..4)
        .map(|i| fixture(&dir, &format!("take{}.wav", i), &swung_track(100.0, 0.6, 8)))
        .collect();

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let batch = BatchOptions {
        max_jobs: 1,
        cancel: Some(cancel),
        compare: true,
        on_progress: Some(Arc::new(move |_: &FileReport, done: usize| {
            if done == 1 {
                flag.store(true, Ordering::SeqCst);
            }
        })),
    };
    let report = analyze_batch(&paths, &AnalysisOptions::default(), &AnalysisConfig::default(), &batch);

    assert_eq!(report.files.len(), 4);
    assert!(matches!(report.files[0].outcome, FileOutcome::Analyzed { .. }));
    assert!(report.files[1..]
        .iter()
        .all(|f| matches!(f.outcome, FileOutcome::Cancelled)));
    assert_eq!(report.successes().len(), 1);
    assert_eq!(report.cancelled_count(), 3);
    assert!(report.compatibility.is_none());
}

#[test]
fn test_report_serializes() {
    let dir = TempDir::new().unwrap();
    let paths = vec![fixture(&dir, "one.wav", &click_track(100.0, 2, 8))];
    let report = analyze_batch(&paths, &AnalysisOptions::default(), &AnalysisConfig::default(), &BatchOptions::default());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["files"][0]["outcome"]["status"], "analyzed");
    assert!(json["files"][0]["outcome"]["analysis"]["groove_metrics"]["swing_percentage"].is_number());
}
