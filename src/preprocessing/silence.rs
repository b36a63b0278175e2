//! Silence floor detection
//!
//! A buffer whose peak never rises above the configured floor carries no
//! rhythmic information and is reported as insufficient signal.

use super::normalization::amplitude_to_db;

/// Silence detection configuration
#[derive(Debug, Clone)]
pub struct SilenceDetector {
    /// Threshold in dBFS (default: -60.0)
    pub threshold_db: f32,

    /// Frame size for the RMS activity scan (default: 1024)
    pub frame_size: usize,
}

impl Default for SilenceDetector {
    fn default() -> Self {
        Self {
            threshold_db: -60.0,
            frame_size: 1024,
        }
    }
}

impl SilenceDetector {
    /// True when the peak level of the whole buffer is below the threshold
    pub fn is_silent(&self, samples: &[f32]) -> bool {
        let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);
        amplitude_to_db(peak) < self.threshold_db
    }

    /// Fraction of frames whose RMS level is above the threshold (0.0-1.0)
    pub fn active_fraction(&self, samples: &[f32]) -> f32 {
        if samples.is_empty() || self.frame_size == 0 {
            return 0.0;
        }

        let mut total = 0usize;
        let mut active = 0usize;
        for frame in samples.chunks(self.frame_size) {
            let rms = (frame.iter().map(|&x| x * x).sum::<f32>() / frame.len() as f32).sqrt();
            total += 1;
            if amplitude_to_db(rms) >= self.threshold_db {
                active += 1;
            }
        }

        log::debug!("Silence scan: {}/{} frames active", active, total);

        active as f32 / total as f32
    }
}
