//! Synthetic signals for unit tests

/// Render decaying 1 kHz cosine clicks at the given times
///
/// Each click peaks at its first sample, so its exact onset is `round(t * sr)`.
pub fn render_clicks(times: &[f32], amplitudes: &[f32], duration_seconds: f32, sample_rate: u32) -> Vec<f32> {
    let sr = sample_rate as f32;
    let num_samples = (duration_seconds * sr) as usize;
    let mut samples = vec![0.0f32; num_samples];
    let click_len = (0.03 * sr) as usize;

    for (&t, &amp) in times.iter().zip(amplitudes.iter()) {
        let start = (t * sr).round() as usize;
        for i in 0..click_len {
            let Some(slot) = samples.get_mut(start + i) else {
                break;
            };
            let time = i as f32 / sr;
            *slot += amp
                * (2.0 * std::f32::consts::PI * 1000.0 * time).cos()
                * (-time / 0.005).exp();
        }
    }

    samples
}

/// Isochronous click track with `per_beat` clicks per beat, starting at 0.1 s
pub fn click_track(bpm: f32, per_beat: u32, duration_seconds: f32, sample_rate: u32) -> Vec<f32> {
    let step = 60.0 / bpm / per_beat as f32;
    let count = ((duration_seconds - 0.2) / step) as usize;
    let times: Vec<f32> = (0..count).map(|i| 0.1 + i as f32 * step).collect();
    let amps: Vec<f32> = (0..count)
        .map(|i| if i as u32 % per_beat == 0 { 1.0 } else { 0.8 })
        .collect();
    render_clicks(&times, &amps, duration_seconds, sample_rate)
}

/// Onset times of a swung eighth-note pattern: beats at `k * beat`, off-beats at
/// `(k + swing) * beat`, starting at 0.1 s
pub fn swung_times(bpm: f32, swing: f32, beats: usize) -> Vec<f32> {
    let beat = 60.0 / bpm;
    let mut times = Vec::with_capacity(beats * 2);
    for k in 0..beats {
        times.push(0.1 + k as f32 * beat);
        times.push(0.1 + (k as f32 + swing) * beat);
    }
    times
}
