//! Inter-onset-interval clustering
//!
//! Builds clusters of inter-onset intervals (IOIs) over all onset pairs and
//! scores each cluster by how well the other clusters line up with its integer
//! multiples.
//!
//! # Algorithm
//!
//! 1. Collect the IOI of every onset pair within `[min_ioi, max_ioi]`
//! 2. Sort and greedily cluster: an IOI joins the last cluster when it is within
//!    `tolerance` of that cluster's running mean
//! 3. Score cluster `C`: `sum_n f(n) * count(D)` over clusters `D` with
//!    `|D - n * C| < tolerance`, `n = 1..=8`, `f(n) = 6 - n` for `n <= 4`, else 1
//!
//! # Reference
//!
//! Dixon, S. (2001). Automatic Extraction of Tempo and Beat from Expressive
//! Performances. *Journal of New Music Research*, 30(1), 39-58.

/// Highest multiple considered when relating clusters
pub const MAX_MULTIPLE: u32 = 8;

/// A cluster of similar inter-onset intervals
#[derive(Debug, Clone, PartialEq)]
pub struct IoiCluster {
    /// Mean interval in seconds
    pub interval: f32,

    /// Number of intervals in the cluster
    pub count: usize,

    /// Harmonic support score (filled by [`score_clusters`])
    pub score: f32,
}

/// Collect the inter-onset intervals of all onset pairs within bounds
///
/// `times` must be sorted ascending.
pub fn collect_intervals(times: &[f32], min_ioi: f32, max_ioi: f32) -> Vec<f32> {
    let mut intervals = Vec::new();

    for (i, &t0) in times.iter().enumerate() {
        for &t1 in &times[i + 1..] {
            let d = t1 - t0;
            if d > max_ioi {
                break;
            }
            if d >= min_ioi {
                intervals.push(d);
            }
        }
    }

    intervals
}

/// Greedy clustering of intervals
pub fn cluster_intervals(intervals: &[f32], tolerance: f32) -> Vec<IoiCluster> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut clusters: Vec<IoiCluster> = Vec::new();
    let mut sum = 0.0f32;

    for d in sorted {
        match clusters.last_mut() {
            Some(last) if (d - last.interval).abs() < tolerance => {
                sum += d;
                last.count += 1;
                last.interval = sum / last.count as f32;
            }
            _ => {
                sum = d;
                clusters.push(IoiCluster {
                    interval: d,
                    count: 1,
                    score: 0.0,
                });
            }
        }
    }

    clusters
}

fn multiple_weight(n: u32) -> f32 {
    if n <= 4 {
        (6 - n) as f32
    } else {
        1.0
    }
}

/// Integer `n` in `1..=MAX_MULTIPLE` with `|longer - n * shorter| < tolerance`
pub fn harmonic_multiple(shorter: f32, longer: f32, tolerance: f32) -> Option<u32> {
    if shorter <= 0.0 {
        return None;
    }
    let n = (longer / shorter).round();
    if n < 1.0 || n > MAX_MULTIPLE as f32 {
        return None;
    }
    if (longer - n * shorter).abs() < tolerance {
        Some(n as u32)
    } else {
        None
    }
}

/// Whether two intervals are integer multiples of one another
pub fn harmonically_related(a: f32, b: f32, tolerance: f32) -> bool {
    let (shorter, longer) = if a <= b { (a, b) } else { (b, a) };
    harmonic_multiple(shorter, longer, tolerance).is_some()
}

/// Number of onsets that start a back-to-back run `t, t + interval, t + 2 * interval`
///
/// A competing period repeats at least once. The within-beat intervals of a
/// swung pattern (`d` and `beat - d`) alternate and never chain.
///
/// `times` must be sorted ascending.
pub fn chain_count(times: &[f32], interval: f32, tolerance: f32) -> usize {
    if interval <= 0.0 {
        return 0;
    }
    times
        .iter()
        .filter(|&&t| {
            has_onset_near(times, t + interval, tolerance)
                && has_onset_near(times, t + 2.0 * interval, tolerance)
        })
        .count()
}

fn has_onset_near(times: &[f32], target: f32, tolerance: f32) -> bool {
    let idx = times.partition_point(|&t| t <= target - tolerance);
    times.get(idx).is_some_and(|&t| t < target + tolerance)
}

/// Score every cluster by the support of its integer multiples
pub fn score_clusters(clusters: &mut [IoiCluster], tolerance: f32) {
    let snapshot: Vec<(f32, usize)> = clusters.iter().map(|c| (c.interval, c.count)).collect();

    for cluster in clusters.iter_mut() {
        cluster.score = snapshot
            .iter()
            .filter_map(|&(interval, count)| {
                harmonic_multiple(cluster.interval, interval, tolerance)
                    .map(|n| multiple_weight(n) * count as f32)
            })
            .sum();
    }
}
