use std::collections::BTreeMap;

use crate::models::LabeledTurn;

use super::types::{HistogramBin, SenderCount, SessionLengthStats};

/// Turns per sender, sorted by `sender_id`.
pub fn session_lengths(turns: &[LabeledTurn]) -> Vec<SenderCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for turn in turns {
        *counts.entry(turn.sender_id()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(sender_id, count)| SenderCount {
            sender_id: sender_id.to_string(),
            count,
        })
        .collect()
}

/// Linear interpolation between closest ranks. `sorted` must be ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Equal-width bins over `[min, max]`, last bin closed on the right.
/// A zero-width range is widened by 0.5 on each side.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }

    let width = (high - low) / bins as f64;
    let mut counts = vec![0u64; bins];
    for value in values {
        let idx = (((value - low) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: low + width * i as f64,
            upper: if i + 1 == bins {
                high
            } else {
                low + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

pub fn session_length_stats(turns: &[LabeledTurn], bins: usize) -> SessionLengthStats {
    let per_user = session_lengths(turns);

    let mut values: Vec<f64> = per_user.iter().map(|s| s.count as f64).collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let mean = if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };

    SessionLengthStats {
        count: values.len() as u64,
        mean,
        std: sample_std(&values, mean),
        min: values.first().copied().unwrap_or(f64::NAN),
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.5),
        p75: quantile(&values, 0.75),
        max: values.last().copied().unwrap_or(f64::NAN),
        histogram: histogram(&values, bins),
        per_user,
    }
}
