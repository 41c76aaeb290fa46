//! Numeric helpers shared by cleaning, aggregation and profiling

use serde::{Deserialize, Serialize};

/// Quantile of already-sorted values using linear interpolation between
/// order statistics: `h = (n - 1) * p`, `q = x[floor(h)] + frac(h) * (x[floor(h) + 1] - x[floor(h)])`.
///
/// Returns None for an empty slice. `p` is clamped to `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Quantile of unsorted values (see [`quantile_sorted`])
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    let sorted = sorted_copy(values);
    quantile_sorted(&sorted, p)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Round to 2 decimal places (half away from zero)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, or 0 when the whole is not positive
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Percentage share of each part, in hundredths, summing to exactly 100
///
/// Largest-remainder apportionment: every share is floored to 0.01, then the
/// leftover hundredths go to the parts with the largest remainders. Equal
/// remainders favor the earlier part. All zeros when the total is not positive.
pub fn apportion_percentages(parts: &[f64]) -> Vec<f64> {
    const UNITS: u64 = 10_000;

    let whole: f64 = parts.iter().sum();
    if whole <= 0.0 {
        return vec![0.0; parts.len()];
    }

    let exact: Vec<f64> = parts.iter().map(|p| p / whole * UNITS as f64).collect();
    let mut units: Vec<u64> = exact.iter().map(|e| e.floor() as u64).collect();
    let leftover = UNITS.saturating_sub(units.iter().sum()) as usize;

    let mut by_remainder: Vec<usize> = (0..parts.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra)
    });
    for &i in by_remainder.iter().take(leftover) {
        units[i] += 1;
    }

    units.into_iter().map(|u| u as f64 / 100.0).collect()
}

/// Descriptive statistics of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for a single value
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Describe a numeric column. None when empty.
pub fn describe(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted_copy(values);
    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let variance = sorted
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    Some(Summary {
        count,
        mean,
        std,
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25)?,
        median: quantile_sorted(&sorted, 0.5)?,
        q3: quantile_sorted(&sorted, 0.75)?,
        max: sorted[count - 1],
    })
}
