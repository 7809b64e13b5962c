// stats.rs - Distribution statistics over pairwise results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Median of a set of values, `None` when empty
pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted_copy(values);
    percentile_sorted(&sorted, 50.0)
}

/// Percentile with linear interpolation between closest ranks.
///
/// `values` must be sorted ascending. Rank is `p / 100 * (n - 1)`, so the
/// 50th percentile of an even-length list is the mean of the two middle
/// values.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Summary statistics over the included pairs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub median_mismatch: f64,
    pub lower_quartile: f64,
    pub upper_quartile: f64,
    /// Median of per-pair `mismatches / valid_sites`, not a ratio of medians
    pub median_divergence: f64,
    pub total_valid_sites: usize,
}

impl AggregateStats {
    /// Compute statistics from parallel lists of mismatches and valid sites.
    ///
    /// Returns `None` when there are no included pairs. Every valid-site
    /// count must be non-zero.
    pub fn compute(mismatches: &[usize], valid_sites: &[usize]) -> Option<Self> {
        debug_assert_eq!(mismatches.len(), valid_sites.len());

        let distances: Vec<f64> = mismatches.iter().map(|&m| m as f64).collect();
        let sorted = sorted_copy(&distances);
        let median_mismatch = percentile_sorted(&sorted, 50.0)?;

        let (lower_quartile, upper_quartile) = if sorted.len() > 1 {
            (percentile_sorted(&sorted, 25.0)?, percentile_sorted(&sorted, 75.0)?)
        } else {
            (median_mismatch, median_mismatch)
        };

        let ratios: Vec<f64> = mismatches
            .iter()
            .zip(valid_sites)
            .map(|(&m, &v)| m as f64 / v as f64)
            .collect();
        let median_divergence = median(&ratios)?;

        Some(Self {
            median_mismatch,
            lower_quartile,
            upper_quartile,
            median_divergence,
            total_valid_sites: valid_sites.iter().sum(),
        })
    }

    pub fn interquartile_range(&self) -> (f64, f64) {
        (self.lower_quartile, self.upper_quartile)
    }
}

/// Why no statistics could be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoDataReason {
    /// Fewer than two sequences, so no pairs exist
    TooFewSequences { sequences: usize },
    /// Every pair lacked overlapping canonical sites
    NoComparableSites { excluded_pairs: usize },
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::TooFewSequences { sequences } => write!(
                f,
                "no comparable data: alignment has {} sequence(s), at least 2 are required",
                sequences
            ),
            NoDataReason::NoComparableSites { excluded_pairs } => write!(
                f,
                "no comparable data: none of the {} pair(s) share a valid site",
                excluded_pairs
            ),
        }
    }
}

/// Statistics, or an explicit marker that none are defined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairwiseStatistics {
    Available(AggregateStats),
    NoData(NoDataReason),
}

impl PairwiseStatistics {
    pub fn stats(&self) -> Option<&AggregateStats> {
        match self {
            PairwiseStatistics::Available(stats) => Some(stats),
            PairwiseStatistics::NoData(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, PairwiseStatistics::Available(_))
    }
}

/// Fixed-width frequency histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin values into `bins` equal-width bins spanning their range.
    ///
    /// All bins are half-open except the last, which includes its right edge.
    /// A zero-width range is widened to `[v - 0.5, v + 0.5]`. Returns `None`
    /// for an empty input or zero bins.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
