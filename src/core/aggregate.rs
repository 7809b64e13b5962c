// aggregate.rs - All-pairs difference engine and aggregation

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use rayon::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use crate::core::compare::{compare, SiteComparison};
use crate::core::pairs::{pair_count, PairEnumerator};
use crate::core::stats::{AggregateStats, NoDataReason, PairwiseStatistics};
use crate::data::SequenceStore;
use crate::error::DistanceError;

/// Default number of pairs compared per batch
pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Result of comparing one pair of sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairResult<'a> {
    pub id1: &'a str,
    pub id2: &'a str,
    pub mismatches: usize,
    pub valid_sites: usize,
}

impl PairResult<'_> {
    pub fn divergence(&self) -> Option<f64> {
        SiteComparison { mismatches: self.mismatches, valid_sites: self.valid_sites }.divergence()
    }
}

/// Audit line used in the summary and raw-differences reports
impl fmt::Display for PairResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: Differences={}, Valid Sites={}",
            self.id1, self.id2, self.mismatches, self.valid_sites
        )
    }
}

/// Shared flag checked between comparison batches
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Token cancelled when the process receives Ctrl-C.
    ///
    /// The handler is process-wide and can be installed only once.
    pub fn on_interrupt() -> Result<Self, String> {
        let token = Self::new();
        let handler_token = token.clone();
        ctrlc::set_handler(move || handler_token.cancel())
            .map_err(|e| format!("Failed to install Ctrl-C handler: {}", e))?;
        Ok(token)
    }
}

/// Append-only accumulation of pair results.
///
/// `merge` is associative, so partial accumulators built over consecutive
/// ranges of the enumeration can be combined in order.
#[derive(Debug, Clone, Default)]
pub struct PairAccumulator<'a> {
    pub pairs: Vec<PairResult<'a>>,
    pub excluded_pairs: usize,
    pub total_valid_sites: usize,
}

impl<'a> PairAccumulator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pair; pairs without valid sites only bump the excluded count
    pub fn push(&mut self, pair: PairResult<'a>) {
        if pair.valid_sites == 0 {
            self.excluded_pairs += 1;
        } else {
            self.total_valid_sites += pair.valid_sites;
            self.pairs.push(pair);
        }
    }

    pub fn merge(mut self, other: PairAccumulator<'a>) -> Self {
        self.pairs.extend(other.pairs);
        self.excluded_pairs += other.excluded_pairs;
        self.total_valid_sites += other.total_valid_sites;
        self
    }

    pub fn compared(&self) -> usize {
        self.pairs.len() + self.excluded_pairs
    }
}

/// Everything a run produces: included pairs in enumeration order plus
/// their statistics
#[derive(Debug, Clone, Serialize)]
pub struct DistanceSummary<'a> {
    pub sequence_count: usize,
    pub alignment_width: usize,
    pub comparisons: usize,
    pub excluded_pairs: usize,
    pub total_valid_sites: usize,
    pub statistics: PairwiseStatistics,
    pub pairs: Vec<PairResult<'a>>,
}

impl<'a> DistanceSummary<'a> {
    fn from_accumulator(store: &SequenceStore, acc: PairAccumulator<'a>) -> Self {
        let statistics = if store.len() < 2 {
            PairwiseStatistics::NoData(NoDataReason::TooFewSequences { sequences: store.len() })
        } else {
            let mismatches: Vec<usize> = acc.pairs.iter().map(|p| p.mismatches).collect();
            let valid_sites: Vec<usize> = acc.pairs.iter().map(|p| p.valid_sites).collect();
            match AggregateStats::compute(&mismatches, &valid_sites) {
                Some(stats) => PairwiseStatistics::Available(stats),
                None => PairwiseStatistics::NoData(NoDataReason::NoComparableSites {
                    excluded_pairs: acc.excluded_pairs,
                }),
            }
        };

        Self {
            sequence_count: store.len(),
            alignment_width: store.width(),
            comparisons: acc.compared(),
            excluded_pairs: acc.excluded_pairs,
            total_valid_sites: acc.total_valid_sites,
            statistics,
            pairs: acc.pairs,
        }
    }

    /// Mismatch counts of the included pairs, in enumeration order
    pub fn raw_distances(&self) -> Vec<usize> {
        self.pairs.iter().map(|p| p.mismatches).collect()
    }

    pub fn report_lines(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.to_string()).collect()
    }

    pub fn stats(&self) -> Option<&AggregateStats> {
        self.statistics.stats()
    }
}

/// Drives pair enumeration and comparison over a sequence store
pub struct DistanceAggregator<'a> {
    store: &'a SequenceStore,
    batch_size: usize,
    cancel: Option<CancelToken>,
    show_progress: bool,
}

impl<'a> DistanceAggregator<'a> {
    pub fn new(store: &'a SequenceStore) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
            cancel: None,
            show_progress: false,
        }
    }

    /// Pairs compared per parallel batch (minimum 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Number of pairs the run will enumerate
    pub fn total_pairs(&self) -> usize {
        pair_count(self.store.len())
    }

    /// Compare every unordered pair and summarize the results.
    ///
    /// Each batch is compared in parallel but collected in enumeration order,
    /// so the output does not depend on the batch size or thread count.
    pub fn aggregate(&self) -> Result<DistanceSummary<'a>, DistanceError> {
        let total = self.total_pairs();
        let store = self.store;

        let pb = if self.show_progress && total > 0 {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut pairs = PairEnumerator::new(store.len());
        let mut acc = PairAccumulator::new();
        let mut batch = Vec::with_capacity(self.batch_size.min(total));

        loop {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    pb.abandon_with_message("Cancelled");
                    return Err(DistanceError::Cancelled { completed: acc.compared(), total });
                }
            }

            batch.clear();
            batch.extend(pairs.by_ref().take(self.batch_size));
            if batch.is_empty() {
                break;
            }

            let results = batch
                .par_iter()
                .map(|&(i, j)| compare_indices(store, i, j))
                .collect::<Result<Vec<_>, DistanceError>>()?;

            let mut partial = PairAccumulator::new();
            for pair in results {
                partial.push(pair);
            }
            acc = acc.merge(partial);
            pb.inc(batch.len() as u64);
        }

        pb.finish_and_clear();
        Ok(DistanceSummary::from_accumulator(store, acc))
    }

    /// `aggregate` with timing and progress messages on stdout
    pub fn aggregate_with_report(&self) -> Result<DistanceSummary<'a>, DistanceError> {
        let start = Instant::now();
        println!(
            "🔄 Comparing {} sequences ({} pairwise comparisons, width {})...",
            self.store.len(),
            self.total_pairs(),
            self.store.width()
        );

        let summary = self.aggregate()?;

        println!(
            "✅ Pairwise comparisons completed in {:.2}s ({} included, {} without valid sites)",
            start.elapsed().as_secs_f64(),
            summary.pairs.len(),
            summary.excluded_pairs
        );
        Ok(summary)
    }
}

fn compare_indices(store: &SequenceStore, i: usize, j: usize) -> Result<PairResult<'_>, DistanceError> {
    let sequences = store.as_slice();
    let (a, b) = (&sequences[i], &sequences[j]);
    let SiteComparison { mismatches, valid_sites } = compare(a, b)?;
    Ok(PairResult {
        id1: &a.id,
        id2: &b.id,
        mismatches,
        valid_sites,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_store() -> SequenceStore {
        SequenceStore::from_pairs([("S1", "ACGT"), ("S2", "ACGA"), ("S3", "ACNT")]).unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let store = reference_store();
        let summary = DistanceAggregator::new(&store).aggregate().unwrap();

        assert_eq!(summary.comparisons, 3);
        assert_eq!(summary.raw_distances(), vec![1, 0, 1]);
        assert_eq!(
            summary.report_lines(),
            vec![
                "S1 - S2: Differences=1, Valid Sites=4",
                "S1 - S3: Differences=0, Valid Sites=3",
                "S2 - S3: Differences=1, Valid Sites=3",
            ]
        );

        let stats = summary.stats().unwrap();
        assert_eq!(stats.median_mismatch, 1.0);
        assert!((stats.lower_quartile - 0.5).abs() < 1e-12);
        assert!((stats.upper_quartile - 1.0).abs() < 1e-12);
        assert!((stats.median_divergence - 0.25).abs() < 1e-12);
        assert_eq!(stats.total_valid_sites, 10);
        assert_eq!(summary.total_valid_sites, 10);
    }

    #[test]
    fn test_single_sequence_reports_no_data() {
        let store = SequenceStore::from_pairs([("only", "ACGT")]).unwrap();
        let summary = DistanceAggregator::new(&store).aggregate().unwrap();

        assert_eq!(summary.comparisons, 0);
        assert!(summary.pairs.is_empty());
        assert_eq!(
            summary.statistics,
            PairwiseStatistics::NoData(NoDataReason::TooFewSequences { sequences: 1 })
        );
        assert!(summary.stats().is_none());
    }

    #[test]
    fn test_empty_store_reports_no_data() {
        let store = SequenceStore::new(Vec::new()).unwrap();
        let summary = DistanceAggregator::new(&store).aggregate().unwrap();
        assert_eq!(
            summary.statistics,
            PairwiseStatistics::NoData(NoDataReason::TooFewSequences { sequences: 0 })
        );
    }

    #[test]
    fn test_pairs_without_valid_sites_are_excluded() {
        let store = SequenceStore::from_pairs([
            ("a", "AC--"),
            ("b", "--GT"),
            ("c", "ACGA"),
        ])
        .unwrap();
        let summary = DistanceAggregator::new(&store).aggregate().unwrap();

        assert_eq!(summary.comparisons, 3);
        assert_eq!(summary.excluded_pairs, 1);
        assert_eq!(
            summary.report_lines(),
            vec![
                "a - c: Differences=0, Valid Sites=2",
                "b - c: Differences=1, Valid Sites=2",
            ]
        );
        assert_eq!(summary.total_valid_sites, 4);
    }

    #[test]
    fn test_all_pairs_excluded_reports_no_data() {
        let store = SequenceStore::from_pairs([("a", "A-N"), ("b", "-C-")]).unwrap();
        let summary = DistanceAggregator::new(&store).aggregate().unwrap();

        assert!(summary.pairs.is_empty());
        assert_eq!(summary.excluded_pairs, 1);
        assert_eq!(
            summary.statistics,
            PairwiseStatistics::NoData(NoDataReason::NoComparableSites { excluded_pairs: 1 })
        );
    }

    #[test]
    fn test_idempotent_and_batch_independent() {
        let seqs: Vec<(String, String)> = (0..23)
            .map(|i| {
                let residues: String = (0..40)
                    .map(|k| match (i * 7 + k * 3 + i * k) % 6 {
                        0 => 'A',
                        1 => 'C',
                        2 => 'G',
                        3 => 'T',
                        4 => '-',
                        _ => 'N',
                    })
                    .collect();
                (format!("seq{}", i), residues)
            })
            .collect();
        let store = SequenceStore::from_pairs(seqs).unwrap();

        let reference = DistanceAggregator::new(&store).with_batch_size(1).aggregate().unwrap();
        for batch_size in [2, 7, 64, 10_000] {
            let summary = DistanceAggregator::new(&store)
                .with_batch_size(batch_size)
                .aggregate()
                .unwrap();
            assert_eq!(summary.report_lines(), reference.report_lines());
            assert_eq!(summary.statistics, reference.statistics);
        }

        let again = DistanceAggregator::new(&store).with_batch_size(1).aggregate().unwrap();
        assert_eq!(again.report_lines(), reference.report_lines());
        assert_eq!(again.statistics, reference.statistics);
        assert_eq!(reference.comparisons, 23 * 22 / 2);
    }

    #[test]
    fn test_cancelled_before_start() {
        let store = reference_store();
        let token = CancelToken::new();
        token.cancel();

        let err = DistanceAggregator::new(&store)
            .with_cancel_token(token)
            .aggregate()
            .unwrap_err();
        assert_eq!(err, DistanceError::Cancelled { completed: 0, total: 3 });
    }

    #[test]
    fn test_cancelled_from_another_thread() {
        let store = reference_store();
        let token = CancelToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();

        let err = DistanceAggregator::new(&store)
            .with_cancel_token(token)
            .aggregate()
            .unwrap_err();
        assert!(matches!(err, DistanceError::Cancelled { total: 3, .. }));
    }

    #[test]
    fn test_interrupt_token_starts_clear() {
        let store = reference_store();
        let token = CancelToken::on_interrupt().unwrap();
        assert!(!token.is_cancelled());

        let summary = DistanceAggregator::new(&store)
            .with_cancel_token(token.clone())
            .aggregate()
            .unwrap();
        assert_eq!(summary.comparisons, 3);

        token.cancel();
        let err = DistanceAggregator::new(&store)
            .with_cancel_token(token)
            .aggregate()
            .unwrap_err();
        assert_eq!(err, DistanceError::Cancelled { completed: 0, total: 3 });
    }

    #[test]
    fn test_accumulator_merge_is_associative() {
        let p = |m, v| PairResult { id1: "x", id2: "y", mismatches: m, valid_sites: v };

        let mut a = PairAccumulator::new();
        a.push(p(1, 4));
        let mut b = PairAccumulator::new();
        b.push(p(0, 0));
        let mut c = PairAccumulator::new();
        c.push(p(2, 5));

        let left = a.clone().merge(b.clone()).merge(c.clone());
        let right = a.merge(b.merge(c));
        assert_eq!(left.pairs, right.pairs);
        assert_eq!(left.excluded_pairs, 1);
        assert_eq!(left.total_valid_sites, 9);
        assert_eq!(left.compared(), 3);
    }

    #[test]
    fn test_pair_result_display_and_divergence() {
        let pair = PairResult { id1: "A", id2: "B", mismatches: 3, valid_sites: 12 };
        assert_eq!(pair.to_string(), "A - B: Differences=3, Valid Sites=12");
        assert_eq!(pair.divergence(), Some(0.25));
    }
}
