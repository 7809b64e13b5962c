// mod.rs - Core logic module

pub mod aggregate;
pub mod compare;
pub mod pairs;
pub mod stats;

// Re-export main types for convenience
pub use aggregate::{
    CancelToken, DistanceAggregator, DistanceSummary, PairAccumulator, PairResult, DEFAULT_BATCH_SIZE,
};
pub use compare::{compare, compare_residues, is_canonical, CanonicalBase, SiteComparison};
pub use pairs::{pair_count, PairEnumerator};
pub use stats::{AggregateStats, Histogram, NoDataReason, PairwiseStatistics};
