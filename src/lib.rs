// lib.rs - ntdiff library root

//! # ntdiff - Pairwise nucleotide differences across a multiple sequence alignment
//!
//! Every unordered pair of aligned sequences is compared column by column.
//! Only columns where both sequences carry a canonical base (`A`, `C`, `G`,
//! `T`) count as valid sites; gaps, `N` and IUPAC ambiguity codes are skipped.
//! The per-pair mismatch counts are summarized as median, interquartile range
//! and median divergence (mismatches per valid site).
//!
//! A companion module reads BEAST-annotated phylogenies and lists the
//! branches on which a discrete trait changes state.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use ntdiff::prelude::*;
//!
//! let store = SequenceStore::from_fasta(std::path::Path::new("alignment.fasta"))?;
//! let summary = DistanceAggregator::new(&store).aggregate()?;
//!
//! match &summary.statistics {
//!     PairwiseStatistics::Available(stats) => println!("median {:.4}", stats.median_mismatch),
//!     PairwiseStatistics::NoData(reason) => println!("{}", reason),
//! }
//! for line in summary.report_lines() {
//!     println!("{}", line);
//! }
//! # Ok::<(), String>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;
pub mod phylo;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{compare, pair_count, DistanceAggregator, DistanceSummary, PairEnumerator};
    pub use crate::core::{AggregateStats, CancelToken, PairResult, PairwiseStatistics, SiteComparison};
    pub use crate::data::{Sequence, SequenceStore};
    pub use crate::error::DistanceError;
    pub use crate::output::{write_raw_differences, write_summary};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{DistanceAggregator, DistanceSummary, PairResult, PairwiseStatistics};
pub use data::{Sequence, SequenceStore};
pub use error::DistanceError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "ntdiff v{} - Pairwise nucleotide differences for sequence alignments",
        VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_names_version() {
        let info = get_info();
        assert!(info.starts_with("ntdiff v"));
        assert!(info.contains(VERSION));
    }
}
