// mod.rs - Phylogeny reading and ancestral state changes

pub mod changes;
pub mod dates;
pub mod newick;
pub mod nexus;
pub mod traits;
pub mod tree;

use std::path::Path;
use thiserror::Error;

// Re-export main types for convenience
pub use changes::{ChangeCounter, ChangeLog, StateChange};
pub use dates::{decimal_year, parse_tip_date};
pub use newick::parse_newick;
pub use nexus::{is_nexus, parse_nexus};
pub use traits::{Trait, UNKNOWN_STATE};
pub use tree::{Node, Tree, TreeStats};

/// Errors raised while reading trees and tip dates
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("Newick syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("unexpected end of tree text")]
    UnexpectedEnd,

    #[error("tree text contains no nodes")]
    EmptyTree,

    #[error("invalid branch length '{value}' at byte {position}")]
    InvalidBranchLength { position: usize, value: String },

    #[error("invalid tree topology: {0}")]
    InvalidTopology(String),

    #[error("NEXUS file contains no tree statement")]
    MissingTreeBlock,

    #[error("invalid tip date '{0}': expected a decimal year or YYYY-MM-DD")]
    InvalidDate(String),
}

/// Parse Newick or NEXUS text
pub fn parse_tree(text: &str) -> Result<Tree, TreeError> {
    if is_nexus(text) {
        parse_nexus(text)
    } else {
        parse_newick(text)
    }
}

/// Read the first tree from a Newick or NEXUS file
pub fn read_tree_file(path: &Path) -> Result<Tree, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read tree file {}: {}", path.display(), e))?;
    parse_tree(&text).map_err(|e| format!("Invalid tree in {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_dispatch() {
        let newick = parse_tree("(A:1,B:1);").unwrap();
        let nexus = parse_tree("#NEXUS\nbegin trees;\ntree t = (A:1,B:1);\nend;").unwrap();
        assert_eq!(newick, nexus);
    }

    #[test]
    fn test_read_tree_file_errors_name_path() {
        let err = read_tree_file(Path::new("/nonexistent/tree.nexus")).unwrap_err();
        assert!(err.contains("/nonexistent/tree.nexus"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.tree");
        std::fs::write(&path, "(A,B").unwrap();
        let err = read_tree_file(&path).unwrap_err();
        assert!(err.contains("broken.tree"));
        assert!(err.contains("unexpected end"));
    }
}
