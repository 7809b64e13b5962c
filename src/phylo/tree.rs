// tree.rs - Arena-backed rooted phylogeny

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use crate::phylo::TreeError;

/// One node (branch) of the tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub label: Option<String>,
    /// Length of the branch leading to this node
    pub length: Option<f64>,
    /// Annotations such as `region` from `[&region="Kenya"]` comments
    pub traits: BTreeMap<String, String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Node {
    pub fn new(parent: Option<usize>) -> Self {
        Self {
            parent,
            ..Default::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted tree whose nodes are stored in pre-order; index 0 is the root
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Build a tree from pre-ordered nodes.
    ///
    /// Every non-root node must reference a parent with a smaller index.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, TreeError> {
        if nodes.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        for (idx, node) in nodes.iter().enumerate() {
            match (idx, node.parent) {
                (0, None) => {}
                (0, Some(_)) => return Err(TreeError::InvalidTopology("root node has a parent".to_string())),
                (_, Some(p)) if p < idx => {}
                (_, _) => {
                    return Err(TreeError::InvalidTopology(format!(
                        "node {} is not preceded by its parent",
                        idx
                    )))
                }
            }
        }
        Ok(Self { nodes })
    }

    pub fn root(&self) -> usize {
        0
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Replace labels found in a NEXUS translate table
    pub fn translate_labels(&mut self, table: &HashMap<String, String>) {
        for node in &mut self.nodes {
            if let Some(name) = node.label.as_ref().and_then(|l| table.get(l)) {
                node.label = Some(name.clone());
            }
        }
    }

    /// Distance from the root to every node (root height is its own branch length)
    pub fn heights(&self) -> Vec<f64> {
        let mut heights = vec![0.0; self.nodes.len()];
        for (idx, node) in self.nodes.iter().enumerate() {
            let base = node.parent.map(|p| heights[p]).unwrap_or(0.0);
            heights[idx] = base + node.length.unwrap_or(0.0);
        }
        heights
    }

    /// Calendar time of every node.
    ///
    /// With the date of the most recent tip, times are
    /// `last_tip - max_height + height`; otherwise they are plain heights.
    pub fn absolute_times(&self, last_tip: Option<f64>) -> Vec<f64> {
        let heights = self.heights();
        match last_tip {
            Some(date) => {
                let max_height = heights.iter().copied().fold(0.0, f64::max);
                heights.iter().map(|h| date - max_height + h).collect()
            }
            None => heights,
        }
    }

    pub fn stats(&self) -> TreeStats {
        let heights = self.heights();
        TreeStats {
            tips: self.leaves().count(),
            internal_nodes: self.nodes.iter().filter(|n| !n.is_leaf()).count(),
            height: heights.iter().copied().fold(0.0, f64::max),
            length: self.nodes.iter().filter_map(|n| n.length).sum(),
        }
    }
}

/// Basic shape summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeStats {
    pub tips: usize,
    pub internal_nodes: usize,
    /// Largest root-to-node distance
    pub height: f64,
    /// Sum of all branch lengths
    pub length: f64,
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tips, {} internal nodes, height {:.6}, length {:.6}",
            self.tips, self.internal_nodes, self.height, self.length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phylo::parse_newick;

    #[test]
    fn test_heights_and_stats() {
        let tree = parse_newick("((A:1,B:2)AB:0.5,C:3);").unwrap();
        let heights = tree.heights();
        // pre-order: root, AB, A, B, C
        assert_eq!(heights, vec![0.0, 0.5, 1.5, 2.5, 3.0]);

        let stats = tree.stats();
        assert_eq!(stats.tips, 3);
        assert_eq!(stats.internal_nodes, 2);
        assert_eq!(stats.height, 3.0);
        assert_eq!(stats.length, 6.5);
    }

    #[test]
    fn test_absolute_times() {
        let tree = parse_newick("((A:1,B:2):0.5,C:3);").unwrap();
        let times = tree.absolute_times(Some(2020.0));
        assert_eq!(times, vec![2017.0, 2017.5, 2018.5, 2019.5, 2020.0]);
        assert_eq!(tree.absolute_times(None), tree.heights());
    }

    #[test]
    fn test_from_nodes_validates_order() {
        assert!(matches!(Tree::from_nodes(Vec::new()), Err(TreeError::EmptyTree)));

        let bad = vec![Node::new(None), Node::new(Some(2)), Node::new(Some(0))];
        assert!(matches!(Tree::from_nodes(bad), Err(TreeError::InvalidTopology(_))));
    }

    #[test]
    fn test_translate_labels() {
        let mut tree = parse_newick("(1:1,2:1);").unwrap();
        let table: HashMap<String, String> =
            [("1".to_string(), "seqA".to_string()), ("2".to_string(), "seqB".to_string())].into();
        tree.translate_labels(&table);
        let labels: Vec<_> = tree.leaves().filter_map(|n| n.label.as_deref()).collect();
        assert_eq!(labels, vec!["seqA", "seqB"]);
    }
}
