// changes.rs - Ancestral state change counting

use serde::Serialize;
use crate::phylo::traits::Trait;
use crate::phylo::tree::Tree;

/// A branch whose trait state differs from its parent's
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateChange {
    /// Node index the change leads into
    #[serde(skip)]
    pub node: usize,
    pub time: f64,
    pub origin: String,
    pub destination: String,
}

/// Accumulated state changes from one tree walk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLog {
    pub events: Vec<StateChange>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, change: StateChange) {
        self.events.push(change);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Settings for a state-change walk
#[derive(Debug, Clone)]
pub struct ChangeCounter<'a> {
    pub trait_key: &'a str,
    pub unknown_label: &'a str,
}

impl<'a> ChangeCounter<'a> {
    pub fn new(trait_key: &'a str, unknown_label: &'a str) -> Self {
        Self { trait_key, unknown_label }
    }

    /// Walk the tree top-down once, appending a change for every node whose
    /// resolved state differs from its parent's.
    ///
    /// `times` holds one time per node (see [`Tree::absolute_times`]). The
    /// root is compared against a trait-less parent, so an annotated root
    /// counts as a change out of the unknown state.
    pub fn count(&self, tree: &Tree, times: &[f64], mut log: ChangeLog) -> ChangeLog {
        let mut stack = vec![tree.root()];

        while let Some(idx) = stack.pop() {
            let node = tree.node(idx);
            let state = Trait::of(node, self.trait_key);
            let parent_state = match node.parent {
                Some(p) => Trait::of(tree.node(p), self.trait_key),
                None => Trait::Unknown,
            };

            let destination = state.resolve(self.unknown_label);
            let origin = parent_state.resolve(self.unknown_label);
            if destination != origin {
                log.record(StateChange {
                    node: idx,
                    time: times.get(idx).copied().unwrap_or(f64::NAN),
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                });
            }

            stack.extend(node.children.iter().rev());
        }

        log
    }
}
