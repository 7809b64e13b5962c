// traits.rs - Discrete trait lookup on tree nodes

use std::fmt;
use crate::phylo::tree::Node;

/// Label used when a node carries no value for the requested trait
pub const UNKNOWN_STATE: &str = "UNKNOWN";

/// Value of a discrete trait on one node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trait {
    Known(String),
    Unknown,
}

impl Trait {
    /// Look up `key` on a node
    pub fn of(node: &Node, key: &str) -> Self {
        match node.traits.get(key) {
            Some(value) => Trait::Known(value.clone()),
            None => Trait::Unknown,
        }
    }

    /// State label, substituting `default` for an unknown value
    pub fn resolve<'a>(&'a self, default: &'a str) -> &'a str {
        match self {
            Trait::Known(value) => value.as_str(),
            Trait::Unknown => default,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Trait::Known(_))
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resolve(UNKNOWN_STATE))
    }
}
