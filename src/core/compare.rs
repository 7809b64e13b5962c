// compare.rs - Per-pair nucleotide comparison

use serde::{Deserialize, Serialize};
use crate::data::Sequence;
use crate::error::DistanceError;

/// Unambiguous nucleotide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalBase {
    A,
    C,
    G,
    T,
}

impl CanonicalBase {
    /// Classify an (already upper-cased) residue
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'A' => Some(CanonicalBase::A),
            b'C' => Some(CanonicalBase::C),
            b'G' => Some(CanonicalBase::G),
            b'T' => Some(CanonicalBase::T),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            CanonicalBase::A => b'A',
            CanonicalBase::C => b'C',
            CanonicalBase::G => b'G',
            CanonicalBase::T => b'T',
        }
    }
}

const CANONICAL: [bool; 256] = {
    let mut table = [false; 256];
    table[b'A' as usize] = true;
    table[b'C' as usize] = true;
    table[b'G' as usize] = true;
    table[b'T' as usize] = true;
    table
};

/// True for A, C, G and T
#[inline]
pub fn is_canonical(b: u8) -> bool {
    CANONICAL[b as usize]
}

/// Outcome of comparing two aligned sequences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteComparison {
    pub mismatches: usize,
    pub valid_sites: usize,
}

impl SiteComparison {
    /// Fraction of valid sites that differ, `None` without valid sites
    pub fn divergence(&self) -> Option<f64> {
        if self.valid_sites == 0 {
            None
        } else {
            Some(self.mismatches as f64 / self.valid_sites as f64)
        }
    }
}

/// Count mismatches over columns where both residues are canonical bases.
///
/// Gaps and ambiguity codes shrink the number of valid sites instead of
/// counting as either match or mismatch.
pub fn compare_residues(a: &[u8], b: &[u8]) -> Result<SiteComparison, DistanceError> {
    if a.len() != b.len() {
        return Err(DistanceError::LengthMismatch { left: a.len(), right: b.len() });
    }

    let mut mismatches = 0;
    let mut valid_sites = 0;

    for (&x, &y) in a.iter().zip(b.iter()) {
        if is_canonical(x) && is_canonical(y) {
            valid_sites += 1;
            if x != y {
                mismatches += 1;
            }
        }
    }

    Ok(SiteComparison { mismatches, valid_sites })
}

/// Compare two sequences from the same alignment
pub fn compare(a: &Sequence, b: &Sequence) -> Result<SiteComparison, DistanceError> {
    compare_residues(&a.residues, &b.residues).map_err(|_| DistanceError::AlignmentShape {
        reference_id: a.id.clone(),
        expected: a.len(),
        id: b.id.clone(),
        length: b.len(),
    })
}
