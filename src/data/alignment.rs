// alignment.rs - Sequence store for multiple sequence alignments

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use bio::io::fasta;
use crate::core::compare::is_canonical;
use crate::error::DistanceError;

/// A single aligned sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub residues: Vec<u8>,
}

impl Sequence {
    /// Create a sequence, normalizing residues to uppercase
    pub fn new(id: impl Into<String>, residues: &[u8]) -> Self {
        Self {
            id: id.into(),
            residues: residues.to_ascii_uppercase(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Number of positions holding A, C, G or T
    pub fn canonical_count(&self) -> usize {
        self.residues.iter().filter(|&&b| is_canonical(b)).count()
    }
}

/// Immutable, insertion-ordered collection of equal-length aligned sequences
#[derive(Debug, Clone, Default)]
pub struct SequenceStore {
    sequences: Vec<Sequence>,
    index: HashMap<String, usize>,
    width: usize,
}

impl SequenceStore {
    /// Build a store, rejecting ragged alignments and duplicate identifiers
    pub fn new(sequences: Vec<Sequence>) -> Result<Self, DistanceError> {
        let width = sequences.first().map(|s| s.len()).unwrap_or(0);
        let mut index = HashMap::with_capacity(sequences.len());

        for (i, seq) in sequences.iter().enumerate() {
            if seq.len() != width {
                return Err(DistanceError::AlignmentShape {
                    reference_id: sequences[0].id.clone(),
                    expected: width,
                    id: seq.id.clone(),
                    length: seq.len(),
                });
            }
            if index.insert(seq.id.clone(), i).is_some() {
                return Err(DistanceError::DuplicateIdentifier(seq.id.clone()));
            }
        }

        Ok(Self { sequences, index, width })
    }

    /// Convenience constructor from (id, residues) pairs
    pub fn from_pairs<I, S, R>(pairs: I) -> Result<Self, DistanceError>
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<String>,
        R: AsRef<[u8]>,
    {
        let sequences = pairs
            .into_iter()
            .map(|(id, residues)| Sequence::new(id, residues.as_ref()))
            .collect();
        Self::new(sequences)
    }

    /// Load an aligned FASTA file
    pub fn from_fasta(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open alignment file {}: {}", path.display(), e))?;

        let reader = fasta::Reader::new(BufReader::new(file));
        let mut sequences = Vec::new();

        for record_result in reader.records() {
            let record = record_result
                .map_err(|e| format!("Invalid FASTA record in {}: {}", path.display(), e))?;
            sequences.push(Sequence::new(record.id(), record.seq()));
        }

        Self::new(sequences).map_err(|e| format!("{} ({})", e, path.display()))
    }

    /// Number of sequences
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Alignment width shared by every sequence
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sequence at a position in insertion order
    pub fn sequence(&self, idx: usize) -> Option<&Sequence> {
        self.sequences.get(idx)
    }

    /// Look up a sequence by identifier
    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.index.get(id).map(|&i| &self.sequences[i])
    }

    /// All sequences in insertion order
    pub fn as_slice(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.sequences.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(|s| s.id.as_str())
    }
}

impl<'a> IntoIterator for &'a SequenceStore {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}
