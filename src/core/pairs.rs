// pairs.rs - Unordered pair enumeration

use std::iter::FusedIterator;

/// Number of unordered pairs among `n` items
pub fn pair_count(n: usize) -> usize {
    if n < 2 {
        0
    } else {
        n * (n - 1) / 2
    }
}

/// Lazy iterator over every `(i, j)` with `i < j < n`.
///
/// Pairs come out row by row: `(0,1), (0,2), ..., (0,n-1), (1,2), ...`.
/// The iterator is cheap to clone, so cloning before iteration gives a
/// restartable enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEnumerator {
    n: usize,
    i: usize,
    j: usize,
    remaining: usize,
}

impl PairEnumerator {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            i: 0,
            j: 1,
            remaining: pair_count(n),
        }
    }

    /// Rewind to the first pair
    pub fn restart(&mut self) {
        *self = Self::new(self.n);
    }

    /// Total number of pairs for this enumerator, consumed or not
    pub fn total(&self) -> usize {
        pair_count(self.n)
    }
}

impl Iterator for PairEnumerator {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let pair = (self.i, self.j);
        self.remaining -= 1;

        self.j += 1;
        if self.j == self.n {
            self.i += 1;
            self.j = self.i + 1;
        }

        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PairEnumerator {}

impl FusedIterator for PairEnumerator {}
