//! Fixed-size k-mer frequency tables.

use serde::Serialize;

use crate::{
    error::KmerCompareError,
    histogram::{compute_histogram, histogram_stats},
    kmer::{encode, KmerLength},
};

/// Occurrence counts for every k-mer of one length.
///
/// The table always holds exactly `4^k` counters, indexed directly by the
/// encoded key, so every key in `[0, 4^k)` is valid.
///
/// # Example
///
/// ```rust
/// use kmercompare::{counter::count, kmer::KmerLength};
///
/// let k = KmerLength::new(3)?;
/// let table = count(b"ACGTACG", k);
///
/// assert_eq!(table.size(), 64);
/// assert_eq!(table.total(), 5);
/// assert_eq!(table.count_of(b"ACG"), Some(2));
/// # Ok::<(), kmercompare::error::KmerLengthError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerTable {
    k: KmerLength,
    counts: Vec<u64>,
}

impl KmerTable {
    /// Creates an all-zero table for k-mers of length `k`.
    #[must_use]
    pub fn new(k: KmerLength) -> Self {
        Self {
            k,
            counts: vec![0; k.table_size()],
        }
    }

    /// Returns the k-mer length.
    #[must_use]
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Number of counters, always `4^k`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.counts.len()
    }

    /// All counters, indexed by key.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Count for a key, or `None` if the key is not below `4^k`.
    #[must_use]
    pub fn get(&self, key: usize) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Count for a k-mer given as bases.
    ///
    /// Returns `None` if the k-mer has the wrong length or is not encodable.
    #[must_use]
    pub fn count_of(&self, kmer: &[u8]) -> Option<u64> {
        if kmer.len() != self.k.get() {
            return None;
        }
        encode(kmer).ok().and_then(|key| self.get(key))
    }

    pub(crate) fn increment(&mut self, key: usize) {
        self.counts[key] += 1;
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of k-mers seen at least once.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Number of k-mers never seen.
    #[must_use]
    pub fn zero_bins(&self) -> usize {
        self.size() - self.distinct()
    }

    /// Iterates over `(key, count)` for every non-zero counter, in key order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(key, &count)| (key, count))
    }

    /// Relative frequencies, `count / total`.
    ///
    /// An empty table yields the all-zero vector.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frequencies(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.size()];
        }
        let total = total as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }

    /// Adds another table's counts into this one.
    ///
    /// # Errors
    ///
    /// Returns [`KmerCompareError::Mismatch`] if the tables have different k.
    pub fn merge(&mut self, other: &Self) -> Result<(), KmerCompareError> {
        if self.k != other.k {
            return Err(KmerCompareError::Mismatch {
                reference: self.k.get(),
                reads: other.k.get(),
            });
        }
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
        Ok(())
    }

    /// Summary statistics for reporting.
    #[must_use]
    pub fn summary(&self) -> TableSummary {
        let stats = histogram_stats(&compute_histogram(self));
        TableSummary {
            total_kmers: stats.total_kmers,
            distinct_kmers: stats.distinct_kmers,
            zero_bins: self.zero_bins() as u64,
            mode_count: stats.mode_count,
            mode_frequency: stats.mode_frequency,
            mean_count: stats.mean_count,
        }
    }
}

/// Diagnostic totals for one table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TableSummary {
    /// Sum of all counts.
    pub total_kmers: u64,
    /// Number of k-mers with a non-zero count.
    pub distinct_kmers: u64,
    /// Number of k-mers with a zero count.
    pub zero_bins: u64,
    /// The count shared by the most distinct k-mers, smallest on ties.
    pub mode_count: u64,
    /// How many k-mers have the mode count.
    pub mode_frequency: u64,
    /// Mean count over distinct k-mers.
    pub mean_count: f64,
}
