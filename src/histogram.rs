//! K-mer count histograms.
//!
//! A histogram maps each observed count to the number of k-mers that reached
//! it ("count of counts"). K-mers with a zero count are left out, so the
//! histogram of a sparse `4^k` table stays small.
//!
//! # Example
//!
//! ```rust
//! use kmercompare::{counter::count, histogram::compute_histogram, kmer::KmerLength};
//!
//! let table = count(b"ACGTACGT", KmerLength::new(3)?);
//!
//! // ACG and CGT appear twice, GTA and TAC once
//! let histogram = compute_histogram(&table);
//! assert_eq!(histogram.get(&1), Some(&2));
//! assert_eq!(histogram.get(&2), Some(&2));
//! # Ok::<(), kmercompare::error::KmerLengthError>(())
//! ```

use std::collections::BTreeMap;

use crate::table::KmerTable;

/// K-mer frequency histogram: maps count -> number of distinct k-mers with that count.
///
/// Uses `BTreeMap` for sorted iteration (counts in ascending order).
pub type KmerHistogram = BTreeMap<u64, u64>;

/// Summary statistics for a k-mer histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramStats {
    /// Total k-mer occurrences (sum of all k-mer counts).
    pub total_kmers: u64,
    /// Number of k-mers seen at least once.
    pub distinct_kmers: u64,
    /// The count value shared by the most k-mers.
    pub mode_count: u64,
    /// Number of k-mers that have the mode count.
    pub mode_frequency: u64,
    /// Average count per distinct k-mer.
    pub mean_count: f64,
}

/// Computes the histogram of a table's non-zero counts.
#[must_use]
pub fn compute_histogram(table: &KmerTable) -> KmerHistogram {
    let mut histogram = BTreeMap::new();
    for (_, count) in table.iter_nonzero() {
        *histogram.entry(count).or_insert(0) += 1;
    }
    histogram
}

/// Computes summary statistics for a k-mer histogram.
#[must_use]
pub fn histogram_stats(histogram: &KmerHistogram) -> HistogramStats {
    let distinct: u64 = histogram.values().sum();
    let total: u64 = histogram.iter().map(|(c, f)| c * f).sum();

    // Ties go to the smallest count
    let (mode_count, mode_frequency) = histogram
        .iter()
        .fold(None, |best: Option<(u64, u64)>, (&c, &f)| match best {
            Some((_, best_f)) if best_f >= f => best,
            _ => Some((c, f)),
        })
        .unwrap_or((0, 0));

    HistogramStats {
        total_kmers: total,
        distinct_kmers: distinct,
        mode_count,
        mode_frequency,
        #[allow(clippy::cast_precision_loss)]
        mean_count: if distinct > 0 {
            total as f64 / distinct as f64
        } else {
            0.0
        },
    }
}
