//! Per-k-mer abundance differences between a reference and a read set.
//!
//! Abundance is the share of a table's total, as a percentage. The difference
//! is `reads - reference`, so a positive value marks a k-mer that the reads
//! over-represent.

use serde::Serialize;

use crate::{
    error::KmerCompareError,
    kmer::{decode_to_string, KmerLength},
    table::KmerTable,
};

/// Relative abundance of one k-mer in both tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KmerAbundance {
    /// The k-mer as bases.
    pub kmer: String,
    /// Its encoded key.
    #[serde(skip)]
    pub key: usize,
    /// Percent of the reference total.
    pub reference_percent: f64,
    /// Percent of the reads total.
    pub reads_percent: f64,
    /// `reads_percent - reference_percent`.
    pub difference: f64,
}

/// Lists every k-mer seen in either table, most over-represented first.
///
/// Equal differences are ordered by key.
///
/// # Errors
///
/// Returns [`KmerCompareError::Mismatch`] if the tables have different k.
///
/// # Example
///
/// ```rust
/// use kmercompare::{abundance::abundance_differences, counter::count, kmer::KmerLength};
///
/// let k = KmerLength::new(3)?;
/// let reference = count(b"AAAAAC", k);
/// let reads = count(b"AAACCC", k);
///
/// let entries = abundance_differences(&reference, &reads)?;
/// assert_eq!(entries.first().map(|e| e.kmer.as_str()), Some("ACC"));
/// assert_eq!(entries.last().map(|e| e.kmer.as_str()), Some("AAA"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn abundance_differences(
    reference: &KmerTable,
    reads: &KmerTable,
) -> Result<Vec<KmerAbundance>, KmerCompareError> {
    if reference.k() != reads.k() {
        return Err(KmerCompareError::Mismatch {
            reference: reference.k().get(),
            reads: reads.k().get(),
        });
    }

    let k = reference.k();
    let reference_percent = percentages(reference);
    let reads_percent = percentages(reads);

    let mut entries: Vec<KmerAbundance> = reference
        .counts()
        .iter()
        .zip(reads.counts())
        .enumerate()
        .filter(|(_, (&a, &b))| a > 0 || b > 0)
        .map(|(key, _)| entry(key, k, reference_percent[key], reads_percent[key]))
        .collect();

    entries.sort_by(|a, b| {
        b.difference
            .total_cmp(&a.difference)
            .then(a.key.cmp(&b.key))
    });

    Ok(entries)
}

/// Up to `n` k-mers the reads over-represent, largest difference first.
///
/// Only positive differences qualify. Expects the ordering of
/// [`abundance_differences`].
#[must_use]
pub fn over_represented(entries: &[KmerAbundance], n: usize) -> Vec<KmerAbundance> {
    entries
        .iter()
        .take_while(|e| e.difference > 0.0)
        .take(n)
        .cloned()
        .collect()
}

/// Up to `n` k-mers the reads under-represent, most negative difference first.
///
/// Only negative differences qualify. Expects the ordering of
/// [`abundance_differences`].
#[must_use]
pub fn under_represented(entries: &[KmerAbundance], n: usize) -> Vec<KmerAbundance> {
    entries
        .iter()
        .rev()
        .take_while(|e| e.difference < 0.0)
        .take(n)
        .cloned()
        .collect()
}

fn entry(key: usize, k: KmerLength, reference_percent: f64, reads_percent: f64) -> KmerAbundance {
    KmerAbundance {
        kmer: decode_to_string(key, k),
        key,
        reference_percent,
        reads_percent,
        difference: reads_percent - reference_percent,
    }
}

fn percentages(table: &KmerTable) -> Vec<f64> {
    table.frequencies().into_iter().map(|f| f * 100.0).collect()
}
