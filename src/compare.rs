//! Distribution comparison.
//!
//! Both tables are normalised to frequency vectors (`count / total`) before a
//! metric is applied, so inputs of very different depth stay comparable. A
//! table with no counts becomes the all-zero vector.

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    error::KmerCompareError,
    table::{KmerTable, TableSummary},
};

/// How two frequency vectors are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Cosine similarity in `[0, 1]`; 1 means identical composition.
    ///
    /// Zero when either table is empty.
    #[default]
    Cosine,
    /// Euclidean distance in `[0, sqrt(2)]`; 0 means identical composition.
    Euclidean,
    /// Base-2 Jensen-Shannon divergence in `[0, 1]`; 0 means identical composition.
    ///
    /// One when either table is empty.
    JensenShannon,
}

impl Metric {
    /// Returns `true` if a larger value means the tables are closer.
    #[must_use]
    pub const fn is_similarity(self) -> bool {
        matches!(self, Self::Cosine)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cosine => write!(f, "cosine"),
            Self::Euclidean => write!(f, "euclidean"),
            Self::JensenShannon => write!(f, "jensen-shannon"),
        }
    }
}

/// The outcome of comparing a reference table with a reads table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Metric that produced `value`.
    pub metric: Metric,
    /// The similarity or distance.
    pub value: f64,
    /// Totals of the reference table.
    pub reference: TableSummary,
    /// Totals of the reads table.
    pub reads: TableSummary,
}

/// Compares two tables with the default metric, cosine similarity.
///
/// # Errors
///
/// Returns [`KmerCompareError::Mismatch`] if the tables have different k.
///
/// # Example
///
/// ```rust
/// use kmercompare::{compare::compare, counter::count, kmer::KmerLength};
///
/// let k = KmerLength::new(3)?;
/// let reference = count(b"ACGTACGTAC", k);
/// let reads = count(b"ACGTACGTAC", k);
///
/// let result = compare(&reference, &reads)?;
/// assert!((result.value - 1.0).abs() < 1e-12);
/// assert_eq!(result.reference.total_kmers, 8);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compare(
    reference: &KmerTable,
    reads: &KmerTable,
) -> Result<ComparisonResult, KmerCompareError> {
    compare_with(reference, reads, Metric::default())
}

/// Compares two tables with the given metric.
///
/// Neither table is modified.
///
/// # Errors
///
/// Returns [`KmerCompareError::Mismatch`] if the tables have different k.
pub fn compare_with(
    reference: &KmerTable,
    reads: &KmerTable,
    metric: Metric,
) -> Result<ComparisonResult, KmerCompareError> {
    if reference.k() != reads.k() {
        return Err(KmerCompareError::Mismatch {
            reference: reference.k().get(),
            reads: reads.k().get(),
        });
    }

    let value = if reference.total() == 0 || reads.total() == 0 {
        match metric {
            Metric::Cosine => 0.0,
            Metric::Euclidean => euclidean(&reference.frequencies(), &reads.frequencies()),
            Metric::JensenShannon => 1.0,
        }
    } else {
        let p = reference.frequencies();
        let q = reads.frequencies();
        match metric {
            Metric::Cosine => cosine(&p, &q),
            Metric::Euclidean => euclidean(&p, &q),
            Metric::JensenShannon => jensen_shannon(&p, &q),
        }
    };

    Ok(ComparisonResult {
        metric,
        value,
        reference: reference.summary(),
        reads: reads.summary(),
    })
}

fn cosine(p: &[f64], q: &[f64]) -> f64 {
    let dot: f64 = p.iter().zip(q).map(|(a, b)| a * b).sum();
    let squares_p: f64 = p.iter().map(|a| a * a).sum();
    let squares_q: f64 = q.iter().map(|b| b * b).sum();
    if squares_p == 0.0 || squares_q == 0.0 {
        return 0.0;
    }
    (dot / (squares_p * squares_q).sqrt()).clamp(0.0, 1.0)
}

fn euclidean(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

fn jensen_shannon(p: &[f64], q: &[f64]) -> f64 {
    // 0 * log(0) is taken as 0
    let divergence: f64 = p
        .iter()
        .zip(q)
        .map(|(&a, &b)| {
            let m = (a + b) / 2.0;
            let mut term = 0.0;
            if a > 0.0 {
                term += a * (a / m).log2();
            }
            if b > 0.0 {
                term += b * (b / m).log2();
            }
            term
        })
        .sum();
    (divergence / 2.0).clamp(0.0, 1.0)
}
