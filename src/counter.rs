//! K-mer frequency counting.
//!
//! Every record is windowed on its own: a window never spans the junction
//! between two records, and the per-record counts are summed into a single
//! [`KmerTable`]. Windows that contain a byte outside `{A, C, G, T}` are
//! skipped and tallied in [`CountStats::skipped_windows`]; they are not errors.
//!
//! Each base is folded into a rolling 2-bit key, so counting a record of
//! length `L` is `O(L)` regardless of `k`.

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    error::KmerCompareError,
    kmer::{Base, KmerLength},
    reader::SequenceRecord,
    table::KmerTable,
};

/// Which strand a k-mer is counted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    /// Count each k-mer as it appears in the record.
    #[default]
    Forward,
    /// Count each k-mer under the smaller of its key and its reverse complement's key.
    Canonical,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Canonical => write!(f, "canonical"),
        }
    }
}

/// Tallies gathered while counting one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CountStats {
    /// Records consumed.
    pub records: u64,
    /// Bases consumed, ambiguous ones included.
    pub bases: u64,
    /// Windows encoded and counted.
    pub windows: u64,
    /// Windows skipped because they held an ambiguous base.
    pub skipped_windows: u64,
    /// Lines before the first record, set by [`crate::run::count_kmers`].
    pub skipped_lines: u64,
}

/// Accumulates k-mer counts over any number of records.
///
/// # Example
///
/// ```rust
/// use kmercompare::{counter::{FrequencyCounter, Strand}, kmer::KmerLength};
///
/// let mut counter = FrequencyCounter::new(KmerLength::new(3)?, Strand::Forward);
/// counter.add_sequence(b"ACGT");
/// counter.add_sequence(b"ACGNT");
///
/// let (table, stats) = counter.finish();
/// assert_eq!(table.count_of(b"ACG"), Some(2));
/// assert_eq!(stats.skipped_windows, 2);
/// # Ok::<(), kmercompare::error::KmerLengthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyCounter {
    table: KmerTable,
    strand: Strand,
    stats: CountStats,
}

impl FrequencyCounter {
    /// Creates a counter with an all-zero table.
    #[must_use]
    pub fn new(k: KmerLength, strand: Strand) -> Self {
        Self {
            table: KmerTable::new(k),
            strand,
            stats: CountStats::default(),
        }
    }

    /// Counts every window of one record.
    ///
    /// A record shorter than `k` contributes nothing but is still tallied.
    pub fn add_sequence(&mut self, symbols: &[u8]) {
        let k = self.table.k();
        let len = k.get();
        let mask = k.mask();
        let rc_shift = 2 * (len - 1);

        self.stats.records += 1;
        self.stats.bases += symbols.len() as u64;

        let mut forward = 0usize;
        let mut reverse = 0usize;
        // Length of the run of valid bases ending at the current position
        let mut run = 0usize;

        for (i, &byte) in symbols.iter().enumerate() {
            if let Some(base) = Base::from_byte(byte) {
                let code = base.code();
                forward = ((forward << 2) | code) & mask;
                reverse = (reverse >> 2) | (base.complement().code() << rc_shift);
                run += 1;
            } else {
                run = 0;
            }

            if i + 1 < len {
                continue;
            }
            if run >= len {
                let key = match self.strand {
                    Strand::Forward => forward,
                    Strand::Canonical => forward.min(reverse),
                };
                self.table.increment(key);
                self.stats.windows += 1;
            } else {
                self.stats.skipped_windows += 1;
            }
        }
    }

    /// Counts a record.
    pub fn add_record(&mut self, record: &SequenceRecord) {
        self.add_sequence(record.symbols());
    }

    /// The table built so far.
    #[must_use]
    pub const fn table(&self) -> &KmerTable {
        &self.table
    }

    /// Tallies gathered so far.
    #[must_use]
    pub const fn stats(&self) -> CountStats {
        self.stats
    }

    /// Hands over the table and its tallies.
    #[must_use]
    pub fn finish(self) -> (KmerTable, CountStats) {
        (self.table, self.stats)
    }
}

/// Counts the forward k-mers of a single symbol stream.
///
/// Returns an all-zero table when `symbols` is shorter than `k`.
///
/// # Example
///
/// ```rust
/// use kmercompare::{counter::count, kmer::KmerLength};
///
/// let table = count(b"AAAAAA", KmerLength::new(3)?);
/// assert_eq!(table.count_of(b"AAA"), Some(4));
/// assert_eq!(table.total(), 4);
/// # Ok::<(), kmercompare::error::KmerLengthError>(())
/// ```
#[must_use]
pub fn count(symbols: &[u8], k: KmerLength) -> KmerTable {
    let mut counter = FrequencyCounter::new(k, Strand::Forward);
    counter.add_sequence(symbols);
    counter.finish().0
}

/// Counts every record from a record stream into one table.
///
/// Stops at the first read error.
///
/// # Errors
///
/// Propagates the first error yielded by `records`.
pub fn count_records<I>(
    records: I,
    k: KmerLength,
    strand: Strand,
) -> Result<(KmerTable, CountStats), KmerCompareError>
where
    I: IntoIterator<Item = Result<SequenceRecord, KmerCompareError>>,
{
    let mut counter = FrequencyCounter::new(k, strand);
    for record in records {
        counter.add_record(&record?);
    }
    Ok(counter.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        kmer::{canonical_key, encode},
        reader::{ReadMode, SequenceReader},
    };

    fn k(k: usize) -> KmerLength {
        KmerLength::relaxed(k).unwrap()
    }

    fn record(id: &str, symbols: &'static [u8]) -> Result<SequenceRecord, KmerCompareError> {
        Ok(SequenceRecord::new(id, bytes::Bytes::from_static(symbols)))
    }

    #[test]
    fn shorter_than_k_is_all_zero() {
        let table = count(b"ACGTACGTAC", k(11));
        assert_eq!(table.total(), 0);
        assert_eq!(table.size(), k(11).table_size());
    }

    #[test]
    fn empty_sequence_is_all_zero() {
        assert_eq!(count(b"", k(3)).total(), 0);
    }

    #[test]
    fn total_is_len_minus_k_plus_one() {
        let seq = b"ACGTTGCAAGGCTTACGATCGATCGGATC";
        for len in 1..=11 {
            let table = count(seq, k(len));
            assert_eq!(table.total(), (seq.len() - len + 1) as u64, "k={len}");
        }
    }

    #[test]
    fn dinucleotides_of_acgtacgt() {
        let table = count(b"ACGTACGT", k(2));
        assert_eq!(table.count_of(b"AC"), Some(2));
        assert_eq!(table.count_of(b"CG"), Some(2));
        assert_eq!(table.count_of(b"GT"), Some(2));
        assert_eq!(table.count_of(b"TA"), Some(1));
        assert_eq!(table.total(), 7);
    }

    #[test]
    fn ambiguous_windows_are_skipped() {
        let mut counter = FrequencyCounter::new(k(3), Strand::Forward);
        counter.add_sequence(b"ACGNACG");
        let (table, stats) = counter.finish();

        assert_eq!(table.count_of(b"ACG"), Some(2));
        assert_eq!(table.total(), 2);
        assert_eq!(stats.windows, 2);
        assert_eq!(stats.skipped_windows, 3);
        assert_eq!(stats.bases, 7);
    }

    #[test]
    fn stale_bits_after_ambiguous_base_do_not_leak() {
        // The window after the N must encode as CAT, not as something carrying
        // bits from before the N
        let table = count(b"GGGNCAT", k(3));
        assert_eq!(table.count_of(b"GGG"), Some(1));
        assert_eq!(table.count_of(b"CAT"), Some(1));
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn soft_masked_bases_are_counted() {
        let table = count(b"acgTAC", k(3));
        assert_eq!(table.count_of(b"ACG"), Some(1));
        assert_eq!(table.count_of(b"TAC"), Some(1));
    }

    #[test]
    fn windows_never_span_records() {
        let (table, stats) =
            count_records(vec![record("a", b"AC"), record("b", b"GT")], k(2), Strand::Forward)
                .unwrap();

        assert_eq!(table.count_of(b"AC"), Some(1));
        assert_eq!(table.count_of(b"GT"), Some(1));
        assert_eq!(table.count_of(b"CG"), Some(0));
        assert_eq!(table.total(), 2);
        assert_eq!(stats.records, 2);
    }

    #[test]
    fn per_record_counts_equal_sum_of_tables() {
        let (combined, _) = count_records(
            vec![record("a", b"ACGTTGCA"), record("b", b"TTGACCA")],
            k(3),
            Strand::Forward,
        )
        .unwrap();

        let mut summed = count(b"ACGTTGCA", k(3));
        summed.merge(&count(b"TTGACCA", k(3))).unwrap();

        assert_eq!(combined, summed);
    }

    #[test]
    fn count_records_propagates_errors() {
        let records = vec![
            record("a", b"ACGT"),
            Err(KmerCompareError::Format {
                details: "bad".to_string(),
                path: "x.fa".into(),
            }),
        ];
        assert!(count_records(records, k(3), Strand::Forward).is_err());
    }

    #[test]
    fn bare_header_does_not_hide_later_records() {
        let reader = SequenceReader::new(&b">\n>r1\nACGTACGT\n"[..], "t.fa", ReadMode::Lenient)
            .unwrap();
        let (table, stats) = count_records(reader, k(3), Strand::Forward).unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(table.total(), 6);
        assert_eq!(table.count_of(b"ACG"), Some(2));
    }

    #[test]
    fn non_utf8_bytes_are_ambiguous() {
        let reader = SequenceReader::new(&b">r1\nACG\xe9TACG\n"[..], "t.fa", ReadMode::Lenient)
            .unwrap();
        let (table, stats) = count_records(reader, k(3), Strand::Forward).unwrap();

        assert_eq!(table.count_of(b"ACG"), Some(2));
        assert_eq!(table.count_of(b"TAC"), Some(1));
        assert_eq!(table.total(), 3);
        assert_eq!(stats.skipped_windows, 3);
    }

    #[test]
    fn canonical_folds_reverse_complements() {
        let mut counter = FrequencyCounter::new(k(3), Strand::Canonical);
        counter.add_sequence(b"AAA");
        counter.add_sequence(b"TTT");
        let (table, _) = counter.finish();

        assert_eq!(table.count_of(b"AAA"), Some(2));
        assert_eq!(table.count_of(b"TTT"), Some(0));
    }

    #[test]
    fn canonical_matches_canonical_key_per_window() {
        let seq = b"GATTACAGGCTTNACGGT";
        let len = k(4);
        let mut counter = FrequencyCounter::new(len, Strand::Canonical);
        counter.add_sequence(seq);
        let (table, _) = counter.finish();

        let mut expected = KmerTable::new(len);
        for window in seq.windows(4) {
            if let Ok(key) = encode(window) {
                expected.increment(canonical_key(key, len));
            }
        }
        assert_eq!(table, expected);
    }

    #[test]
    fn strand_display() {
        assert_eq!(Strand::Forward.to_string(), "forward");
        assert_eq!(Strand::Canonical.to_string(), "canonical");
    }
}
