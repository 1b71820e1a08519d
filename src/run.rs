//! Counting and comparison runs.
//!
//! The reference and the reads are counted concurrently, each into its own
//! table; the comparison starts once both have finished.

use std::io::Write;

use serde::Serialize;

use crate::{
    abundance::{abundance_differences, over_represented, under_represented, KmerAbundance},
    cli::OutputFormat,
    compare::{compare_with, ComparisonResult, Metric},
    counter::{count_records, CountStats, Strand},
    error::KmerCompareError,
    input::Input,
    kmer::KmerLength,
    reader::{ReadMode, SequenceReader},
    report::write_report,
    table::KmerTable,
};

#[cfg(feature = "tracing")]
use tracing::{info, info_span};

/// Settings for a comparison run, apart from the inputs and `k`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Comparison metric.
    pub metric: Metric,
    /// Strand policy for counting.
    pub strand: Strand,
    /// How content before the first record is handled.
    pub read_mode: ReadMode,
    /// Number of over- and under-represented k-mers to report.
    pub top: usize,
    /// Label for the reference; never used in computation.
    pub reference_id: Option<String>,
}

/// Everything the report emitter prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Label for the reference, if one was given.
    pub reference_id: Option<String>,
    /// Reference input as shown to the user.
    pub reference: String,
    /// Reads input as shown to the user.
    pub reads: String,
    /// K-mer length.
    pub k: KmerLength,
    /// Strand policy used for both tables.
    pub strand: Strand,
    /// The metric value and table totals.
    pub result: ComparisonResult,
    /// Counting tallies for the reference.
    pub reference_stats: CountStats,
    /// Counting tallies for the reads.
    pub reads_stats: CountStats,
    /// K-mers the reads over-represent most.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub over_represented: Vec<KmerAbundance>,
    /// K-mers the reads under-represent most.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub under_represented: Vec<KmerAbundance>,
}

/// Counts every record of one input into a table.
///
/// # Errors
///
/// Returns [`KmerCompareError::Io`] if the input cannot be opened or read and
/// [`KmerCompareError::Format`] for malformed input.
///
/// # Example
///
/// ```rust,no_run
/// use kmercompare::{
///     counter::Strand, input::Input, kmer::KmerLength, reader::ReadMode, run::count_kmers,
/// };
/// use std::path::Path;
///
/// let input = Input::from_path(Path::new("genome.fa"));
/// let (table, stats) = count_kmers(&input, KmerLength::new(5)?, Strand::Forward, ReadMode::Lenient)?;
/// println!("{} k-mers from {} records", table.total(), stats.records);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn count_kmers(
    input: &Input,
    k: KmerLength,
    strand: Strand,
    mode: ReadMode,
) -> Result<(KmerTable, CountStats), KmerCompareError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("count_kmers", input = %input, k = k.get()).entered();

    #[cfg(feature = "tracing")]
    info!(input = %input, k = k.get(), strand = %strand, "Starting k-mer counting");

    let records = SequenceReader::open(input, mode)?;
    let skipped_lines = records.skipped_lines();
    let (table, mut stats) = count_records(records, k, strand)?;
    stats.skipped_lines = skipped_lines;

    #[cfg(feature = "tracing")]
    info!(
        records = stats.records,
        total = table.total(),
        skipped = stats.skipped_windows,
        "K-mer counting complete"
    );

    Ok((table, stats))
}

/// Counts both inputs and compares the tables.
///
/// At most one of the inputs may be standard input.
///
/// # Errors
///
/// Returns the first error from counting either input. If both fail, the
/// reference error is returned.
pub fn compare_inputs(
    reference: &Input,
    reads: &Input,
    k: KmerLength,
    options: &RunOptions,
) -> Result<Comparison, KmerCompareError> {
    let (reference_counts, reads_counts) = rayon::join(
        || count_kmers(reference, k, options.strand, options.read_mode),
        || count_kmers(reads, k, options.strand, options.read_mode),
    );
    let (reference_table, reference_stats) = reference_counts?;
    let (reads_table, reads_stats) = reads_counts?;

    let result = compare_with(&reference_table, &reads_table, options.metric)?;

    #[cfg(feature = "tracing")]
    info!(metric = %result.metric, value = result.value, "Comparison complete");

    let (over, under) = if options.top > 0 {
        let entries = abundance_differences(&reference_table, &reads_table)?;
        (
            over_represented(&entries, options.top),
            under_represented(&entries, options.top),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(Comparison {
        reference_id: options.reference_id.clone(),
        reference: reference.to_string(),
        reads: reads.to_string(),
        k,
        strand: options.strand,
        result,
        reference_stats,
        reads_stats,
        over_represented: over,
        under_represented: under,
    })
}

/// Compares two inputs and writes the report.
///
/// # Errors
///
/// Returns [`KmerCompareError`] on read, write, or serialization errors.
pub fn run_with_options<W: Write>(
    reference: &Input,
    reads: &Input,
    k: KmerLength,
    options: &RunOptions,
    format: OutputFormat,
    writer: W,
) -> Result<(), KmerCompareError> {
    let comparison = compare_inputs(reference, reads, k, options)?;
    write_report(&comparison, format, writer)
}
