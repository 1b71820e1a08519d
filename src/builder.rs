//! Builder pattern API for configuring k-mer comparisons.
//!
//! [`KmerComparer`] collects `k` and the run options, then counts a single
//! file or compares a reference with a read set.
//!
//! # Example
//!
//! ```rust,no_run
//! use kmercompare::builder::KmerComparer;
//!
//! let comparison = KmerComparer::new()
//!     .k(5)?
//!     .reference_id("chr1")
//!     .compare("reference.fa", "reads.fa")?;
//!
//! println!("{}: {:.4}", comparison.result.metric, comparison.result.value);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{io::Write, path::Path};

use crate::{
    cli::OutputFormat,
    compare::Metric,
    counter::Strand,
    error::{BuilderError, KmerLengthError},
    input::Input,
    kmer::KmerLength,
    reader::ReadMode,
    report::write_report,
    run::{compare_inputs, count_kmers, Comparison, RunOptions},
    table::KmerTable,
};

/// A builder for configuring k-mer comparisons.
///
/// Use [`KmerComparer::new()`] to create a new builder, configure it with the
/// fluent API, then call [`compare()`](KmerComparer::compare) or
/// [`compare_to_writer()`](KmerComparer::compare_to_writer) to execute.
///
/// Paths equal to `-` read from standard input; only one input of a
/// comparison may do so.
#[derive(Debug, Clone, Default)]
pub struct KmerComparer {
    k: Option<KmerLength>,
    options: RunOptions,
    format: OutputFormat,
}

impl KmerComparer {
    /// Creates a builder with default settings.
    ///
    /// Defaults: no `k` (must be set before running), cosine similarity,
    /// forward strand, lenient reading, no abundance lists, text output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmercompare::{builder::KmerComparer, compare::Metric};
    ///
    /// let comparer = KmerComparer::new();
    /// assert!(comparer.get_k().is_none());
    /// assert_eq!(comparer.get_metric(), Metric::Cosine);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the k-mer length.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is outside `[MIN_K, MAX_K]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmercompare::builder::KmerComparer;
    ///
    /// let comparer = KmerComparer::new().k(7)?;
    /// assert!(KmerComparer::new().k(2).is_err());
    /// # Ok::<(), kmercompare::error::KmerLengthError>(())
    /// ```
    ///
    /// [`MIN_K`]: crate::kmer::MIN_K
    /// [`MAX_K`]: crate::kmer::MAX_K
    pub fn k(mut self, k: usize) -> Result<Self, KmerLengthError> {
        self.k = Some(KmerLength::new(k)?);
        Ok(self)
    }

    /// Sets the k-mer length from a pre-validated `KmerLength`.
    #[must_use]
    pub fn k_validated(mut self, k: KmerLength) -> Self {
        self.k = Some(k);
        self
    }

    /// Sets the comparison metric.
    #[must_use]
    pub fn metric(mut self, metric: Metric) -> Self {
        self.options.metric = metric;
        self
    }

    /// Sets the strand policy used to count both inputs.
    #[must_use]
    pub fn strand(mut self, strand: Strand) -> Self {
        self.options.strand = strand;
        self
    }

    /// Sets how content before the first record is handled.
    #[must_use]
    pub fn read_mode(mut self, mode: ReadMode) -> Self {
        self.options.read_mode = mode;
        self
    }

    /// Sets the label printed for the reference.
    #[must_use]
    pub fn reference_id(mut self, id: impl Into<String>) -> Self {
        self.options.reference_id = Some(id.into());
        self
    }

    /// Lists the `n` most over- and under-represented k-mers in the result.
    #[must_use]
    pub fn top(mut self, n: usize) -> Self {
        self.options.top = n;
        self
    }

    /// Sets the output format for [`compare_to_writer()`](Self::compare_to_writer).
    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Counts the k-mers of one file.
    ///
    /// # Errors
    ///
    /// Returns an error if `k` has not been set or the file cannot be read or
    /// parsed.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use kmercompare::builder::KmerComparer;
    ///
    /// let table = KmerComparer::new().k(5)?.count("genome.fa")?;
    /// println!("{} distinct k-mers", table.distinct());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn count<P: AsRef<Path>>(&self, path: P) -> Result<KmerTable, BuilderError> {
        let k = self.k.ok_or(BuilderError::KmerLengthNotSet)?;
        let input = Input::from_path(path.as_ref());
        let (table, _) = count_kmers(&input, k, self.options.strand, self.options.read_mode)?;
        Ok(table)
    }

    /// Compares a reference file with a reads file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `k` has not been set
    /// - both paths are `-`
    /// - either file cannot be read or parsed
    pub fn compare<P, Q>(&self, reference: P, reads: Q) -> Result<Comparison, BuilderError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let k = self.k.ok_or(BuilderError::KmerLengthNotSet)?;
        let reference = Input::from_path(reference.as_ref());
        let reads = Input::from_path(reads.as_ref());
        if reference.is_stdin() && reads.is_stdin() {
            return Err(BuilderError::StdinUsedTwice);
        }
        Ok(compare_inputs(&reference, &reads, k, &self.options)?)
    }

    /// Compares two files and writes the report to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the comparison fails or the report cannot be
    /// written.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use kmercompare::{builder::KmerComparer, cli::OutputFormat};
    /// use std::{fs::File, io::BufWriter};
    ///
    /// let writer = BufWriter::new(File::create("comparison.json")?);
    ///
    /// KmerComparer::new()
    ///     .k(5)?
    ///     .format(OutputFormat::Json)
    ///     .top(10)
    ///     .compare_to_writer("reference.fa", "reads.fa", writer)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn compare_to_writer<P, Q, W>(
        &self,
        reference: P,
        reads: Q,
        writer: W,
    ) -> Result<(), BuilderError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        W: Write,
    {
        let comparison = self.compare(reference, reads)?;
        write_report(&comparison, self.format, writer)?;
        Ok(())
    }

    /// Returns the configured k-mer length, if set.
    #[must_use]
    pub const fn get_k(&self) -> Option<KmerLength> {
        self.k
    }

    /// Returns the configured metric.
    #[must_use]
    pub const fn get_metric(&self) -> Metric {
        self.options.metric
    }

    /// Returns the configured strand policy.
    #[must_use]
    pub const fn get_strand(&self) -> Strand {
        self.options.strand
    }

    /// Returns the configured read mode.
    #[must_use]
    pub const fn get_read_mode(&self) -> ReadMode {
        self.options.read_mode
    }

    /// Returns the configured output format.
    #[must_use]
    pub const fn get_format(&self) -> OutputFormat {
        self.format
    }

    /// Returns the run options the builder has collected.
    #[must_use]
    pub const fn options(&self) -> &RunOptions {
        &self.options
    }
}
