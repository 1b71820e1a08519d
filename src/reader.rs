//! Sequence record parsing.
//!
//! Records follow the FASTA layout: a line starting with `>` opens a record
//! whose identifier is the header text up to the first whitespace, and every
//! following line up to the next `>` is appended to the record's symbols with
//! its line terminator and trailing whitespace stripped.
//!
//! Lines are read as raw bytes. A symbol byte that is not a base, or not even
//! valid UTF-8, is kept as is and left for the counter to treat as ambiguous.
//!
//! Lines before the first `>` are governed by [`ReadMode`]. A header with no
//! body lines yields a record with no symbols.

use std::{
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use bytes::Bytes;

use crate::{error::KmerCompareError, input::Input};

#[cfg(feature = "tracing")]
use tracing::debug;

/// One parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    id: String,
    symbols: Bytes,
}

impl SequenceRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, symbols: Bytes) -> Self {
        Self {
            id: id.into(),
            symbols,
        }
    }

    /// Identifier from the header line.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Concatenated body lines.
    #[must_use]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// What to do with content that appears before the first record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Skip it.
    #[default]
    Lenient,
    /// Fail with [`KmerCompareError::Format`]; blank lines are still skipped.
    Strict,
}

/// A lazy, single-pass iterator over the records of one stream.
///
/// Iteration stops after the first error.
///
/// # Example
///
/// ```rust
/// use kmercompare::reader::{ReadMode, SequenceReader};
///
/// let data = b"# made by hand\n>seq1 first\nACGT\nAC\n>seq2\n".as_slice();
/// let records = SequenceReader::new(data, "inline.fa", ReadMode::Lenient)?
///     .collect::<Result<Vec<_>, _>>()?;
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].id(), "seq1");
/// assert_eq!(records[0].symbols(), b"ACGTAC");
/// assert!(records[1].is_empty());
/// # Ok::<(), kmercompare::error::KmerCompareError>(())
/// ```
pub struct SequenceReader<R: Read> {
    reader: BufReader<R>,
    path: PathBuf,
    line: Vec<u8>,
    /// Identifier of the record whose header was read last.
    pending: Option<String>,
    skipped_lines: u64,
    failed: bool,
}

impl<R: Read> SequenceReader<R> {
    /// Wraps a byte stream; `path` only names the stream in errors.
    ///
    /// Content before the first record is consumed here, so a strict-mode
    /// violation is reported before any record is yielded.
    ///
    /// # Errors
    ///
    /// Returns [`KmerCompareError::Io`] if the stream cannot be read and
    /// [`KmerCompareError::Format`] for content before the first record in
    /// strict mode.
    pub fn new(
        reader: R,
        path: impl Into<PathBuf>,
        mode: ReadMode,
    ) -> Result<Self, KmerCompareError> {
        let path = path.into();
        let mut reader = BufReader::new(reader);
        let skipped_lines = skip_preamble(&mut reader, mode, &path)?;

        let mut records = Self {
            reader,
            path,
            line: Vec::new(),
            pending: None,
            skipped_lines,
            failed: false,
        };
        if records.read_line()? {
            records.pending = Some(header_id(&records.line));
        }
        Ok(records)
    }

    /// Lines consumed before the first record.
    #[must_use]
    pub const fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// Reads the next line into `self.line`; `false` at end of input.
    fn read_line(&mut self) -> Result<bool, KmerCompareError> {
        self.line.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.line)
            .map_err(|source| KmerCompareError::Io {
                source,
                path: self.path.clone(),
            })?;
        Ok(read > 0)
    }

    fn read_record(&mut self) -> Result<Option<SequenceRecord>, KmerCompareError> {
        let Some(id) = self.pending.take() else {
            return Ok(None);
        };

        let mut symbols = Vec::new();
        while self.read_line()? {
            if self.line.first() == Some(&b'>') {
                self.pending = Some(header_id(&self.line));
                break;
            }
            symbols.extend_from_slice(trim_end(&self.line));
        }
        Ok(Some(SequenceRecord::new(id, Bytes::from(symbols))))
    }
}

impl SequenceReader<Box<dyn Read + Send>> {
    /// Opens a file or standard input.
    ///
    /// # Errors
    ///
    /// See [`Input::open`] and [`SequenceReader::new`].
    pub fn open(input: &Input, mode: ReadMode) -> Result<Self, KmerCompareError> {
        Self::new(input.open()?, input.display_path(), mode)
    }
}

impl<R: Read> Iterator for SequenceReader<R> {
    type Item = Result<SequenceRecord, KmerCompareError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_record() {
            Ok(record) => record.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Header text after `>` up to the first whitespace; may be empty.
fn header_id(line: &[u8]) -> String {
    let header = line.get(1..).unwrap_or_default();
    let end = header
        .iter()
        .position(u8::is_ascii_whitespace)
        .unwrap_or(header.len());
    String::from_utf8_lossy(&header[..end]).into_owned()
}

fn trim_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..end]
}

/// Consumes every line before the first `>`, returning how many were skipped.
fn skip_preamble<B: BufRead>(
    reader: &mut B,
    mode: ReadMode,
    path: &Path,
) -> Result<u64, KmerCompareError> {
    let io_error = |source| KmerCompareError::Io {
        source,
        path: path.to_path_buf(),
    };

    let mut skipped = 0;
    let mut line = Vec::new();
    loop {
        let buf = reader.fill_buf().map_err(io_error)?;
        if buf.is_empty() || buf[0] == b'>' {
            break;
        }

        line.clear();
        reader.read_until(b'\n', &mut line).map_err(io_error)?;
        skipped += 1;

        if mode == ReadMode::Strict && !line.iter().all(u8::is_ascii_whitespace) {
            return Err(KmerCompareError::Format {
                details: format!("line {skipped} precedes the first record"),
                path: path.to_path_buf(),
            });
        }
    }

    #[cfg(feature = "tracing")]
    {
        if skipped > 0 {
            debug!(path = ?path, lines = skipped, "Skipped lines before the first record");
        }
    }

    Ok(skipped)
}
