//! Error types for kmercompare.
//!
//! This module provides strongly-typed errors for reading sequence files,
//! building k-mer tables and comparing them, so callers can tell a
//! configuration problem (bad `k`, unreadable file) apart from malformed input.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in kmercompare operations.
#[derive(Debug, Error)]
pub enum KmerCompareError {
    /// K-mer length is outside the valid range.
    #[error("invalid k-mer length {k}: must be between {min} and {max}")]
    InvalidKmerLength { k: usize, min: u8, max: u8 },

    /// Failed to open or read a sequence file.
    #[error("failed to read sequence file '{path}': {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// The sequence file does not follow the record format.
    #[error("malformed sequence file '{path}': {details}")]
    Format { details: String, path: PathBuf },

    /// Two k-mer tables built with different k-mer lengths were compared.
    #[error("cannot compare k-mer tables of different lengths: reference k={reference}, reads k={reads}")]
    Mismatch { reference: usize, reads: usize },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },
}

/// Error for invalid k-mer length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be between {min} and {max}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid k-mer length.
    pub min: u8,
    /// Maximum valid k-mer length.
    pub max: u8,
}

/// Error for a window that contains a byte outside `{A, C, G, T}`.
///
/// The frequency counter never surfaces this; ambiguous windows are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The invalid byte value.
    pub base: u8,
    /// Position of the invalid byte in the window.
    pub position: usize,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_ascii_graphic() || self.base == b' ' {
            write!(
                f,
                "invalid base '{}' (0x{:02x}) at position {}",
                self.base as char, self.base, self.position
            )
        } else {
            write!(
                f,
                "invalid base 0x{:02x} at position {}",
                self.base, self.position
            )
        }
    }
}

impl std::error::Error for InvalidBaseError {}

impl From<std::io::Error> for KmerCompareError {
    fn from(source: std::io::Error) -> Self {
        Self::WriteError { source }
    }
}

impl From<serde_json::Error> for KmerCompareError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonError { source }
    }
}

impl From<KmerLengthError> for KmerCompareError {
    fn from(err: KmerLengthError) -> Self {
        Self::InvalidKmerLength {
            k: err.k,
            min: err.min,
            max: err.max,
        }
    }
}

/// Errors that can occur when using the builder API.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// K-mer length was not set before calling a counting method.
    #[error("k-mer length not set; call .k() first")]
    KmerLengthNotSet,

    /// Both inputs asked for standard input, which can only be read once.
    #[error("reference and reads cannot both be read from stdin")]
    StdinUsedTwice,

    /// Invalid k-mer length provided.
    #[error(transparent)]
    KmerLength(#[from] KmerLengthError),

    /// Error reading, counting or comparing.
    #[error(transparent)]
    KmerCompare(#[from] KmerCompareError),
}
