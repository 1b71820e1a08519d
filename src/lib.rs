//! # kmercompare
//!
//! Compares the k-mer composition of a set of sequencing reads against a
//! reference sequence, as a quick alignment-free check of whether the reads
//! come from that reference.
//!
//! Each input is read as a stream of `>`-delimited records. Every record is
//! windowed on its own, each window of `k` bases is packed into an integer key
//! in `[0, 4^k)`, and the counts land in a flat table with one slot per
//! possible k-mer. The two tables are then normalised to frequency vectors and
//! compared with the chosen [`Metric`](compare::Metric), cosine similarity by
//! default.
//!
//! ## Features
//!
//! - **Per-record windowing**: no k-mer spans the junction between two records
//! - **Ambiguity tolerant**: windows containing `N` or any other non-ACGT byte
//!   are skipped and tallied, never fatal
//! - **Linear counting**: a rolling 2-bit key makes counting `O(L)` for any `k`
//! - **Concurrent inputs**: reference and reads are counted in parallel
//! - **Several metrics**: cosine similarity, Euclidean distance, Jensen-Shannon
//!   divergence
//! - **Canonical counting**: optionally fold each k-mer with its reverse complement
//! - **Abundance report**: the k-mers the reads most over- and under-represent
//! - **Stdin support**: either input may be `-`
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use kmercompare::builder::KmerComparer;
//!
//! let comparison = KmerComparer::new()
//!     .k(5)?
//!     .compare("reference.fa", "reads.fa")?;
//!
//! println!("similarity: {:.4}", comparison.result.value);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The building blocks are public too:
//!
//! ```rust
//! use kmercompare::{compare::compare, counter::count, kmer::KmerLength};
//!
//! let k = KmerLength::new(3)?;
//! let result = compare(&count(b"AAAAAA", k), &count(b"TTTTTT", k))?;
//! assert_eq!(result.value, 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `gzip`: read `.gz` compressed input
//! - `tracing`: emit `tracing` spans and events; the binary honours `RUST_LOG`
//! - `production`: all of the above

pub mod abundance;
pub mod builder;
pub mod cli;
pub mod compare;
pub mod counter;
pub mod error;
pub mod histogram;
pub mod input;
pub mod kmer;
pub mod reader;
pub mod report;
pub mod run;
pub mod table;
