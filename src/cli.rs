//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::{compare::Metric, kmer::KmerLength};

/// Compare the k-mer composition of a read set against a reference sequence.
///
/// Either input may be `-` to read from standard input.
#[derive(Parser, Debug)]
#[command(name = "kmercompare")]
#[command(version, author, about, long_about = None, arg_required_else_help = true)]
pub struct Args {
    /// Reference sequence file
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Reads file
    #[arg(short = 'a', long)]
    pub reads: PathBuf,

    /// K-mer length (3-11)
    #[arg(short, long = "kmer-size", alias = "kmer_size", value_parser = parse_k)]
    pub kmer_size: KmerLength,

    /// Label for the reference in the report
    #[arg(short = 'i', long, alias = "reference_id")]
    pub reference_id: Option<String>,

    /// Comparison metric
    #[arg(short, long, value_enum, default_value = "cosine")]
    pub metric: Metric,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Fail on content before the first record instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Count each k-mer together with its reverse complement
    #[arg(short, long)]
    pub canonical: bool,

    /// Also list the N most over- and under-represented k-mers
    #[arg(short, long, default_value = "0")]
    pub top: usize,

    /// Suppress the banner (only output the report)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the comparison report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Aligned `label value` lines
    #[default]
    Text,
    /// A header line and a value line, tab-separated
    Tsv,
    /// Pretty-printed JSON object
    Json,
}

fn parse_k(s: &str) -> Result<KmerLength, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    KmerLength::new(k).map_err(|e| e.to_string())
}
