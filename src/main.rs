use std::{
    io::{stdout, BufWriter},
    process,
};

use clap::Parser;
use colored::Colorize;
use kmercompare::{
    builder::KmerComparer, cli::Args, counter::Strand, error::BuilderError, reader::ReadMode,
};

fn main() {
    #[cfg(feature = "tracing")]
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    if !args.quiet {
        print_banner(&args);
    }

    if let Err(e) = run(&args) {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), BuilderError> {
    let mut comparer = KmerComparer::new()
        .k_validated(args.kmer_size)
        .metric(args.metric)
        .format(args.format)
        .top(args.top);
    if args.canonical {
        comparer = comparer.strand(Strand::Canonical);
    }
    if args.strict {
        comparer = comparer.read_mode(ReadMode::Strict);
    }
    if let Some(id) = &args.reference_id {
        comparer = comparer.reference_id(id.as_str());
    }

    comparer.compare_to_writer(&args.reference, &args.reads, BufWriter::new(stdout().lock()))
}

fn print_banner(args: &Args) {
    eprintln!(
        "{}",
        concat!("kmercompare v", env!("CARGO_PKG_VERSION")).bold()
    );
    eprintln!(
        "{}: {}",
        "k-mer size".bold(),
        args.kmer_size.to_string().blue().bold()
    );
    eprintln!(
        "{}: {}",
        "possible k-mers".bold(),
        args.kmer_size.table_size().to_string().blue()
    );
    eprintln!(
        "{}: {}",
        "reference".bold(),
        args.reference.display().to_string().underline().blue()
    );
    if let Some(id) = &args.reference_id {
        eprintln!("{}: {}", "reference id".bold(), id.blue());
    }
    eprintln!(
        "{}: {}",
        "reads".bold(),
        args.reads.display().to_string().underline().blue()
    );
    eprintln!();
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}
