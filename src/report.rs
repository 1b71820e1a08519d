//! Report formatting.
//!
//! The text format is for people, TSV is one header line plus one value line
//! for collecting many runs into a table, and JSON carries every field.

use std::io::{self, Write};

use crate::{
    abundance::KmerAbundance, cli::OutputFormat, counter::CountStats, error::KmerCompareError,
    run::Comparison, table::TableSummary,
};

/// Writes a comparison report and flushes the writer.
///
/// # Errors
///
/// Returns [`KmerCompareError::WriteError`] if the writer fails and
/// [`KmerCompareError::JsonError`] if serialization fails.
pub fn write_report<W: Write>(
    comparison: &Comparison,
    format: OutputFormat,
    mut writer: W,
) -> Result<(), KmerCompareError> {
    match format {
        OutputFormat::Text => write_text(comparison, &mut writer)?,
        OutputFormat::Tsv => write_tsv(comparison, &mut writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, comparison)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn write_text<W: Write>(c: &Comparison, w: &mut W) -> io::Result<()> {
    if let Some(id) = &c.reference_id {
        line(w, "reference id", id)?;
    }
    line(w, "reference", &c.reference)?;
    line(w, "reads", &c.reads)?;
    line(w, "k", c.k)?;
    line(w, "strand", c.strand)?;
    line(w, "metric", c.result.metric)?;

    let label = if c.result.metric.is_similarity() {
        "similarity"
    } else {
        "distance"
    };
    line(w, label, format!("{:.6}", c.result.value))?;

    table_lines(w, "reference", &c.result.reference, &c.reference_stats)?;
    table_lines(w, "reads", &c.result.reads, &c.reads_stats)?;

    abundance_lines(w, "over-represented in reads", &c.over_represented)?;
    abundance_lines(w, "under-represented in reads", &c.under_represented)?;
    Ok(())
}

fn line<W: Write>(w: &mut W, label: &str, value: impl std::fmt::Display) -> io::Result<()> {
    writeln!(w, "{label:<20}{value}")
}

fn table_lines<W: Write>(
    w: &mut W,
    name: &str,
    summary: &TableSummary,
    stats: &CountStats,
) -> io::Result<()> {
    line(w, &format!("{name} records"), stats.records)?;
    line(
        w,
        &format!("{name} k-mers"),
        format!(
            "{} ({} distinct, {} zero bins)",
            summary.total_kmers, summary.distinct_kmers, summary.zero_bins
        ),
    )?;
    line(
        w,
        &format!("{name} counts"),
        format!(
            "mean {:.3}, mode {} ({} k-mers)",
            summary.mean_count, summary.mode_count, summary.mode_frequency
        ),
    )?;
    line(w, &format!("{name} skipped"), stats.skipped_windows)?;
    if stats.skipped_lines > 0 {
        line(w, &format!("{name} preamble"), stats.skipped_lines)?;
    }
    Ok(())
}

fn abundance_lines<W: Write>(w: &mut W, title: &str, entries: &[KmerAbundance]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{title}")?;
    writeln!(w, "{:<12}{:>10}{:>10}{:>10}", "kmer", "ref %", "reads %", "diff %")?;
    for e in entries {
        writeln!(
            w,
            "{:<12}{:>10.3}{:>10.3}{:>10.3}",
            e.kmer, e.reference_percent, e.reads_percent, e.difference
        )?;
    }
    Ok(())
}

fn write_tsv<W: Write>(c: &Comparison, w: &mut W) -> io::Result<()> {
    writeln!(
        w,
        "reference_id\treference\treads\tk\tstrand\tmetric\tvalue\t\
         reference_kmers\treads_kmers\treference_distinct\treads_distinct\t\
         reference_mean_count\treads_mean_count\treference_mode_count\treads_mode_count\t\
         reference_skipped\treads_skipped\treference_preamble\treads_preamble"
    )?;
    writeln!(
        w,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        c.reference_id.as_deref().unwrap_or(""),
        c.reference,
        c.reads,
        c.k,
        c.strand,
        c.result.metric,
        c.result.value,
        c.result.reference.total_kmers,
        c.result.reads.total_kmers,
        c.result.reference.distinct_kmers,
        c.result.reads.distinct_kmers,
        c.result.reference.mean_count,
        c.result.reads.mean_count,
        c.result.reference.mode_count,
        c.result.reads.mode_count,
        c.reference_stats.skipped_windows,
        c.reads_stats.skipped_windows,
        c.reference_stats.skipped_lines,
        c.reads_stats.skipped_lines,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compare::{ComparisonResult, Metric},
        counter::Strand,
        kmer::KmerLength,
    };

    fn comparison() -> Comparison {
        let summary = TableSummary {
            total_kmers: 7,
            distinct_kmers: 4,
            zero_bins: 12,
            mode_count: 1,
            mode_frequency: 3,
            mean_count: 1.75,
        };
        let stats = CountStats {
            records: 1,
            bases: 8,
            windows: 7,
            skipped_windows: 0,
            skipped_lines: 0,
        };
        Comparison {
            reference_id: Some("chr1".to_string()),
            reference: "ref.fa".to_string(),
            reads: "reads.fa".to_string(),
            k: KmerLength::relaxed(2).unwrap(),
            strand: Strand::Forward,
            result: ComparisonResult {
                metric: Metric::Cosine,
                value: 1.0,
                reference: summary,
                reads: summary,
            },
            reference_stats: stats,
            reads_stats: stats,
            over_represented: Vec::new(),
            under_represented: Vec::new(),
        }
    }

    fn render(comparison: &Comparison, format: OutputFormat) -> String {
        let mut out = Vec::new();
        write_report(comparison, format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_report() {
        insta::assert_snapshot!(render(&comparison(), OutputFormat::Text), @r"
        reference id        chr1
        reference           ref.fa
        reads               reads.fa
        k                   2
        strand              forward
        metric              cosine
        similarity          1.000000
        reference records   1
        reference k-mers    7 (4 distinct, 12 zero bins)
        reference counts    mean 1.750, mode 1 (3 k-mers)
        reference skipped   0
        reads records       1
        reads k-mers        7 (4 distinct, 12 zero bins)
        reads counts        mean 1.750, mode 1 (3 k-mers)
        reads skipped       0
        ");
    }

    #[test]
    fn text_report_labels_distances() {
        let mut c = comparison();
        c.reference_id = None;
        c.result.metric = Metric::JensenShannon;
        c.result.value = 0.25;
        let text = render(&c, OutputFormat::Text);
        assert!(text.starts_with("reference           ref.fa\n"));
        assert!(text.contains("metric              jensen-shannon\n"));
        assert!(text.contains("distance            0.250000\n"));
    }

    #[test]
    fn text_report_with_abundance_tables() {
        let mut c = comparison();
        c.over_represented = vec![KmerAbundance {
            kmer: "CC".to_string(),
            key: 5,
            reference_percent: 0.0,
            reads_percent: 50.0,
            difference: 50.0,
        }];
        c.under_represented = vec![KmerAbundance {
            kmer: "AA".to_string(),
            key: 0,
            reference_percent: 75.0,
            reads_percent: 25.0,
            difference: -50.0,
        }];
        let text = render(&c, OutputFormat::Text);
        assert!(text.contains(
            "\nover-represented in reads\n\
             kmer             ref %   reads %    diff %\n\
             CC               0.000    50.000    50.000\n"
        ));
        assert!(text.ends_with(
            "\nunder-represented in reads\n\
             kmer             ref %   reads %    diff %\n\
             AA              75.000    25.000   -50.000\n"
        ));
    }

    #[test]
    fn tsv_report() {
        let text = render(&comparison(), OutputFormat::Tsv);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let header: Vec<_> = lines[0].split('\t').collect();
        let values: Vec<_> = lines[1].split('\t').collect();
        assert_eq!(header.len(), values.len());
        assert_eq!(header[0], "reference_id");
        assert_eq!(values[0], "chr1");
        assert_eq!(values[3], "2");
        assert_eq!(values[5], "cosine");
        assert_eq!(values[6], "1");
        assert_eq!(values[header.iter().position(|&h| h == "reads_mean_count").unwrap()], "1.75");
        assert_eq!(values[header.iter().position(|&h| h == "reads_preamble").unwrap()], "0");
    }

    #[test]
    fn text_report_shows_preamble_only_when_skipped() {
        let mut c = comparison();
        assert!(!render(&c, OutputFormat::Text).contains("preamble"));

        c.reference_stats.skipped_lines = 2;
        let text = render(&c, OutputFormat::Text);
        assert!(text.contains("reference skipped   0\nreference preamble  2\nreads records"));
        assert!(!text.contains("reads preamble"));
    }

    #[test]
    fn json_report() {
        let text = render(&comparison(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["reference_id"], "chr1");
        assert_eq!(value["k"], 2);
        assert_eq!(value["strand"], "forward");
        assert_eq!(value["result"]["metric"], "cosine");
        assert_eq!(value["result"]["reference"]["zero_bins"], 12);
        assert_eq!(value["reads_stats"]["windows"], 7);
        assert_eq!(value["reads_stats"]["skipped_lines"], 0);
        assert_eq!(value["result"]["reads"]["mode_frequency"], 3);
        assert_eq!(value["result"]["reads"]["mean_count"], 1.75);
        assert!(value.get("over_represented").is_none());
    }

    #[test]
    fn json_abundance_entries_omit_key() {
        let mut c = comparison();
        c.over_represented = vec![KmerAbundance {
            kmer: "CC".to_string(),
            key: 5,
            reference_percent: 0.0,
            reads_percent: 50.0,
            difference: 50.0,
        }];
        let value: serde_json::Value =
            serde_json::from_str(&render(&c, OutputFormat::Json)).unwrap();
        assert_eq!(value["over_represented"][0]["kmer"], "CC");
        assert!(value["over_represented"][0].get("key").is_none());
    }
}
