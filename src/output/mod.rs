// mod.rs - Report writers

pub mod events;
pub mod histogram;

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::Serialize;
use crate::core::{DistanceSummary, PairwiseStatistics};

pub use events::write_events_csv;
pub use histogram::write_histogram;

/// Placeholder written in place of undefined statistics
pub const NO_DATA: &str = "no data";

/// Histogram path next to the summary report: `results.txt` becomes
/// `results_histogram.png`, any other name gets the suffix appended
pub fn derive_histogram_path(output: &str) -> String {
    match output.strip_suffix(".txt") {
        Some(stem) => format!("{}_histogram.png", stem),
        None => format!("{}_histogram.png", output),
    }
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)
                .map_err(|e| format!("Failed to create parent directory '{}': {}", parent.display(), e))?;
        }
    }
    Ok(())
}

fn write_text(file_path: &str, content: &str) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .map_err(|e| format!("Write error on '{}': {}", file_path, e))?;
    writer.flush().map_err(|e| format!("Flush error on '{}': {}", file_path, e))?;
    Ok(())
}

/// Render the summary report
pub fn format_summary(alignment_file: &str, summary: &DistanceSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Alignment File: {}\n", alignment_file));

    match &summary.statistics {
        PairwiseStatistics::Available(stats) => {
            out.push_str(&format!("Median Pairwise Nucleotide Difference: {:.4}\n", stats.median_mismatch));
            out.push_str(&format!(
                "Interquartile Range (IQR): ({:.4}, {:.4})\n",
                stats.lower_quartile, stats.upper_quartile
            ));
            out.push_str(&format!(
                "Median Pairwise Divergence (normalized by valid sites): {:.4}\n",
                stats.median_divergence
            ));
            out.push_str(&format!("Total Valid Sites: {}\n\n", stats.total_valid_sites));
        }
        PairwiseStatistics::NoData(_) => {
            out.push_str(&format!("Median Pairwise Nucleotide Difference: {}\n", NO_DATA));
            out.push_str(&format!("Interquartile Range (IQR): {}\n", NO_DATA));
            out.push_str(&format!("Median Pairwise Divergence (normalized by valid sites): {}\n", NO_DATA));
            out.push_str(&format!("Total Valid Sites: {}\n\n", summary.total_valid_sites));
        }
    }

    out.push_str("Pairwise Differences:\n");
    out.push_str(&format_raw_differences(summary));
    out
}

/// Audit lines only, newline separated
pub fn format_raw_differences(summary: &DistanceSummary) -> String {
    summary.report_lines().join("\n")
}

/// Write the summary report
pub fn write_summary(file_path: &str, alignment_file: &str, summary: &DistanceSummary) -> Result<(), String> {
    write_text(file_path, &format_summary(alignment_file, summary))?;
    println!("✅ Results saved to {}", file_path);
    Ok(())
}

/// Write the per-pair audit lines
pub fn write_raw_differences(file_path: &str, summary: &DistanceSummary) -> Result<(), String> {
    write_text(file_path, &format_raw_differences(summary))?;
    println!("✅ Raw pairwise differences saved to {}", file_path);
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    tool: &'static str,
    version: &'static str,
    generated: String,
    alignment_file: &'a str,
    #[serde(flatten)]
    summary: &'a DistanceSummary<'a>,
}

/// Write a machine-readable summary including every included pair
pub fn write_json_summary(file_path: &str, alignment_file: &str, summary: &DistanceSummary) -> Result<(), String> {
    let report = JsonReport {
        tool: "ntdiff",
        version: env!("CARGO_PKG_VERSION"),
        generated: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        alignment_file,
        summary,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to serialize JSON summary: {}", e))?;
    write_text(file_path, &json)?;
    println!("✅ JSON summary saved to {}", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DistanceAggregator;
    use crate::data::SequenceStore;

    #[test]
    fn test_summary_format_matches_report_layout() {
        let store = SequenceStore::from_pairs([("S1", "ACGT"), ("S2", "ACGA"), ("S3", "ACNT")]).unwrap();
        let summary = DistanceAggregator::new(&store).aggregate().unwrap();

        let expected = "Alignment File: aln.fasta\n\
Median Pairwise Nucleotide Difference: 1.0000\n\
Interquartile Range (IQR): (0.5000, 1.0000)\n\
Median Pairwise Divergence (normalized by valid sites): 0.2500\n\
Total Valid Sites: 10\n\
\n\
Pairwise Differences:\n\
S1 - S2: Differences=1, Valid Sites=4\n\
S1 - S3: Differences=0, Valid Sites=3\n\
S2 - S3: Differences=1, Valid Sites=3";
        assert_eq!(format_summary("aln.fasta", &summary), expected);
        assert_eq!(
            format_raw_differences(&summary),
            "S1 - S2: Differences=1, Valid Sites=4\nS1 - S3: Differences=0, Valid Sites=3\nS2 - S3: Differences=1, Valid Sites=3"
        );
    }

    #[test]
    fn test_summary_without_data() {
        let store = SequenceStore::from_pairs([("only", "ACGT")]).unwrap();
        let summary = DistanceAggregator::new(&store).aggregate().unwrap();
        let text = format_summary("single.fasta", &summary);

        assert!(text.contains("Median Pairwise Nucleotide Difference: no data\n"));
        assert!(text.contains("Interquartile Range (IQR): no data\n"));
        assert!(text.contains("Median Pairwise Divergence (normalized by valid sites): no data\n"));
        assert!(text.contains("Total Valid Sites: 0\n"));
        assert!(text.ends_with("Pairwise Differences:\n"));
        assert!(!text.contains("0.0000"));
    }

    #[test]
    fn test_derive_histogram_path() {
        assert_eq!(
            derive_histogram_path("pairwise_nucleotide_diff_results.txt"),
            "pairwise_nucleotide_diff_results_histogram.png"
        );
        assert_eq!(derive_histogram_path("out/report"), "out/report_histogram.png");
        assert_eq!(derive_histogram_path("report.tsv"), "report.tsv_histogram.png");
    }

    #[test]
    fn test_writers_create_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = SequenceStore::from_pairs([("a", "ACGT"), ("b", "ACGG")]).unwrap();
        let summary = DistanceAggregator::new(&store).aggregate().unwrap();

        let summary_path = dir.path().join("nested/out/results.txt");
        let raw_path = dir.path().join("raw.txt");
        let json_path = dir.path().join("summary.json");

        write_summary(summary_path.to_str().unwrap(), "in.fasta", &summary).unwrap();
        write_raw_differences(raw_path.to_str().unwrap(), &summary).unwrap();
        write_json_summary(json_path.to_str().unwrap(), "in.fasta", &summary).unwrap();

        let raw = std::fs::read_to_string(&raw_path).unwrap();
        assert_eq!(raw, "a - b: Differences=1, Valid Sites=4");
        assert!(std::fs::read_to_string(&summary_path).unwrap().starts_with("Alignment File: in.fasta\n"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["tool"], "ntdiff");
        assert_eq!(json["comparisons"], 1);
        assert_eq!(json["pairs"][0]["id1"], "a");
        assert_eq!(json["statistics"]["available"]["median_mismatch"], 1.0);
    }
}
