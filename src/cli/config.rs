// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub alignment: Option<String>,
    pub output: Option<String>,
    pub data_output: Option<String>,
    pub histogram: Option<String>,
    pub json: Option<String>,

    // Report settings
    pub bins: Option<usize>,
    pub no_histogram: Option<bool>,

    // Performance
    pub threads: Option<usize>,
    pub batch_size: Option<usize>,

    // Flags
    pub dry_run: Option<bool>,
    pub no_progress: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# ntdiff.toml - Configuration file for ntdiff
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# FASTA alignment (all sequences must have the same length)
alignment = "/path/to/alignment.fasta"

# Summary report with statistics and one line per pair
output = "pairwise_nucleotide_diff_results.txt"

# Raw pairwise differences, one line per pair
data_output = "pairwise_differences.txt"

# Histogram PNG (default: summary file name with _histogram.png)
# histogram = "histogram.png"

# Machine-readable summary
# json = "summary.json"

# =============================================================================
# REPORT SETTINGS
# =============================================================================

# Number of histogram bins
bins = 20

# Skip the histogram entirely
no_histogram = false

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# Pairs compared per parallel batch
batch_size = 4096

# =============================================================================
# FLAGS
# =============================================================================

# Load and validate the alignment without comparing
dry_run = false

# Hide the progress bar
no_progress = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::generate_sample()).unwrap();
        assert_eq!(config.alignment.as_deref(), Some("/path/to/alignment.fasta"));
        assert_eq!(config.bins, Some(20));
        assert_eq!(config.batch_size, Some(4096));
        assert_eq!(config.threads, None);
        assert_eq!(config.dry_run, Some(false));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ntdiff.toml");
        let config = Config {
            output: Some("report.txt".to_string()),
            threads: Some(4),
            no_progress: Some(true),
            ..Config::new()
        };

        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "bins = \"many\"").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.contains("Failed to parse config file"));
        assert!(err.contains("bad.toml"));
    }
}
