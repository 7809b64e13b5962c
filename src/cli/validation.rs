// validation.rs - Input validation utilities

use std::collections::HashSet;
use std::path::Path;
use crate::cli::args::Args;
use crate::core::DEFAULT_BATCH_SIZE;
use crate::output::derive_histogram_path;

pub const DEFAULT_OUTPUT: &str = "pairwise_nucleotide_diff_results.txt";
pub const DEFAULT_DATA_OUTPUT: &str = "pairwise_differences.txt";
pub const DEFAULT_BINS: usize = 20;

/// Settings resolved from the command line and configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub alignment: String,
    pub output: String,
    pub data_output: String,
    /// `None` when the histogram is disabled
    pub histogram: Option<String>,
    pub json: Option<String>,
    pub bins: usize,
    pub batch_size: usize,
    pub threads: Option<usize>,
    pub show_progress: bool,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    let alignment = args
        .alignment
        .clone()
        .ok_or_else(|| "No alignment file given (positional argument or 'alignment' in --config)".to_string())?;
    if !Path::new(&alignment).is_file() {
        return Err(format!("Alignment file '{}' does not exist", alignment));
    }

    let bins = args.bins.unwrap_or(DEFAULT_BINS);
    if bins == 0 {
        return Err("--bins must be at least 1".to_string());
    }

    let batch_size = args.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
    if batch_size == 0 {
        return Err("--batch-size must be at least 1".to_string());
    }

    if args.threads == Some(0) {
        return Err("--threads must be at least 1".to_string());
    }

    if args.no_histogram && args.histogram.is_some() {
        return Err("--histogram cannot be combined with --no-histogram".to_string());
    }

    let output = args.output.clone().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let data_output = args.data_output.clone().unwrap_or_else(|| DEFAULT_DATA_OUTPUT.to_string());
    let histogram = if args.no_histogram {
        None
    } else {
        Some(args.histogram.clone().unwrap_or_else(|| derive_histogram_path(&output)))
    };
    if let Some(path) = &histogram {
        if !path.to_ascii_lowercase().ends_with(".png") {
            return Err(format!("Histogram file '{}' must have a .png extension", path));
        }
    }

    // Output files must not overwrite each other or the input
    let mut seen = HashSet::new();
    seen.insert(alignment.as_str());
    let outputs = [Some(&output), Some(&data_output), histogram.as_ref(), args.json.as_ref()];
    for path in outputs.into_iter().flatten() {
        if !seen.insert(path.as_str()) {
            return Err(format!("Output path '{}' is used more than once", path));
        }
    }

    Ok(ValidationResult {
        alignment,
        output,
        data_output,
        histogram,
        json: args.json.clone(),
        bins,
        batch_size,
        threads: args.threads,
        show_progress: !args.no_progress,
    })
}
