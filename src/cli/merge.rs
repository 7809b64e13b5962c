// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.alignment.is_none() {
            self.alignment = config.alignment;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.data_output.is_none() {
            self.data_output = config.data_output;
        }
        if self.histogram.is_none() {
            self.histogram = config.histogram;
        }
        if self.json.is_none() {
            self.json = config.json;
        }

        // Report settings
        if self.bins.is_none() {
            self.bins = config.bins;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }
        if self.batch_size.is_none() {
            self.batch_size = config.batch_size;
        }

        // Flags (config only sets if not explicitly set)
        if !self.no_histogram && config.no_histogram.unwrap_or(false) {
            self.no_histogram = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }
        if !self.no_progress && config.no_progress.unwrap_or(false) {
            self.no_progress = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
