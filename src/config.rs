//! Conversion options

use crate::base::constants::EXCLUDED_DIRS;

/// Options controlling one conversion run.
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Maximum number of units translated at the same time.
    pub max_workers: usize,
    /// Completed outcomes buffered ahead of the consumer before workers block.
    pub channel_capacity: usize,
    /// Directory names skipped by workspace loading, discovery and validation.
    pub excluded_dirs: Vec<String>,
    /// Materialize outcomes that carry diagnostics (partial output).
    pub write_failed_outputs: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            max_workers: workers,
            channel_capacity: workers * 4,
            excluded_dirs: EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            write_failed_outputs: false,
        }
    }
}

impl ConversionOptions {
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_write_failed_outputs(mut self, enabled: bool) -> Self {
        self.write_failed_outputs = enabled;
        self
    }
}
