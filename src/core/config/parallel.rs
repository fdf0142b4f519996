//! Parallel processing configuration.

use serde::{Deserialize, Serialize};

use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;

/// Controls when batch detection fans out across the rayon thread pool.
///
/// A single detection call is always sequential; only independent bitmaps of
/// a batch run in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of threads to use for batch detection.
    /// If None, rayon's global pool is used.
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Batches with at most this many bitmaps run sequentially.
    #[serde(default = "ParallelPolicy::default_batch_threshold")]
    pub batch_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the batch threshold.
    pub fn with_batch_threshold(mut self, threshold: usize) -> Self {
        self.batch_threshold = threshold;
        self
    }

    fn default_batch_threshold() -> usize {
        DEFAULT_PARALLEL_THRESHOLD
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            batch_threshold: Self::default_batch_threshold(),
        }
    }
}
