//! Thresholds deciding when matrix products run column-parallel.
//!
//! Small products are faster sequentially; the column-parallel path only pays
//! off once every worker thread has a few thousand multiply-adds to do. The
//! threshold is expressed in scalar multiply-adds (`m * n * k`) and scales
//! with the number of rayon threads.
//!
//! Both paths evaluate each output column with the same kernel, so the choice
//! never changes the numerical result.

use std::sync::OnceLock;

/// Global configuration for parallel thresholds
static GLOBAL_CONFIG: OnceLock<ParallelThresholds> = OnceLock::new();

/// Configuration for parallel execution thresholds
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelThresholds {
    /// Minimum number of multiply-adds (`m * n * k`) for a parallel product
    pub product_threshold: usize,

    /// Minimum number of output columns for a parallel product
    pub min_columns: usize,

    /// Number of available threads (cached)
    pub num_threads: usize,
}

impl Default for ParallelThresholds {
    fn default() -> Self {
        let num_threads = rayon::current_num_threads();

        // 64x64x64 product on a single thread
        let base_product = 262_144;

        // More threads = higher overhead = need larger problems
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let product_threshold = (base_product as f64 * (num_threads as f64).sqrt()) as usize;

        Self {
            product_threshold,
            min_columns: 2,
            num_threads,
        }
    }
}

impl ParallelThresholds {
    /// Check if an `(m x k) * (k x n)` product should be computed in parallel.
    pub fn should_parallelize_product(&self, m: usize, n: usize, k: usize) -> bool {
        if !cfg!(feature = "parallel") || self.num_threads <= 1 || n < self.min_columns {
            return false;
        }
        m.saturating_mul(n).saturating_mul(k) >= self.product_threshold
    }

    /// Thresholds that never parallelize.
    pub fn sequential() -> Self {
        Self {
            product_threshold: usize::MAX,
            min_columns: usize::MAX,
            num_threads: 1,
        }
    }
}

/// Builder for customizing parallel thresholds
#[derive(Debug, Clone, Default)]
pub struct ParallelThresholdsBuilder {
    config: ParallelThresholds,
}

impl ParallelThresholdsBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the product threshold in multiply-adds
    pub fn product_threshold(mut self, threshold: usize) -> Self {
        self.config.product_threshold = threshold;
        self
    }

    /// Set the minimum number of output columns
    pub fn min_columns(mut self, columns: usize) -> Self {
        self.config.min_columns = columns;
        self
    }

    /// Override the thread count used in decisions
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ParallelThresholds {
        self.config
    }
}

/// Get the global parallel thresholds configuration
pub fn parallel_thresholds() -> &'static ParallelThresholds {
    GLOBAL_CONFIG.get_or_init(ParallelThresholds::default)
}

/// Set custom parallel thresholds.
///
/// Only the first call before any product is computed takes effect; the
/// rejected configuration is handed back otherwise.
pub fn set_parallel_thresholds(config: ParallelThresholds) -> Result<(), ParallelThresholds> {
    GLOBAL_CONFIG.set(config)
}
