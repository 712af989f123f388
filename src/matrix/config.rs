//! Configuration and system parameters for SpGEMM

use crate::constants::DEFAULT_DENSE_ACCUM_THRESHOLD;

/// System parameters for performance tuning
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Number of worker threads for the parallel engine
    pub n_threads: usize,

    /// Ceiling on worker threads, whatever `n_threads` asks for
    pub max_threads: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        let cores = num_cpus::get();
        Self {
            n_threads: cores, // Use all available cores
            max_threads: cores,
        }
    }
}

/// Which row accumulator a multiplication uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorKind {
    /// Dense scratch row as wide as the output
    Dense,
    /// Unsorted pair list, sorted and merged on drain
    Sort,
}

/// Configuration for sequential and parallel SpGEMM
#[derive(Debug, Clone)]
pub struct SpgemmConfig {
    /// System parameters for performance tuning
    pub system_params: SystemParameters,

    /// Largest output width for which the dense accumulator is chosen
    pub dense_accum_threshold: usize,
}

impl Default for SpgemmConfig {
    fn default() -> Self {
        Self {
            system_params: SystemParameters::default(),
            dense_accum_threshold: DEFAULT_DENSE_ACCUM_THRESHOLD,
        }
    }
}

impl SpgemmConfig {
    /// Sets the number of worker threads; zero is treated as one
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.system_params.n_threads = n_threads.max(1);
        self
    }

    /// Sets the dense accumulator threshold
    pub fn with_dense_threshold(mut self, threshold: usize) -> Self {
        self.dense_accum_threshold = threshold;
        self
    }

    /// Picks the accumulator for an output row of `n_cols` columns
    pub fn accumulator_for(&self, n_cols: usize) -> AccumulatorKind {
        if n_cols <= self.dense_accum_threshold {
            AccumulatorKind::Dense
        } else {
            AccumulatorKind::Sort
        }
    }

    /// Number of workers for `n_rows` output rows
    ///
    /// Clamped to `[1, min(n_rows, max_threads)]`, so an oversized request
    /// never spawns more threads than the hardware offers.
    pub fn worker_count(&self, n_rows: usize) -> usize {
        let ceiling = n_rows.min(self.system_params.max_threads).max(1);
        self.system_params.n_threads.clamp(1, ceiling)
    }
}
