//! Centralized constants for the gustav sparse matrix multiplication library
//!
//! All new constants should be added here rather than scattered throughout the code.

// ============================================================================
// ACCUMULATOR THRESHOLDS
// ============================================================================

/// Output width (columns of B) up to which the dense accumulator is used
///
/// A dense scratch row of this many `f64` values is 8 MiB per worker.
pub const DEFAULT_DENSE_ACCUM_THRESHOLD: usize = 1 << 20;

/// Divisor for initial capacity calculation in the sort accumulator
pub const INITIAL_CAPACITY_DIVISOR: usize = 10;

/// Maximum initial capacity for sort accumulator
pub const MAX_SORT_ACCUMULATOR_CAPACITY: usize = 1024;

// ============================================================================
// VERIFICATION
// ============================================================================

/// Absolute tolerance when comparing SpGEMM output with the dense reference
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

// ============================================================================
// TEST-MATRIX GENERATION
// ============================================================================

/// Seed used by the benchmark harness when none is given
pub const DEFAULT_SEED: u64 = 2025;

/// Largest value a generated non-zero cell can take (smallest is 1)
pub const MAX_GENERATED_VALUE: u32 = 10;

// ============================================================================
// DISPLAY
// ============================================================================

/// Maximum rows shown by the `Debug` sample of a matrix
pub const MAX_DISPLAY_ROWS: usize = 5;

/// Maximum entries per row shown by the `Debug` sample of a matrix
pub const MAX_DISPLAY_ELEMENTS_PER_ROW: usize = 5;

/// Percentage conversion factor
pub const PERCENTAGE_CONVERSION_FACTOR: f64 = 100.0;
