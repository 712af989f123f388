//! Accumulator implementations for sparse matrix multiplication
//!
//! An accumulator collects the partial products `A[i][k] * B[k][j]` of one
//! output row, merges contributions to the same column, and drains the
//! merged row in ascending column order. One accumulator is reused for
//! every row a worker computes and is never shared between workers.

pub mod dense;
pub mod sort;

use num_traits::Num;
use std::ops::AddAssign;

/// Trait for accumulators that handle intermediate products in SpGEMM
///
/// Different implementations trade memory for speed; all of them produce
/// the same row up to floating-point summation order.
pub trait Accumulator<T>
where
    T: Copy + Num + AddAssign,
{
    /// Discard everything accumulated since the last drain
    fn reset(&mut self);

    /// Accumulate a single entry (column and value)
    ///
    /// `col` must be below [`width`](Accumulator::width) when that is bounded.
    fn accumulate(&mut self, col: usize, val: T);

    /// Exclusive upper bound on the columns this accumulator can hold,
    /// or `None` if it grows with its input
    fn width(&self) -> Option<usize> {
        None
    }

    /// Append the accumulated entries to `col_idx`/`values` sorted by column,
    /// skipping columns whose sum is exactly zero, then reset
    ///
    /// Returns the number of entries appended.
    fn drain_into(&mut self, col_idx: &mut Vec<usize>, values: &mut Vec<T>) -> usize;
}

pub use dense::DenseAccumulator;
pub use sort::SortAccumulator;
