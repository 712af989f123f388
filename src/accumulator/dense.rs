//! Dense accumulator implementation for SpGEMM
//!
//! Gustavson's scratch-row accumulator: a dense array as wide as the output
//! row, plus the list of columns touched so that draining and resetting cost
//! time proportional to the row's non-zeros rather than its width.

use num_traits::Num;
use std::ops::AddAssign;

use crate::accumulator::Accumulator;

/// Dense accumulator for rows of sparse matrix multiplication
pub struct DenseAccumulator<T> {
    /// The dense accumulation array
    values: Vec<T>,

    /// Flags to track which positions in the dense array are in use
    occupied: Vec<bool>,

    /// Columns touched since the last drain, in first-touch order
    col_indices: Vec<usize>,
}

impl<T> DenseAccumulator<T>
where
    T: Copy + Num + AddAssign,
{
    /// Create a new dense accumulator with specified column capacity
    ///
    /// # Arguments
    ///
    /// * `n_cols` - The number of columns in the output matrix (C)
    pub fn new(n_cols: usize) -> Self {
        Self {
            values: vec![T::zero(); n_cols],
            occupied: vec![false; n_cols],
            col_indices: Vec::new(),
        }
    }

    /// Width of the scratch row
    pub fn n_cols(&self) -> usize {
        self.values.len()
    }
}

impl<T> Accumulator<T> for DenseAccumulator<T>
where
    T: Copy + Num + AddAssign,
{
    fn reset(&mut self) {
        for &col in &self.col_indices {
            self.occupied[col] = false;
        }
        self.col_indices.clear();
    }

    fn width(&self) -> Option<usize> {
        Some(self.n_cols())
    }

    fn accumulate(&mut self, col: usize, val: T) {
        if !self.occupied[col] {
            // First time seeing this column, mark it and add to indices
            self.occupied[col] = true;
            self.col_indices.push(col);
            self.values[col] = val;
        } else {
            self.values[col] += val;
        }
    }

    fn drain_into(&mut self, col_idx: &mut Vec<usize>, values: &mut Vec<T>) -> usize {
        self.col_indices.sort_unstable();

        let before = col_idx.len();
        for &col in &self.col_indices {
            let val = self.values[col];
            if !val.is_zero() {
                col_idx.push(col);
                values.push(val);
            }
        }

        self.reset();
        col_idx.len() - before
    }
}
