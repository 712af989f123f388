//! Sort-based accumulator implementation for SpGEMM
//!
//! Collects intermediate products in an unsorted list, then sorts and merges
//! duplicate columns on drain. Memory grows with the row's intermediate
//! products instead of the output width, which suits very wide outputs.

use num_traits::Num;
use std::ops::AddAssign;

use crate::accumulator::Accumulator;

/// Sort-based accumulator for rows of sparse matrix multiplication
pub struct SortAccumulator<T> {
    /// Intermediate products as (column, value), in arrival order
    entries: Vec<(usize, T)>,
}

impl<T> SortAccumulator<T>
where
    T: Copy + Num + AddAssign,
{
    /// Create a new sort-based accumulator
    ///
    /// # Arguments
    ///
    /// * `initial_capacity` - Initial capacity for the temporary storage
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(initial_capacity),
        }
    }
}

impl<T> Accumulator<T> for SortAccumulator<T>
where
    T: Copy + Num + AddAssign,
{
    fn reset(&mut self) {
        self.entries.clear();
    }

    fn accumulate(&mut self, col: usize, val: T) {
        self.entries.push((col, val));
    }

    fn drain_into(&mut self, col_idx: &mut Vec<usize>, values: &mut Vec<T>) -> usize {
        let before = col_idx.len();

        // Stable, so equal columns are summed in arrival order
        self.entries.sort_by_key(|&(col, _)| col);

        let mut iter = self.entries.iter().copied();
        if let Some((mut current_col, mut current_val)) = iter.next() {
            for (col, val) in iter {
                if col == current_col {
                    current_val += val;
                } else {
                    if !current_val.is_zero() {
                        col_idx.push(current_col);
                        values.push(current_val);
                    }
                    current_col = col;
                    current_val = val;
                }
            }

            if !current_val.is_zero() {
                col_idx.push(current_col);
                values.push(current_val);
            }
        }

        self.reset();
        col_idx.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(acc: &mut SortAccumulator<f64>) -> (Vec<usize>, Vec<f64>) {
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        acc.drain_into(&mut cols, &mut vals);
        (cols, vals)
    }

    #[test]
    fn test_sort_accumulator_empty() {
        let mut accumulator = SortAccumulator::<f64>::new(5);

        let (col_indices, values) = drain(&mut accumulator);

        assert!(col_indices.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_sort_accumulator_merges_and_sorts() {
        let mut accumulator = SortAccumulator::<f64>::new(5);

        accumulator.accumulate(3, 1.0);
        accumulator.accumulate(1, 2.0);
        accumulator.accumulate(3, 3.0);
        accumulator.accumulate(0, 4.0);
        accumulator.accumulate(1, 5.0);

        let (col_indices, values) = drain(&mut accumulator);

        assert_eq!(col_indices, vec![0, 1, 3]);
        assert_eq!(values, vec![4.0, 7.0, 4.0]);
    }

    #[test]
    fn test_sort_accumulator_cancellation_dropped() {
        let mut accumulator = SortAccumulator::<f64>::new(4);

        accumulator.accumulate(0, 2.0);
        accumulator.accumulate(0, -2.0);
        accumulator.accumulate(5, 1.0);
        accumulator.accumulate(5, -1.0);

        let (col_indices, values) = drain(&mut accumulator);

        assert!(col_indices.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_sort_accumulator_reuse() {
        let mut accumulator = SortAccumulator::<f64>::new(2);

        accumulator.accumulate(4, 1.0);
        assert_eq!(drain(&mut accumulator), (vec![4], vec![1.0]));

        accumulator.accumulate(2, 6.0);
        assert_eq!(drain(&mut accumulator), (vec![2], vec![6.0]));
    }
}
