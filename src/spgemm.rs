//! # Sequential SpGEMM
//!
//! Row-wise accumulation (Gustavson's method): for each output row `i`,
//! every non-zero `A[i][k]` scales row `k` of `B` into an accumulator,
//! which is then drained into row `i` of `C` in ascending column order.
//!
//! The row-range kernel here is also what each parallel worker runs.

use log::debug;
use num_traits::Num;
use std::ops::{AddAssign, Range};

use crate::accumulator::{Accumulator, DenseAccumulator, SortAccumulator};
use crate::constants::{INITIAL_CAPACITY_DIVISOR, MAX_SORT_ACCUMULATOR_CAPACITY};
use crate::error::{Result, SpgemmError};
use crate::matrix::{AccumulatorKind, SparseMatrixCSR, SpgemmConfig};
use crate::utils::exclusive_scan;

/// Output rows computed for a contiguous range of row indices
///
/// `row_nnz[r]` is the entry count of the range's `r`-th row; `col_idx` and
/// `values` hold the rows back to back.
#[derive(Debug)]
pub(crate) struct RowBlock<T> {
    pub row_nnz: Vec<usize>,
    pub col_idx: Vec<usize>,
    pub values: Vec<T>,
}

impl<T> RowBlock<T> {
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// Checks that both operands are complete and `a.n_cols == b.n_rows`
pub(crate) fn check_operands<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> Result<()> {
    a.ensure_complete()?;
    b.ensure_complete()?;

    if a.n_cols() != b.n_rows() {
        return Err(SpgemmError::DimensionMismatch {
            a_rows: a.n_rows(),
            a_cols: a.n_cols(),
            b_rows: b.n_rows(),
            b_cols: b.n_cols(),
        });
    }

    Ok(())
}

/// Multiply a single row of matrix A with matrix B, appending the result row
///
/// Products are fed to `accumulator` in ascending `k`, then ascending `j`
/// of `B`'s row `k`. Returns the number of entries appended.
///
/// # Errors
///
/// Returns [`SpgemmError::IndexOutOfBounds`] if `row` or a referenced row of
/// `b` has not been appended, or a column of `b` exceeds `b.n_cols()` or the
/// accumulator's [`width`](Accumulator::width).
pub fn multiply_row_into<T, A>(
    row: usize,
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    accumulator: &mut A,
    col_idx: &mut Vec<usize>,
    values: &mut Vec<T>,
) -> Result<usize>
where
    T: Copy + Num + AddAssign,
    A: Accumulator<T>,
{
    if row >= a.rows_added() {
        return Err(SpgemmError::IndexOutOfBounds {
            row,
            index: row,
            bound: a.rows_added(),
        });
    }

    let col_bound = accumulator
        .width()
        .map_or(b.n_cols(), |width| width.min(b.n_cols()));

    for (k, &a_val) in a.row_iter(row) {
        if k >= b.rows_added() {
            return Err(SpgemmError::IndexOutOfBounds {
                row,
                index: k,
                bound: b.rows_added(),
            });
        }

        for (j, &b_val) in b.row_iter(k) {
            if j >= col_bound {
                return Err(SpgemmError::IndexOutOfBounds {
                    row,
                    index: j,
                    bound: col_bound,
                });
            }
            accumulator.accumulate(j, a_val * b_val);
        }
    }

    Ok(accumulator.drain_into(col_idx, values))
}

/// Computes output rows `rows` of `A × B` with the accumulator `config` selects
///
/// The accumulator lives only for this call.
pub(crate) fn multiply_rows<T>(
    rows: Range<usize>,
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    config: &SpgemmConfig,
) -> Result<RowBlock<T>>
where
    T: Copy + Num + AddAssign,
{
    match config.accumulator_for(b.n_cols()) {
        AccumulatorKind::Dense => {
            multiply_rows_with(rows, a, b, DenseAccumulator::new(b.n_cols()))
        }
        AccumulatorKind::Sort => {
            let capacity =
                (b.n_cols() / INITIAL_CAPACITY_DIVISOR).min(MAX_SORT_ACCUMULATOR_CAPACITY);
            multiply_rows_with(rows, a, b, SortAccumulator::new(capacity))
        }
    }
}

fn multiply_rows_with<T, A>(
    rows: Range<usize>,
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    mut accumulator: A,
) -> Result<RowBlock<T>>
where
    T: Copy + Num + AddAssign,
    A: Accumulator<T>,
{
    let mut block = RowBlock {
        row_nnz: Vec::with_capacity(rows.len()),
        col_idx: Vec::new(),
        values: Vec::new(),
    };

    for row in rows {
        let nnz = multiply_row_into(
            row,
            a,
            b,
            &mut accumulator,
            &mut block.col_idx,
            &mut block.values,
        )?;
        block.row_nnz.push(nnz);
    }

    Ok(block)
}

/// Performs sparse general matrix-matrix multiplication (SpGEMM) on one thread
///
/// # Arguments
///
/// * `a` - Left input matrix in CSR format
/// * `b` - Right input matrix in CSR format
///
/// # Returns
///
/// The result matrix C = A×B in CSR format, with `C.n_rows = A.n_rows` and
/// `C.n_cols = B.n_cols`. Exact-zero sums are not stored.
///
/// # Errors
///
/// - [`SpgemmError::IncompleteMatrix`] if either operand is missing rows
/// - [`SpgemmError::DimensionMismatch`] if `a.n_cols() != b.n_rows()`
///
/// # Examples
///
/// ```
/// use gustav::{multiply, SparseMatrixCSR};
///
/// let a = SparseMatrixCSR::from_rows(2, 2, vec![vec![(0, 1.0)], vec![(1, 1.0)]]).unwrap();
/// let b = SparseMatrixCSR::from_rows(2, 2, vec![vec![(0, 2.0)], vec![(1, 2.0)]]).unwrap();
///
/// let c = multiply(&a, &b).unwrap();
/// assert_eq!(c.values(), &[2.0, 2.0]);
/// ```
pub fn multiply<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign,
{
    multiply_with_config(a, b, &SpgemmConfig::default())
}

/// Sequential SpGEMM with an explicit configuration
///
/// Only `config.dense_accum_threshold` is consulted.
pub fn multiply_with_config<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    config: &SpgemmConfig,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign,
{
    check_operands(a, b)?;

    debug!(
        "sequential spgemm: {}×{} by {}×{} ({:?} accumulator)",
        a.n_rows(),
        a.n_cols(),
        b.n_rows(),
        b.n_cols(),
        config.accumulator_for(b.n_cols())
    );

    let block = multiply_rows(0..a.n_rows(), a, b, config)?;
    let row_ptr = exclusive_scan(&block.row_nnz);

    debug!("sequential spgemm: produced {} non-zeros", block.nnz());

    Ok(SparseMatrixCSR::from_parts_unchecked(
        a.n_rows(),
        b.n_cols(),
        row_ptr,
        block.col_idx,
        block.values,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_a() -> SparseMatrixCSR<f64> {
        // A = [1 2 0; 0 3 4; 5 0 6]
        SparseMatrixCSR::from_rows(
            3,
            3,
            vec![
                vec![(0, 1.0), (1, 2.0)],
                vec![(1, 3.0), (2, 4.0)],
                vec![(0, 5.0), (2, 6.0)],
            ],
        )
        .unwrap()
    }

    fn sample_b() -> SparseMatrixCSR<f64> {
        // B = [7 0 0; 0 8 0; 0 0 9]
        SparseMatrixCSR::from_rows(
            3,
            3,
            vec![vec![(0, 7.0)], vec![(1, 8.0)], vec![(2, 9.0)]],
        )
        .unwrap()
    }

    #[test]
    fn test_multiply_row_into() {
        let (a, b) = (sample_a(), sample_b());
        let mut acc = DenseAccumulator::new(3);
        let mut cols = Vec::new();
        let mut vals = Vec::new();

        // Row 0: [7 16 0]
        let n = multiply_row_into(0, &a, &b, &mut acc, &mut cols, &mut vals).unwrap();
        assert_eq!(n, 2);
        assert_eq!(cols, vec![0, 1]);
        assert_eq!(vals, vec![7.0, 16.0]);

        // Row 2: [35 0 54]
        multiply_row_into(2, &a, &b, &mut acc, &mut cols, &mut vals).unwrap();
        assert_eq!(cols, vec![0, 1, 0, 2]);
        assert_eq!(vals, vec![7.0, 16.0, 35.0, 54.0]);

        let err = multiply_row_into(3, &a, &b, &mut acc, &mut cols, &mut vals).unwrap_err();
        assert!(matches!(err, SpgemmError::IndexOutOfBounds { row: 3, .. }));
    }

    #[test]
    fn test_multiply_row_into_narrow_accumulator() {
        // Row 0 of B reaches column 2, past a one-column scratch row
        let a = SparseMatrixCSR::from_rows(1, 3, vec![vec![(0, 1.0)]]).unwrap();
        let b = SparseMatrixCSR::from_rows(3, 3, vec![vec![(2, 1.0)], vec![], vec![]]).unwrap();
        let mut acc = DenseAccumulator::new(1);
        let mut cols = Vec::new();
        let mut vals = Vec::new();

        let err = multiply_row_into(0, &a, &b, &mut acc, &mut cols, &mut vals).unwrap_err();
        assert!(matches!(
            err,
            SpgemmError::IndexOutOfBounds { row: 0, index: 2, bound: 1 }
        ));
        assert!(cols.is_empty());
        assert!(vals.is_empty());

        // The sort accumulator is unbounded, so the same row succeeds
        let mut acc = SortAccumulator::new(0);
        let n = multiply_row_into(0, &a, &b, &mut acc, &mut cols, &mut vals).unwrap();
        assert_eq!(n, 1);
        assert_eq!(cols, vec![2]);
        assert_eq!(vals, vec![1.0]);
    }

    #[test]
    fn test_multiply() {
        let c = multiply(&sample_a(), &sample_b()).unwrap();

        assert_eq!(c.n_rows(), 3);
        assert_eq!(c.n_cols(), 3);
        assert_eq!(c.row_ptr(), &[0, 2, 4, 6]);
        assert_eq!(c.col_idx(), &[0, 1, 1, 2, 0, 2]);
        assert_eq!(c.values(), &[7.0, 16.0, 24.0, 36.0, 35.0, 54.0]);
    }

    #[test]
    fn test_accumulators_agree() {
        let (a, b) = (sample_a(), sample_a());
        let dense = multiply_with_config(&a, &b, &SpgemmConfig::default()).unwrap();
        let sort =
            multiply_with_config(&a, &b, &SpgemmConfig::default().with_dense_threshold(0))
                .unwrap();

        assert_eq!(dense, sort);
    }

    #[test]
    fn test_duplicate_contributions_merged() {
        // Row [1 1] times rows [1 1] and [1 1]: both k contribute to both columns
        let a = SparseMatrixCSR::from_rows(1, 2, vec![vec![(0, 1.0), (1, 1.0)]]).unwrap();
        let b = SparseMatrixCSR::from_rows(
            2,
            2,
            vec![vec![(0, 1.0), (1, 1.0)], vec![(0, 1.0), (1, 1.0)]],
        )
        .unwrap();

        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.col_idx(), &[0, 1]);
        assert_eq!(c.values(), &[2.0, 2.0]);
    }

    #[test]
    fn test_incomplete_operand() {
        let mut a = SparseMatrixCSR::<f64>::new(2, 3).unwrap();
        a.add_row(&[(0, 1.0)]).unwrap();

        let err = multiply(&a, &sample_b()).unwrap_err();
        assert!(matches!(
            err,
            SpgemmError::IncompleteMatrix { rows_added: 1, n_rows: 2 }
        ));
    }
}
