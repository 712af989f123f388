//! # Parallel SpGEMM
//!
//! Fork-join over static row blocks. The output rows are split into
//! contiguous blocks of `ceil(n_rows / workers)` rows; each block is computed
//! on a per-call Rayon pool by the same row kernel the sequential engine uses,
//! into a buffer private to that block. Once every block has finished, a
//! single-threaded merge concatenates the blocks in block order, so the row
//! order of the result never depends on scheduling.

use log::{debug, trace};
use num_traits::Num;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::ops::{AddAssign, Range};

use crate::error::{Result, SpgemmError};
use crate::matrix::{SparseMatrixCSR, SpgemmConfig};
use crate::spgemm::{check_operands, multiply_rows, RowBlock};
use crate::utils::exclusive_scan;

/// Splits `0..n_rows` into at most `n_workers` contiguous blocks
///
/// Every block but the last has `ceil(n_rows / n_workers)` rows. A worker
/// count of zero is treated as one; more workers than rows yields one block
/// per row.
///
/// # Examples
///
/// ```
/// use gustav::partition_rows;
///
/// assert_eq!(partition_rows(10, 3), vec![0..4, 4..8, 8..10]);
/// assert_eq!(partition_rows(2, 8), vec![0..1, 1..2]);
/// ```
pub fn partition_rows(n_rows: usize, n_workers: usize) -> Vec<Range<usize>> {
    if n_rows == 0 {
        return Vec::new();
    }

    let n_workers = n_workers.clamp(1, n_rows);
    let block_size = (n_rows + n_workers - 1) / n_workers;

    (0..n_rows)
        .step_by(block_size)
        .map(|start| start..(start + block_size).min(n_rows))
        .collect()
}

/// Performs SpGEMM with one worker per available core
///
/// # Arguments
///
/// * `a` - Left input matrix in CSR format
/// * `b` - Right input matrix in CSR format
///
/// # Returns
///
/// The result matrix C = A×B in CSR format, equal to [`multiply`](crate::multiply)
/// up to floating-point summation order.
///
/// # Errors
///
/// Same operand errors as [`multiply`](crate::multiply), checked before any
/// worker starts, plus [`SpgemmError::WorkerFailed`] if a block fails and
/// [`SpgemmError::ThreadPool`] if the pool cannot be built.
///
/// # Examples
///
/// ```
/// use gustav::{multiply_parallel, SparseMatrixCSR};
///
/// let a = SparseMatrixCSR::from_rows(2, 2, vec![vec![(0, 1.0)], vec![(1, 1.0)]]).unwrap();
/// let b = SparseMatrixCSR::from_rows(2, 2, vec![vec![(0, 2.0)], vec![(1, 2.0)]]).unwrap();
///
/// // Result should be a diagonal matrix with elements 2.0
/// let c = multiply_parallel(&a, &b).unwrap();
/// assert_eq!(c.n_rows(), 2);
/// assert_eq!(c.values(), &[2.0, 2.0]);
/// ```
pub fn multiply_parallel<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign + Send + Sync,
{
    multiply_parallel_with_config(a, b, &SpgemmConfig::default())
}

/// Parallel SpGEMM with an explicit worker count
///
/// The count is capped at the rows of `a` and at the hardware thread count.
pub fn multiply_parallel_with_workers<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    n_workers: usize,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign + Send + Sync,
{
    multiply_parallel_with_config(a, b, &SpgemmConfig::default().with_threads(n_workers))
}

/// Parallel SpGEMM with an explicit configuration
pub fn multiply_parallel_with_config<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    config: &SpgemmConfig,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign + Send + Sync,
{
    check_operands(a, b)?;

    let n_rows = a.n_rows();
    let blocks = partition_rows(n_rows, config.worker_count(n_rows));

    debug!(
        "parallel spgemm: {}×{} by {}×{}, {} blocks of up to {} rows",
        a.n_rows(),
        a.n_cols(),
        b.n_rows(),
        b.n_cols(),
        blocks.len(),
        blocks.first().map_or(0, |rows| rows.len())
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(blocks.len())
        .thread_name(|i| format!("spgemm-worker-{}", i))
        .build()?;

    // Compute phase: each block writes only to its own RowBlock
    let results: Vec<RowBlock<T>> = pool.install(|| {
        blocks
            .par_iter()
            .enumerate()
            .map(|(block, rows)| {
                let result = multiply_rows(rows.clone(), a, b, config).map_err(|source| {
                    SpgemmError::WorkerFailed {
                        block,
                        source: Box::new(source),
                    }
                })?;
                trace!("block {} ({:?}): {} non-zeros", block, rows, result.nnz());
                Ok(result)
            })
            .collect::<Result<Vec<_>>>()
    })?;

    Ok(merge_blocks(n_rows, b.n_cols(), results))
}

/// Concatenates per-block results, in block order, into one CSR matrix
fn merge_blocks<T>(n_rows: usize, n_cols: usize, blocks: Vec<RowBlock<T>>) -> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    let block_nnz: Vec<usize> = blocks.iter().map(RowBlock::nnz).collect();
    let block_offsets = exclusive_scan(&block_nnz);
    let total_nnz = block_offsets[blocks.len()];

    debug!(
        "parallel spgemm: merging {} blocks, {} non-zeros",
        blocks.len(),
        total_nnz
    );

    let mut row_ptr = Vec::with_capacity(n_rows + 1);
    let mut col_idx = Vec::with_capacity(total_nnz);
    let mut values = Vec::with_capacity(total_nnz);
    row_ptr.push(0);

    for (block, &offset) in blocks.into_iter().zip(&block_offsets) {
        let mut running_nnz = offset;
        for nnz in &block.row_nnz {
            running_nnz += nnz;
            row_ptr.push(running_nnz);
        }
        col_idx.extend(block.col_idx);
        values.extend(block.values);
    }

    SparseMatrixCSR::from_parts_unchecked(n_rows, n_cols, row_ptr, col_idx, values)
}
