//! Utilities for converting between our CSR format and `sprs`

use num_traits::Num;
use sprs::CsMat;

use crate::error::Result;
use crate::matrix::SparseMatrixCSR;

/// Converts a complete CSR matrix to sprs CsMat format
///
/// # Errors
///
/// Returns [`SpgemmError::IncompleteMatrix`](crate::SpgemmError::IncompleteMatrix)
/// if rows are still missing.
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> Result<CsMat<T>>
where
    T: Copy + Num + Default,
{
    matrix.ensure_complete()?;

    Ok(CsMat::new(
        (matrix.n_rows(), matrix.n_cols()),
        matrix.row_ptr().to_vec(),
        matrix.col_idx().to_vec(),
        matrix.values().to_vec(),
    ))
}

/// Converts a sprs CsMat (either storage order) to our CSR format
///
/// Goes through [`SparseMatrixCSR::add_row`], so explicit zeros that sprs
/// may keep are dropped.
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let (n_rows, n_cols) = matrix.shape();
    let mut result = SparseMatrixCSR::new(n_rows, n_cols)?;

    for row in matrix.outer_iterator() {
        let entries: Vec<(usize, T)> = row.iter().map(|(col, &val)| (col, val)).collect();
        result.add_row(&entries)?;
    }

    Ok(result)
}
