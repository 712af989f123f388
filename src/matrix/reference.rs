//! Dense reference multiplication used to validate SpGEMM output
//!
//! The triple loop is both the baseline the harness times against and the
//! ground truth the tests compare with.

use ndarray::Array2;
use num_traits::Num;

use crate::error::{Result, SpgemmError};

/// Multiplies two dense arrays with the textbook `i, j, k` triple loop
///
/// # Errors
///
/// Returns [`SpgemmError::DimensionMismatch`] if `a.ncols() != b.nrows()`.
pub fn dense_multiply<T>(a: &Array2<T>, b: &Array2<T>) -> Result<Array2<T>>
where
    T: Copy + Num,
{
    let (n, inner) = a.dim();
    let (b_rows, m) = b.dim();
    if inner != b_rows {
        return Err(SpgemmError::DimensionMismatch {
            a_rows: n,
            a_cols: inner,
            b_rows,
            b_cols: m,
        });
    }

    let mut c = Array2::zeros((n, m));
    for i in 0..n {
        for j in 0..m {
            let mut sum = T::zero();
            for k in 0..inner {
                sum = sum + a[[i, k]] * b[[k, j]];
            }
            c[[i, j]] = sum;
        }
    }

    Ok(c)
}

/// Returns the first `(row, col)` in row-major order where the two arrays
/// differ by more than `tolerance`, or `None` if they agree everywhere
///
/// Arrays of different shapes mismatch at `(0, 0)`.
pub fn find_mismatch(
    actual: &Array2<f64>,
    expected: &Array2<f64>,
    tolerance: f64,
) -> Option<(usize, usize)> {
    if actual.dim() != expected.dim() {
        return Some((0, 0));
    }

    actual
        .indexed_iter()
        .find(|&(idx, &val)| (val - expected[idx]).abs() > tolerance)
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dense_multiply() {
        // A = [1 2; 0 3]
        // B = [4 5; 6 7]
        // C = A*B = [16 19; 18 21]
        let a = array![[1, 2], [0, 3]];
        let b = array![[4, 5], [6, 7]];

        let c = dense_multiply(&a, &b).unwrap();
        assert_eq!(c, array![[16, 19], [18, 21]]);
    }

    #[test]
    fn test_dense_multiply_rectangular() {
        let a = array![[1.0, 0.0, 2.0], [0.0, 1.0, 0.0]];
        let b = array![[1.0], [2.0], [3.0]];

        let c = dense_multiply(&a, &b).unwrap();
        assert_eq!(c, array![[7.0], [2.0]]);
    }

    #[test]
    fn test_dense_multiply_mismatch() {
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array2::<f64>::zeros((2, 2));

        assert!(matches!(
            dense_multiply(&a, &b),
            Err(SpgemmError::DimensionMismatch { a_cols: 3, b_rows: 2, .. })
        ));
    }

    #[test]
    fn test_find_mismatch() {
        let expected = array![[1.0, 2.0], [3.0, 4.0]];
        let close = array![[1.0 + 1e-9, 2.0], [3.0, 4.0 - 1e-9]];
        let off = array![[1.0, 2.0], [3.5, 4.0]];

        assert_eq!(find_mismatch(&close, &expected, 1e-6), None);
        assert_eq!(find_mismatch(&off, &expected, 1e-6), Some((1, 0)));
        assert_eq!(
            find_mismatch(&Array2::zeros((1, 2)), &expected, 1e-6),
            Some((0, 0))
        );
    }
}
