//! Reproducible random test matrices
//!
//! All randomness comes from a `ChaCha8Rng` seeded by the caller; nothing
//! here touches global state, so generation is safe from concurrent tests.

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::MAX_GENERATED_VALUE;
use crate::error::Result;
use crate::matrix::SparseMatrixCSR;

/// Generates an `n × n` grid of non-negative integers with roughly a
/// `sparsity` fraction of zeros
///
/// Cells are filled in row-major order: a uniform draw in `[0, 1)` decides
/// whether the cell is non-zero (draw > `sparsity`), and non-zero cells take a
/// uniform value in `1..=10`. `sparsity` is expected in `[0.0, 1.0)`.
pub fn generate_sparse_grid(n: usize, sparsity: f64, seed: u64) -> Array2<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    Array2::from_shape_fn((n, n), |_| {
        if rng.gen::<f64>() > sparsity {
            rng.gen_range(1..=MAX_GENERATED_VALUE)
        } else {
            0
        }
    })
}

/// Generates a grid with [`generate_sparse_grid`] and assembles it into CSR form
pub fn generate_sparse_matrix(n: usize, sparsity: f64, seed: u64) -> Result<SparseMatrixCSR<f64>> {
    let grid = generate_sparse_grid(n, sparsity, seed).mapv(f64::from);
    SparseMatrixCSR::from_dense(&grid)
}
