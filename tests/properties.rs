//! Property-based tests over randomly generated sparse operands

use gustav::constants::DEFAULT_TOLERANCE;
use gustav::{
    dense_multiply, find_mismatch, multiply, multiply_parallel_with_workers, SparseMatrixCSR,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Builds a `rows × cols` matrix with integer-valued entries in [-5, 5]
fn random_matrix(rows: usize, cols: usize, sparsity: f64, seed: u64) -> SparseMatrixCSR<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut matrix = SparseMatrixCSR::new(rows, cols).unwrap();

    for _ in 0..rows {
        let mut entries = Vec::new();
        for col in 0..cols {
            if rng.gen::<f64>() > sparsity {
                entries.push((col, rng.gen_range(-5..=5) as f64));
            }
        }
        matrix.add_row(&entries).unwrap();
    }

    matrix
}

fn assert_well_formed(c: &SparseMatrixCSR<f64>) {
    assert_eq!(c.row_ptr().len(), c.n_rows() + 1);
    assert_eq!(c.row_ptr()[0], 0);
    assert_eq!(c.row_ptr()[c.n_rows()], c.nnz());
    assert!(c.row_ptr().windows(2).all(|w| w[0] <= w[1]));

    for i in 0..c.n_rows() {
        let cols: Vec<usize> = c.row_iter(i).map(|(col, _)| col).collect();
        assert!(cols.iter().all(|&col| col < c.n_cols()));
        assert!(cols.windows(2).all(|w| w[0] < w[1]));
    }

    assert!(c.values().iter().all(|&v| v != 0.0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn products_match_dense_reference(
        rows in 1usize..24,
        inner in 1usize..24,
        cols in 1usize..24,
        sparsity in 0.0f64..0.99,
        seed in any::<u64>(),
        workers in 1usize..32,
    ) {
        let a = random_matrix(rows, inner, sparsity, seed);
        let b = random_matrix(inner, cols, sparsity, seed.wrapping_add(1));

        let expected = dense_multiply(&a.to_dense().unwrap(), &b.to_dense().unwrap()).unwrap();
        let sequential = multiply(&a, &b).unwrap();
        let parallel = multiply_parallel_with_workers(&a, &b, workers).unwrap();

        prop_assert_eq!(
            find_mismatch(&sequential.to_dense().unwrap(), &expected, DEFAULT_TOLERANCE),
            None
        );
        prop_assert_eq!(
            find_mismatch(&parallel.to_dense().unwrap(), &expected, DEFAULT_TOLERANCE),
            None
        );
    }

    #[test]
    fn products_are_well_formed(
        n in 1usize..40,
        sparsity in 0.0f64..0.99,
        seed in any::<u64>(),
        workers in 1usize..64,
    ) {
        let a = random_matrix(n, n, sparsity, seed);
        let b = random_matrix(n, n, sparsity, seed.wrapping_add(7));

        assert_well_formed(&multiply(&a, &b).unwrap());
        assert_well_formed(&multiply_parallel_with_workers(&a, &b, workers).unwrap());
    }

    #[test]
    fn identity_is_neutral(
        n in 1usize..30,
        sparsity in 0.0f64..0.99,
        seed in any::<u64>(),
    ) {
        let a = random_matrix(n, n, sparsity, seed);
        let identity = SparseMatrixCSR::<f64>::identity(n).unwrap();

        prop_assert_eq!(multiply(&identity, &a).unwrap(), a.clone());
        prop_assert_eq!(multiply(&a, &identity).unwrap(), a);
    }
}
