//! # gustav: row-wise sparse matrix multiplication
//!
//! Sparse general matrix-matrix multiplication (SpGEMM) over matrices in
//! Compressed Sparse Row form, using Gustavson's row-wise accumulation.
//!
//! ## Overview
//!
//! - [`SparseMatrixCSR`] is assembled one row at a time with
//!   [`add_row`](SparseMatrixCSR::add_row) and is immutable once complete.
//! - [`multiply`] runs the row algorithm on the calling thread.
//! - [`multiply_parallel`] splits the output rows into contiguous blocks,
//!   computes each block on its own worker, and merges the blocks in order.
//! - [`SparseMatrixCSR::to_dense`] expands a matrix for comparison against
//!   the dense reference product [`dense_multiply`].
//!
//! ## Usage
//!
//! ```
//! use gustav::{multiply, multiply_parallel, SparseMatrixCSR};
//!
//! let mut a = SparseMatrixCSR::new(3, 3).unwrap();
//! a.add_row(&[(0, 1.0)]).unwrap();
//! a.add_row(&[(1, 2.0)]).unwrap();
//! a.add_row(&[(2, 3.0)]).unwrap();
//!
//! let sequential = multiply(&a, &a).unwrap();
//! let parallel = multiply_parallel(&a, &a).unwrap();
//!
//! assert_eq!(sequential.values(), &[1.0, 4.0, 9.0]);
//! assert_eq!(sequential, parallel);
//! ```

pub mod accumulator;
pub mod constants;
pub mod error;
pub mod generate;
pub mod matrix;
pub mod parallel;
pub mod spgemm;
pub mod utils;

// Re-export primary components
pub use accumulator::{Accumulator, DenseAccumulator, SortAccumulator};
pub use error::{Result, SpgemmError};
pub use generate::{generate_sparse_grid, generate_sparse_matrix};
pub use matrix::{dense_multiply, find_mismatch};
pub use matrix::{AccumulatorKind, SparseMatrixCSR, SpgemmConfig, SystemParameters};
pub use parallel::{
    multiply_parallel, multiply_parallel_with_config, multiply_parallel_with_workers,
    partition_rows,
};
pub use spgemm::{multiply, multiply_row_into, multiply_with_config};
pub use utils::{from_sprs_csr, to_sprs_csr};

/// Version information for the gustav library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
