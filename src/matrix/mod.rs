// Matrix data structures and operations

pub mod config;
pub mod csr;
pub mod reference;

pub use config::{AccumulatorKind, SpgemmConfig, SystemParameters};
pub use csr::SparseMatrixCSR;
pub use reference::{dense_multiply, find_mismatch};
