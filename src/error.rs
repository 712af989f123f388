//! Error types for matrix construction and multiplication.
//!
//! Every fallible operation in the crate returns [`Result<T>`].

use thiserror::Error;

/// Errors raised while building or multiplying CSR matrices.
#[derive(Debug, Error)]
pub enum SpgemmError {
    /// A matrix dimension was zero.
    #[error("Invalid shape: {n_rows}×{n_cols} (both dimensions must be positive)")]
    InvalidShape { n_rows: usize, n_cols: usize },

    /// `A.n_cols != B.n_rows` at multiplication entry.
    #[error("Dimension mismatch: cannot multiply {a_rows}×{a_cols} by {b_rows}×{b_cols}")]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },

    /// A row entry referenced a column outside `[0, n_cols)`.
    #[error("Column index {col} out of bounds in row {row} (n_cols = {n_cols})")]
    ColumnOutOfBounds { row: usize, col: usize, n_cols: usize },

    /// The same column appeared twice in one row.
    #[error("Duplicate column {col} in row {row}")]
    DuplicateColumn { row: usize, col: usize },

    /// `add_row` was called after every row had already been appended.
    #[error("Too many rows: matrix already holds all {n_rows} rows")]
    TooManyRows { n_rows: usize },

    /// A row source produced the wrong number of rows.
    #[error("Row count mismatch: expected {expected} rows, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    /// The matrix was used before all of its rows were appended.
    #[error("Incomplete matrix: {rows_added} of {n_rows} rows appended")]
    IncompleteMatrix { rows_added: usize, n_rows: usize },

    /// Raw CSR arrays violate a structural invariant.
    #[error("Invalid CSR structure: {0}")]
    InvalidStructure(String),

    /// An index read inside the row kernel fell outside its array.
    #[error("Index {index} out of bounds while computing row {row} (bound = {bound})")]
    IndexOutOfBounds { row: usize, index: usize, bound: usize },

    /// A parallel worker failed; no partial result was merged.
    #[error("Worker for row block {block} failed: {source}")]
    WorkerFailed {
        block: usize,
        #[source]
        source: Box<SpgemmError>,
    },

    /// The per-call worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias for `Result<T, SpgemmError>`.
pub type Result<T> = std::result::Result<T, SpgemmError>;
