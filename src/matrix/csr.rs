//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;

use ndarray::Array2;
use num_traits::Num;

use crate::constants::{MAX_DISPLAY_ELEMENTS_PER_ROW, MAX_DISPLAY_ROWS};
use crate::error::{Result, SpgemmError};

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// A matrix is assembled one row at a time with [`add_row`](Self::add_row).
/// Until all `n_rows` rows are present it is *incomplete*, and multiplication
/// or materialization fails with [`SpgemmError::IncompleteMatrix`]. Once
/// complete, no method mutates it, so a `&SparseMatrixCSR` can be shared
/// freely across threads.
///
/// Column indices within a row are kept sorted ascending and unique, and no
/// explicit zero is stored.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    n_rows: usize,
    n_cols: usize,

    /// row_ptr[i] is the index in col_idx and values where row i starts;
    /// has `rows_added() + 1` entries during assembly
    row_ptr: Vec<usize>,

    col_idx: Vec<usize>,

    values: Vec<T>,
}

impl<T> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    /// Creates an empty matrix ready to receive `n_rows` rows via [`add_row`](Self::add_row)
    ///
    /// # Errors
    ///
    /// Returns [`SpgemmError::InvalidShape`] if either dimension is zero.
    pub fn new(n_rows: usize, n_cols: usize) -> Result<Self> {
        if n_rows == 0 || n_cols == 0 {
            return Err(SpgemmError::InvalidShape { n_rows, n_cols });
        }

        let mut row_ptr = Vec::with_capacity(n_rows + 1);
        row_ptr.push(0);

        Ok(Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Appends the next row of the matrix
    ///
    /// `entries` are `(column, value)` pairs in any order. They are stored
    /// sorted by column; pairs whose value is exactly zero are dropped.
    /// A rejected call leaves the matrix unchanged.
    ///
    /// # Errors
    ///
    /// - [`SpgemmError::TooManyRows`] if all rows were already appended
    /// - [`SpgemmError::ColumnOutOfBounds`] if a column is `>= n_cols`
    /// - [`SpgemmError::DuplicateColumn`] if a column repeats within `entries`
    pub fn add_row(&mut self, entries: &[(usize, T)]) -> Result<()> {
        let row = self.rows_added();
        if row == self.n_rows {
            return Err(SpgemmError::TooManyRows {
                n_rows: self.n_rows,
            });
        }

        let mut sorted = entries.to_vec();
        sorted.sort_unstable_by_key(|&(col, _)| col);

        for (idx, &(col, _)) in sorted.iter().enumerate() {
            if col >= self.n_cols {
                return Err(SpgemmError::ColumnOutOfBounds {
                    row,
                    col,
                    n_cols: self.n_cols,
                });
            }
            if idx > 0 && sorted[idx - 1].0 == col {
                return Err(SpgemmError::DuplicateColumn { row, col });
            }
        }

        for (col, val) in sorted {
            if !val.is_zero() {
                self.col_idx.push(col);
                self.values.push(val);
            }
        }
        self.row_ptr.push(self.col_idx.len());

        Ok(())
    }

    /// Builds a complete matrix from exactly `n_rows` rows of `(column, value)` pairs
    ///
    /// # Errors
    ///
    /// Any error of [`new`](Self::new) or [`add_row`](Self::add_row), and
    /// [`SpgemmError::RowCountMismatch`] if `rows` yields more or fewer than `n_rows` rows.
    pub fn from_rows<I, R>(n_rows: usize, n_cols: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[(usize, T)]>,
    {
        let mut matrix = Self::new(n_rows, n_cols)?;
        let mut supplied = 0;

        for row in rows {
            supplied += 1;
            if supplied <= n_rows {
                matrix.add_row(row.as_ref())?;
            }
        }

        if supplied != n_rows {
            return Err(SpgemmError::RowCountMismatch {
                expected: n_rows,
                actual: supplied,
            });
        }

        Ok(matrix)
    }

    /// Builds a complete matrix from raw CSR arrays, validating every invariant
    ///
    /// # Errors
    ///
    /// Returns [`SpgemmError::InvalidShape`] for a zero dimension and
    /// [`SpgemmError::InvalidStructure`] when the arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1, start at 0 and be non-decreasing
    /// - col_idx.len() must equal values.len() and row_ptr[n_rows]
    /// - columns within a row must be strictly ascending and below n_cols
    /// - no value may be an explicit zero
    pub fn from_raw_parts(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if n_rows == 0 || n_cols == 0 {
            return Err(SpgemmError::InvalidShape { n_rows, n_cols });
        }
        if row_ptr.len() != n_rows + 1 {
            return Err(SpgemmError::InvalidStructure(format!(
                "row_ptr.len() is {} but must be n_rows + 1 = {}",
                row_ptr.len(),
                n_rows + 1
            )));
        }
        if col_idx.len() != values.len() {
            return Err(SpgemmError::InvalidStructure(format!(
                "col_idx.len() ({}) must equal values.len() ({})",
                col_idx.len(),
                values.len()
            )));
        }
        if row_ptr[0] != 0 || row_ptr[n_rows] != col_idx.len() {
            return Err(SpgemmError::InvalidStructure(format!(
                "row_ptr must span [0, {}], got [{}, {}]",
                col_idx.len(),
                row_ptr[0],
                row_ptr[n_rows]
            )));
        }

        if let Some(row) = row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(SpgemmError::InvalidStructure(format!(
                "row_ptr decreases at row {}: {} > {}",
                row,
                row_ptr[row],
                row_ptr[row + 1]
            )));
        }

        for row in 0..n_rows {
            let (start, end) = (row_ptr[row], row_ptr[row + 1]);
            for idx in start..end {
                let col = col_idx[idx];
                if col >= n_cols {
                    return Err(SpgemmError::ColumnOutOfBounds { row, col, n_cols });
                }
                if idx > start && col_idx[idx - 1] >= col {
                    return Err(SpgemmError::InvalidStructure(format!(
                        "columns in row {} are not strictly ascending at column {}",
                        row, col
                    )));
                }
                if values[idx].is_zero() {
                    return Err(SpgemmError::InvalidStructure(format!(
                        "explicit zero stored at ({}, {})",
                        row, col
                    )));
                }
            }
        }

        Ok(Self::from_parts_unchecked(n_rows, n_cols, row_ptr, col_idx, values))
    }

    /// Assembles a matrix from arrays the engines produced themselves
    pub(crate) fn from_parts_unchecked(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        debug_assert_eq!(row_ptr.len(), n_rows + 1);
        debug_assert_eq!(col_idx.len(), values.len());

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Builds a complete matrix from a dense grid, storing its non-zero cells
    pub fn from_dense(grid: &Array2<T>) -> Result<Self> {
        let (n_rows, n_cols) = grid.dim();
        let mut matrix = Self::new(n_rows, n_cols)?;

        for row in grid.outer_iter() {
            let entries: Vec<(usize, T)> = row
                .iter()
                .enumerate()
                .filter(|(_, val)| !val.is_zero())
                .map(|(col, &val)| (col, val))
                .collect();
            matrix.add_row(&entries)?;
        }

        Ok(matrix)
    }

    /// Creates a complete matrix whose rows are all empty
    pub fn zeros(n_rows: usize, n_cols: usize) -> Result<Self> {
        if n_rows == 0 || n_cols == 0 {
            return Err(SpgemmError::InvalidShape { n_rows, n_cols });
        }

        Ok(Self::from_parts_unchecked(
            n_rows,
            n_cols,
            vec![0; n_rows + 1],
            Vec::new(),
            Vec::new(),
        ))
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(SpgemmError::InvalidShape { n_rows: n, n_cols: n });
        }

        let row_ptr = (0..=n).collect();
        let col_idx = (0..n).collect();
        let values = vec![T::one(); n];

        Ok(Self::from_parts_unchecked(n, n, row_ptr, col_idx, values))
    }

    /// Expands the matrix into a dense `n_rows × n_cols` array
    ///
    /// # Errors
    ///
    /// Returns [`SpgemmError::IncompleteMatrix`] if rows are still missing.
    pub fn to_dense(&self) -> Result<Array2<T>> {
        self.ensure_complete()?;

        let mut dense = Array2::zeros((self.n_rows, self.n_cols));
        for i in 0..self.n_rows {
            for (j, &val) in self.row_iter(i) {
                dense[[i, j]] = val;
            }
        }

        Ok(dense)
    }
}

impl<T> SparseMatrixCSR<T> {
    /// Number of rows the matrix was declared with
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns the matrix was declared with
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Row offsets; row `i` occupies `row_ptr[i]..row_ptr[i + 1]`
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column of each stored entry, ascending within a row
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Stored non-zero values, parallel to [`col_idx`](Self::col_idx)
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of rows appended so far
    pub fn rows_added(&self) -> usize {
        self.row_ptr.len() - 1
    }

    /// Whether every declared row has been appended
    pub fn is_complete(&self) -> bool {
        self.rows_added() == self.n_rows
    }

    /// Fails with [`SpgemmError::IncompleteMatrix`] unless the matrix is complete
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(SpgemmError::IncompleteMatrix {
                rows_added: self.rows_added(),
                n_rows: self.n_rows,
            })
        }
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    ///
    /// # Panics
    ///
    /// Panics if row `i` has not been appended yet.
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.rows_added(), "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }
}

/// Full dump of the three CSR arrays
impl<T: fmt::Display> fmt::Display for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "CSR {} × {} ({} of {} rows, nnz = {})",
            self.n_rows,
            self.n_cols,
            self.row_ptr.len() - 1,
            self.n_rows,
            self.values.len()
        )?;

        write!(f, "values:  ")?;
        for val in &self.values {
            write!(f, "{} ", val)?;
        }
        writeln!(f)?;

        write!(f, "col_idx: ")?;
        for col in &self.col_idx {
            write!(f, "{} ", col)?;
        }
        writeln!(f)?;

        write!(f, "row_ptr: ")?;
        for ptr in &self.row_ptr {
            write!(f, "{} ", ptr)?;
        }
        writeln!(f)
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  rows appended: {}", self.row_ptr.len() - 1)?;
        writeln!(f, "  nnz: {}", self.values.len())?;

        // Print a sample of the matrix content
        let max_rows_to_print = MAX_DISPLAY_ROWS.min(self.row_ptr.len() - 1);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = MAX_DISPLAY_ELEMENTS_PER_ROW.min(end - start);

                    for j in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
