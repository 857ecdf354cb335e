//! Compressed Sparse Row (CSR) matrix format with zombie entries

use std::fmt;

use crate::matrix::{flip, is_zombie, unflip};
use crate::types::{Arithmetic, Scalar};

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing offsets into col_idx and values
/// - col_idx: Array of size nnz containing column indices of stored entries
/// - values: Array of size nnz containing the stored values
///
/// An entry can be deleted logically without compacting the arrays. Such a
/// *zombie* keeps its slot; its column index is stored flipped
/// (`-j - 2`, always negative) and it is excluded from every reduction.
#[derive(Clone)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to the number of stored entries
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz), negative for zombies
    pub col_idx: Vec<i64>,

    /// Stored values (size: nnz), including those of zombies
    pub values: Vec<T>,

    n_zombies: usize,
}

impl<T: Scalar> SparseMatrixCSR<T> {
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Arguments
    ///
    /// * `n_rows` - Number of rows
    /// * `n_cols` - Number of columns
    /// * `row_ptr` - Row pointers
    /// * `col_idx` - Column indices
    /// * `values` - Stored values
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1
    /// - col_idx.len() must equal values.len()
    /// - row_ptr[n_rows] must equal col_idx.len()
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), n_rows + 1, "row_ptr.len() must be n_rows + 1");
        assert_eq!(col_idx.len(), values.len(), "col_idx.len() must equal values.len()");
        assert_eq!(
            row_ptr[n_rows],
            col_idx.len(),
            "row_ptr[n_rows] must equal col_idx.len()"
        );

        for &col in &col_idx {
            assert!(col < n_cols, "Column index {} out of bounds (n_cols = {})", col, n_cols);
        }

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx: col_idx.into_iter().map(|c| c as i64).collect(),
            values,
            n_zombies: 0,
        }
    }

    /// Number of stored entries, zombies included
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of logically deleted entries
    pub fn n_zombies(&self) -> usize {
        self.n_zombies
    }

    /// Number of entries that take part in reductions
    pub fn n_live(&self) -> usize {
        self.nnz() - self.n_zombies
    }

    /// Logically deletes the entry stored at position `p`
    ///
    /// Returns `false` if it was already a zombie.
    pub fn mark_zombie(&mut self, p: usize) -> bool {
        let j = self.col_idx[p];
        if is_zombie(j) {
            return false;
        }
        self.col_idx[p] = flip(j);
        self.n_zombies += 1;
        true
    }

    /// Restores a zombie at position `p`
    ///
    /// Returns `false` if the entry was live.
    pub fn revive(&mut self, p: usize) -> bool {
        let j = self.col_idx[p];
        if !is_zombie(j) {
            return false;
        }
        self.col_idx[p] = unflip(j);
        self.n_zombies -= 1;
        true
    }

    /// Returns an iterator over the live entries in row i
    ///
    /// Each item is a tuple (col_idx, value)
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .filter(|(col, _)| !is_zombie(**col))
            .map(|(&col, val)| (col as usize, val))
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
            n_zombies: 0,
        }
    }
}

impl<T: Arithmetic> SparseMatrixCSR<T> {
    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self::new(n, n, (0..=n).collect(), (0..n).collect(), vec![T::one(); n])
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {} ({} zombies)", self.values.len(), self.n_zombies)?;

        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for j in start..(start + max_elements) {
                        let col = self.col_idx[j];
                        if is_zombie(col) {
                            write!(f, "({}, zombie) ", unflip(col))?;
                        } else {
                            write!(f, "({}, {:?}) ", col, self.values[j])?;
                        }
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
