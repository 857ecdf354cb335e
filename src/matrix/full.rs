//! Full matrix format: every slot holds an entry

use crate::types::Scalar;

/// A matrix with all `n_rows * n_cols` entries present, stored row-major
#[derive(Debug, Clone)]
pub struct FullMatrix<T> {
    pub n_rows: usize,
    pub n_cols: usize,
    pub values: Vec<T>,
}

impl<T: Scalar> FullMatrix<T> {
    /// # Panics
    ///
    /// Panics unless `values` holds `n_rows * n_cols` entries.
    pub fn new(n_rows: usize, n_cols: usize, values: Vec<T>) -> Self {
        assert_eq!(values.len(), n_rows * n_cols, "values.len() must be n_rows * n_cols");
        Self { n_rows, n_cols, values }
    }

    /// A single-column matrix holding `values`
    pub fn column(values: Vec<T>) -> Self {
        let n = values.len();
        Self::new(n, 1, values)
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(i < self.n_rows && j < self.n_cols, "({}, {}) out of bounds", i, j);
        self.values[i * self.n_cols + j]
    }
}
