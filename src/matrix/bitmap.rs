//! Bitmap matrix format: a dense value array with a parallel presence array

use crate::types::Scalar;

/// A matrix stored as a row-major value array plus presence flags
///
/// Slot `p = i * n_cols + j` holds entry `(i, j)` when `present[p]` is set.
/// Absent slots keep whatever value they last held; that value never takes
/// part in a reduction.
#[derive(Debug, Clone)]
pub struct BitmapMatrix<T> {
    pub n_rows: usize,
    pub n_cols: usize,
    pub values: Vec<T>,
    pub present: Vec<bool>,
    n_present: usize,
}

impl<T: Scalar> BitmapMatrix<T> {
    /// Creates a bitmap matrix
    ///
    /// # Panics
    ///
    /// Panics unless both arrays hold `n_rows * n_cols` slots.
    pub fn new(n_rows: usize, n_cols: usize, values: Vec<T>, present: Vec<bool>) -> Self {
        assert_eq!(values.len(), n_rows * n_cols, "values.len() must be n_rows * n_cols");
        assert_eq!(present.len(), values.len(), "present.len() must equal values.len()");

        let n_present = present.iter().filter(|&&b| b).count();
        Self {
            n_rows,
            n_cols,
            values,
            present,
            n_present,
        }
    }

    /// A bitmap matrix with no entries, every slot holding `fill`
    pub fn empty(n_rows: usize, n_cols: usize, fill: T) -> Self {
        Self::new(
            n_rows,
            n_cols,
            vec![fill; n_rows * n_cols],
            vec![false; n_rows * n_cols],
        )
    }

    /// Number of slots, present or not
    pub fn n_slots(&self) -> usize {
        self.values.len()
    }

    /// Number of present entries
    pub fn n_present(&self) -> usize {
        self.n_present
    }

    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        let p = self.slot(i, j);
        self.present[p].then(|| self.values[p])
    }

    /// Stores `value` at `(i, j)` and marks it present
    pub fn insert(&mut self, i: usize, j: usize, value: T) {
        let p = self.slot(i, j);
        if !self.present[p] {
            self.present[p] = true;
            self.n_present += 1;
        }
        self.values[p] = value;
    }

    /// Clears the presence flag at `(i, j)`, leaving the stored value in place
    pub fn remove(&mut self, i: usize, j: usize) -> Option<T> {
        let p = self.slot(i, j);
        if self.present[p] {
            self.present[p] = false;
            self.n_present -= 1;
            Some(self.values[p])
        } else {
            None
        }
    }

    fn slot(&self, i: usize, j: usize) -> usize {
        assert!(i < self.n_rows && j < self.n_cols, "({}, {}) out of bounds", i, j);
        i * self.n_cols + j
    }
}
