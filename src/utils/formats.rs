//! Utilities for converting between our matrix formats and external libraries

use ndarray::{Array2, ArrayView2};
use sprs::CsMat;

use crate::matrix::{BitmapMatrix, FullMatrix, SparseMatrixCSR};
use crate::types::Scalar;

/// Converts our CSR matrix to sprs CsMat format, dropping zombies
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> CsMat<T>
where
    T: Scalar + Default,
{
    let mut row_ptr = Vec::with_capacity(matrix.n_rows + 1);
    let mut col_idx = Vec::with_capacity(matrix.n_live());
    let mut values = Vec::with_capacity(matrix.n_live());

    row_ptr.push(0);
    for i in 0..matrix.n_rows {
        for (col, &val) in matrix.row_iter(i) {
            col_idx.push(col);
            values.push(val);
        }
        row_ptr.push(col_idx.len());
    }

    CsMat::new((matrix.n_rows, matrix.n_cols), row_ptr, col_idx, values)
}

/// Converts a sprs CsMat (CSR or CSC) to our SparseMatrixCSR format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Scalar + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(shape.0, shape.1, indptr, indices, data)
}

/// Copies a dense 2-D array into a full matrix
pub fn from_ndarray<T: Scalar>(array: ArrayView2<'_, T>) -> FullMatrix<T> {
    let (n_rows, n_cols) = array.dim();
    FullMatrix::new(n_rows, n_cols, array.iter().copied().collect())
}

/// Copies a dense 2-D array into a bitmap matrix whose entries are the
/// positions where `mask` is set
///
/// # Panics
///
/// Panics if the two arrays have different shapes.
pub fn from_ndarray_masked<T: Scalar>(
    array: ArrayView2<'_, T>,
    mask: ArrayView2<'_, bool>,
) -> BitmapMatrix<T> {
    assert_eq!(array.dim(), mask.dim(), "values and mask must have the same shape");
    let (n_rows, n_cols) = array.dim();
    BitmapMatrix::new(
        n_rows,
        n_cols,
        array.iter().copied().collect(),
        mask.iter().copied().collect(),
    )
}

/// Copies a full matrix into a dense 2-D array
pub fn to_ndarray<T: Scalar>(matrix: &FullMatrix<T>) -> Array2<T> {
    Array2::from_shape_fn((matrix.n_rows, matrix.n_cols), |(i, j)| matrix.get(i, j))
}
