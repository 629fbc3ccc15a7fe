//! Utilities for converting between the ELL format and external libraries

use ndarray::Array2;
use num_traits::Float;
use sprs::CsMat;

use crate::matrix::ell::EllMatrix;

/// Converts the valid entries of an ELL matrix to a sprs CsMat in CSR format
pub fn to_sprs_csr<T>(a: &EllMatrix<T>) -> CsMat<T>
where
    T: Float + Send + Sync + Default,
{
    let mut row_ptr = Vec::with_capacity(a.n_rows + 1);
    let mut col_idx = Vec::with_capacity(a.nnz());
    let mut values = Vec::with_capacity(a.nnz());

    row_ptr.push(0);
    for row in 0..a.n_rows {
        // Slots are sorted by column, as sprs requires.
        for (col, val) in a.row_entries(row) {
            col_idx.push(col);
            values.push(val);
        }
        row_ptr.push(col_idx.len());
    }

    CsMat::new((a.n_rows, a.n_cols), row_ptr, col_idx, values)
}

/// Converts a sprs CsMat to the ELL format
///
/// # Arguments
///
/// * `matrix` - Input matrix; converted to CSR first if needed
/// * `width` - Slot count of the ELL storage; must fit the widest row
/// * `seed` - Seed for the row hash keys
///
/// # Panics
///
/// Panics if a row overflows `width` or lacks a nonzero diagonal entry.
pub fn from_sprs_csr<T>(matrix: CsMat<T>, width: usize, seed: u64) -> EllMatrix<T>
where
    T: Float + Send + Sync + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    let rows: Vec<Vec<(usize, T)>> = (0..shape.0)
        .map(|row| {
            (indptr[row]..indptr[row + 1])
                .map(|idx| (indices[idx], data[idx]))
                .collect()
        })
        .collect();

    EllMatrix::from_entries(shape.0, shape.1, width, &rows, seed)
}

/// Expands the valid entries into a dense array, for small-matrix
/// validation and debugging
pub fn to_dense<T>(a: &EllMatrix<T>) -> Array2<T>
where
    T: Float + Send + Sync,
{
    let mut dense = Array2::zeros((a.n_rows, a.n_cols));
    for row in 0..a.n_rows {
        for (col, val) in a.row_entries(row) {
            dense[[row, col]] = val;
        }
    }
    dense
}
