//! Sequential reference implementation of the symmetric Gauss-Seidel sweep
//!
//! This provides a baseline for correctness testing of the block-parallel
//! sweeps. It walks the rows one at a time, forward then backward, always
//! reading the most recent iterate values; on a block-ordered matrix this
//! is exactly the update order the multicolor sweeps realize in parallel.

use num_traits::Float;

use crate::matrix::ell::EllMatrix;

/// Performs one symmetric Gauss-Seidel sweep row by row.
///
/// `x` must cover the local columns; columns in the halo region are read
/// but never written, so callers preset them to the exchanged values (or
/// zero for a single partition).
pub fn reference_symgs<T>(a: &EllMatrix<T>, r: &[T], x: &mut [T])
where
    T: Float + Send + Sync,
{
    assert!(x.len() >= a.n_cols, "x must cover the local columns");
    assert!(r.len() >= a.n_rows, "r must cover the local rows");

    let m = a.n_rows;
    let n = a.n_cols;

    let update = |row: usize, x: &[T]| {
        let mut sum = r[row];
        for slot in 0..a.width {
            let (col, val) = a.entry(row, slot);
            if col < n && col != row {
                sum = (-val).mul_add(x[col], sum);
            }
        }
        sum * a.inv_diag[row]
    };

    for row in 0..m {
        x[row] = update(row, x);
    }
    for row in (0..m).rev() {
        x[row] = update(row, x);
    }
}
