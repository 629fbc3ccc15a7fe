//! Block-level sweep kernels
//!
//! Every kernel updates one contiguous block of rows in parallel. Safety
//! comes from the coloring invariant (a block never contains two coupled
//! rows), which the kernels encode structurally: the iterate is split into
//! (left, block, right) disjoint slices, the block writes only its own
//! range and reads only the other two. The end of each parallel loop is
//! the barrier between blocks.

use num_traits::Float;
use rayon::prelude::*;

use crate::matrix::ell::EllMatrix;

/// Full-sum Gauss-Seidel update of one block:
/// `x[row] = inv_diag[row] * (r[row] - sum(a[row,col] * x[col]))` over valid
/// off-diagonal columns below `col_limit`.
///
/// Serves both sweep directions: columns in earlier blocks hold their
/// forward-final values and columns in later blocks whatever the current
/// phase has produced, so recomputing the full sum from `r` is the correct
/// update either way.
pub(crate) fn sweep_block<T>(
    a: &EllMatrix<T>,
    r: &[T],
    x: &mut [T],
    offset: usize,
    size: usize,
    col_limit: usize,
) where
    T: Float + Send + Sync,
{
    let m = a.n_rows;
    let (left, rest) = x.split_at_mut(offset);
    let (block, right) = rest.split_at_mut(size);
    let right_base = offset + size;

    block.par_iter_mut().enumerate().for_each(|(i, xi)| {
        let row = offset + i;
        let mut sum = r[row];
        for slot in 0..a.width {
            let idx = slot * m + row;
            let col = a.col_ind[idx];
            if col < col_limit && col != row {
                let neighbor = if col < offset {
                    left[col]
                } else if col >= right_base {
                    right[col - right_base]
                } else {
                    // In-block coupling cannot survive coloring.
                    continue;
                };
                sum = (-a.values[idx]).mul_add(neighbor, sum);
            }
        }
        *xi = sum * a.inv_diag[row];
    });
}

/// Zero-guess update of the leading block: with every neighbor still zero
/// the sum degenerates to `x[row] = r[row] * inv_diag[row]`.
pub(crate) fn pointwise_block<T>(a: &EllMatrix<T>, r: &[T], x: &mut [T], size: usize)
where
    T: Float + Send + Sync,
{
    let inv_diag = &a.inv_diag;
    x[..size].par_iter_mut().enumerate().for_each(|(row, xi)| {
        *xi = r[row] * inv_diag[row];
    });
}

/// Zero-guess forward update of one block: only columns below the block
/// offset carry values yet, and those all sit in the slots below the
/// diagonal.
pub(crate) fn forward_block_zero<T>(
    a: &EllMatrix<T>,
    r: &[T],
    x: &mut [T],
    offset: usize,
    size: usize,
) where
    T: Float + Send + Sync,
{
    let m = a.n_rows;
    let (left, rest) = x.split_at_mut(offset);
    let block = &mut rest[..size];

    block.par_iter_mut().enumerate().for_each(|(i, xi)| {
        let row = offset + i;
        let diag_slot = a.diag_idx[row];
        let diag_val = a.values[diag_slot * m + row];
        let mut sum = r[row];
        for slot in 0..diag_slot {
            let idx = slot * m + row;
            let col = a.col_ind[idx];
            if col < offset {
                sum = (-a.values[idx]).mul_add(left[col], sum);
            }
        }
        *xi = sum / diag_val;
    });
}

/// Zero-guess backward update of one block: columns below the block offset
/// were finalized by the forward pass and must stay out of the sum; the
/// upper entries sit in the slots above the diagonal.
pub(crate) fn backward_block_zero<T>(a: &EllMatrix<T>, x: &mut [T], offset: usize, size: usize)
where
    T: Float + Send + Sync,
{
    let m = a.n_rows;
    let rest = &mut x[offset..];
    let (block, right) = rest.split_at_mut(size);
    let right_base = offset + size;

    block.par_iter_mut().enumerate().for_each(|(i, xi)| {
        let row = offset + i;
        let diag_slot = a.diag_idx[row];
        let diag_val = a.values[diag_slot * m + row];

        // Scale the forward result back up, then fold in the upper terms.
        let mut sum = *xi * diag_val;
        for slot in diag_slot + 1..a.width {
            let idx = slot * m + row;
            let col = a.col_ind[idx];
            if col >= right_base && col < m {
                sum = (-a.values[idx]).mul_add(right[col - right_base], sum);
            }
        }
        *xi = sum / diag_val;
    });
}

/// Folds the received halo values into the rows of the leading block.
///
/// Halo rows whose permuted position falls in a later block are skipped:
/// their halo columns are ordinary entries of the main arrays and are
/// consumed when that block is swept.
pub(crate) fn halo_correct<T>(a: &EllMatrix<T>, x: &mut [T])
where
    T: Float + Send + Sync,
{
    let (coloring, halo) = match (a.coloring.as_ref(), a.halo.as_ref()) {
        (Some(c), Some(h)) => (c, h),
        _ => return,
    };

    let block0 = coloring.sizes[0];
    let n = a.n_cols;

    let updates: Vec<(usize, T)> = (0..halo.n_rows)
        .into_par_iter()
        .filter_map(|halo_row| {
            let original = halo.row_ind[halo_row];
            let position = coloring.perm[original];
            if position >= block0 {
                return None;
            }
            let mut sum = T::zero();
            for slot in 0..halo.width {
                let idx = slot * halo.n_rows + halo_row;
                let col = halo.col_ind[idx];
                if col < n {
                    sum = (-halo.values[idx]).mul_add(x[col], sum);
                }
            }
            Some((position, sum * a.inv_diag[position]))
        })
        .collect();

    // Halo rows are distinct, so the scatter is conflict free.
    for (position, delta) in updates {
        x[position] = x[position] + delta;
    }
}
