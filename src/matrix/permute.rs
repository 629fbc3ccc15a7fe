//! Applying the block-order permutation to matrix storage and vectors
//!
//! Coloring decides the execution order; this pass rewrites the ELL storage
//! into that order so the sweep kernels can address blocks as contiguous
//! row ranges. Rows are gathered through the inverse permutation, local
//! column indices are relabeled through the forward permutation, and each
//! row is re-sorted by its new column indices so the diagonal slot again
//! splits the lower and upper entries. Halo columns (`n_rows..n_cols`)
//! keep their indices: the receive region is laid out by the exchange
//! schedule, not by the local ordering.

use aligned_vec::AVec;
use num_traits::Float;
use rayon::prelude::*;

use crate::matrix::ell::{EllMatrix, CACHE_LINE, INVALID_INDEX};

/// Rewrites the matrix storage into block order using its installed
/// coloring.
///
/// The row hash keys are drained here: they exist to drive coloring, and
/// rebuilding the ordering after a structure change regenerates them with
/// the matrix.
///
/// # Panics
///
/// Panics if no coloring is installed.
pub fn apply_permutation<T>(a: &mut EllMatrix<T>)
where
    T: Float + Send + Sync,
{
    let coloring = match a.coloring.take() {
        Some(c) => c,
        None => panic!("apply_permutation requires an installed coloring"),
    };

    let m = a.n_rows;
    let n = a.n_cols;
    let width = a.width;

    // Gather each new row from its original position with relabeled,
    // re-sorted entries.
    let mut gathered: Vec<Vec<(usize, T)>> = Vec::new();
    (0..m)
        .into_par_iter()
        .map(|new_row| {
            let original = coloring.iperm[new_row];
            let mut entries: Vec<(usize, T)> = Vec::with_capacity(a.nnz_in_row[original]);
            for slot in 0..width {
                let (col, val) = a.entry(original, slot);
                if col < n {
                    let mapped = if col < m { coloring.perm[col] } else { col };
                    entries.push((mapped, val));
                }
            }
            entries.sort_by_key(|&(col, _)| col);
            entries
        })
        .collect_into_vec(&mut gathered);

    let mut col_ind = vec![INVALID_INDEX; width * m];
    let mut values = vec![T::zero(); width * m];
    let mut nnz_in_row = Vec::with_capacity(m);
    let mut diag_idx = Vec::with_capacity(m);
    let mut inv_diag = Vec::with_capacity(m);

    for (new_row, entries) in gathered.iter().enumerate() {
        for (slot, &(col, val)) in entries.iter().enumerate() {
            col_ind[slot * m + new_row] = col;
            values[slot * m + new_row] = val;
        }
        let diag = match entries.iter().position(|&(col, _)| col == new_row) {
            Some(slot) => slot,
            None => panic!("row {} lost its diagonal during permutation", new_row),
        };
        nnz_in_row.push(entries.len());
        diag_idx.push(diag);
        inv_diag.push(T::one() / entries[diag].1);
    }

    a.col_ind = AVec::from_iter(CACHE_LINE, col_ind.into_iter());
    a.values = AVec::from_iter(CACHE_LINE, values.into_iter());
    a.nnz_in_row = nnz_in_row;
    a.diag_idx = diag_idx;
    a.inv_diag = inv_diag;
    a.row_hash.clear();
    a.coloring = Some(coloring);
}

/// Scatters the locally owned entries of a vector into block order; any
/// halo tail beyond the permutation length is copied through unchanged.
pub fn permute_vector<T: Copy>(perm: &[usize], v: &[T]) -> Vec<T> {
    assert!(v.len() >= perm.len(), "vector shorter than the permutation");
    let mut out = v.to_vec();
    for (original, &position) in perm.iter().enumerate() {
        out[position] = v[original];
    }
    out
}

/// Gathers a block-ordered vector back into the original row numbering.
pub fn unpermute_vector<T: Copy>(perm: &[usize], v: &[T]) -> Vec<T> {
    assert!(v.len() >= perm.len(), "vector shorter than the permutation");
    let mut out = v.to_vec();
    for (original, &position) in perm.iter().enumerate() {
        out[original] = v[position];
    }
    out
}
