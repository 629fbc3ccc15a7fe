//! Fixed-width (ELL) sparse matrix storage
//!
//! The ELL format stores every row in a uniform number of slots:
//! - col_ind: slot-major array of size width × n_rows, where the entry for
//!   (slot, row) lives at `slot * n_rows + row`
//! - values: slot-major value array of the same shape
//! - empty slots hold [`INVALID_INDEX`] and contribute zero to every sum
//!
//! Slot-major layout keeps the rows of one slot contiguous, so row-parallel
//! kernels stream each slot across the whole block. The arrays live in
//! cache-line-aligned storage.

use std::fmt;

use aligned_vec::AVec;
use num_traits::Float;
use rayon::prelude::*;

use crate::coloring::hash;

/// Sentinel stored in empty slots; out of range for any valid column.
pub const INVALID_INDEX: usize = usize::MAX;

/// Alignment for the slot-major arrays, in bytes.
pub const CACHE_LINE: usize = 64;

/// Multicolor execution plan written back into the matrix after setup.
///
/// Rows are grouped into blocks of one color each; the permutation maps the
/// assembly-time row numbering into block order.
pub struct Coloring {
    /// Per-row color label in the original row numbering.
    pub colors: Vec<i32>,
    /// Color id of each block, strictly ascending.
    pub block_colors: Vec<i32>,
    /// Number of rows in each block.
    pub sizes: Vec<usize>,
    /// Block start positions; `offsets[k + 1] = offsets[k] + sizes[k]`.
    pub offsets: Vec<usize>,
    /// Number of blocks.
    pub n_blocks: usize,
    /// Index of the first block the backward sweep processes.
    pub upper_start: usize,
    /// original row -> position in block order
    pub perm: Vec<usize>,
    /// position in block order -> original row
    pub iperm: Vec<usize>,
}

/// Halo coupling data for one partition of a distributed matrix.
///
/// Rows are identified in the original (pre-permutation) local numbering;
/// columns point into the halo receive region `n_rows..n_cols` of the
/// iterate. Entries duplicate the halo columns of the main ELL arrays: the
/// copy here feeds the block-0 correction pass, the main-array copy feeds
/// the later forward blocks and the backward sweep.
pub struct HaloPart<T> {
    /// Number of rows with halo coupling.
    pub n_rows: usize,
    /// Slot count per halo row.
    pub width: usize,
    /// Local row index (original numbering) of each halo row.
    pub row_ind: Vec<usize>,
    /// Slot-major halo column indices, sentinel-padded.
    pub col_ind: Vec<usize>,
    /// Slot-major halo values.
    pub values: Vec<T>,
}

impl<T> HaloPart<T>
where
    T: Float,
{
    /// Builds a halo part from per-row entry lists.
    ///
    /// # Arguments
    ///
    /// * `width` - Slot count per halo row
    /// * `row_ind` - Local row index of each halo row
    /// * `rows` - For each halo row, its (column, value) entries
    ///
    /// # Panics
    ///
    /// Panics if `rows` and `row_ind` disagree in length or a row carries
    /// more entries than `width`.
    pub fn from_entries(width: usize, row_ind: Vec<usize>, rows: &[Vec<(usize, T)>]) -> Self {
        assert_eq!(
            rows.len(),
            row_ind.len(),
            "one entry list per halo row is required"
        );

        let n_rows = rows.len();
        let mut col_ind = vec![INVALID_INDEX; width * n_rows];
        let mut values = vec![T::zero(); width * n_rows];

        for (r, entries) in rows.iter().enumerate() {
            assert!(
                entries.len() <= width,
                "halo row {} holds {} entries, width is {}",
                r,
                entries.len(),
                width
            );
            for (slot, &(col, val)) in entries.iter().enumerate() {
                col_ind[slot * n_rows + r] = col;
                values[slot * n_rows + r] = val;
            }
        }

        Self {
            n_rows,
            width,
            row_ind,
            col_ind,
            values,
        }
    }
}

/// A sparse matrix in fixed-width (ELL) format, with the side metadata the
/// coloring and smoothing passes need: per-row diagonal location, inverse
/// diagonal, and a pseudo-random hash key per row.
pub struct EllMatrix<T> {
    /// Number of locally owned rows (m).
    pub n_rows: usize,

    /// Number of local columns (n ≥ m); columns `m..n` form the halo
    /// receive region.
    pub n_cols: usize,

    /// Slot count per row (W).
    pub width: usize,

    /// Slot-major column indices, size width × n_rows; empty slots hold
    /// [`INVALID_INDEX`].
    pub col_ind: AVec<usize>,

    /// Slot-major values, size width × n_rows.
    pub values: AVec<T>,

    /// Valid entries per row.
    pub nnz_in_row: Vec<usize>,

    /// Slot index of the diagonal entry of each row.
    pub diag_idx: Vec<usize>,

    /// Reciprocal of the diagonal value of each row.
    pub inv_diag: Vec<T>,

    /// Pseudo-random hash key per row; drained once the matrix is permuted.
    pub row_hash: Vec<u64>,

    /// Execution plan; present after [`crate::prepare`] has run.
    pub coloring: Option<Coloring>,

    /// Halo coupling; present when the matrix is one partition of a
    /// distributed problem.
    pub halo: Option<HaloPart<T>>,
}

impl<T> EllMatrix<T>
where
    T: Float,
{
    /// Creates an ELL matrix from per-row (column, value) entry lists.
    ///
    /// Entries are sorted by column within each row; empty slots are padded
    /// with [`INVALID_INDEX`]. Row hash keys are generated from `seed`.
    ///
    /// # Arguments
    ///
    /// * `n_rows` - Number of locally owned rows
    /// * `n_cols` - Number of local columns (≥ `n_rows`)
    /// * `width` - Slot count per row
    /// * `rows` - For each row, its (column, value) entries; every row must
    ///   contain a nonzero diagonal entry
    /// * `seed` - Seed for the row hash keys
    ///
    /// # Panics
    ///
    /// Panics if the shape arguments are inconsistent, a row overflows the
    /// width, a column index is out of range or duplicated, or a diagonal
    /// entry is missing or zero.
    pub fn from_entries(
        n_rows: usize,
        n_cols: usize,
        width: usize,
        rows: &[Vec<(usize, T)>],
        seed: u64,
    ) -> Self {
        assert_eq!(rows.len(), n_rows, "one entry list per row is required");
        assert!(n_cols >= n_rows, "n_cols must be at least n_rows");
        assert!(width > 0, "width must be positive");

        let mut col_ind = vec![INVALID_INDEX; width * n_rows];
        let mut values = vec![T::zero(); width * n_rows];
        let mut nnz_in_row = Vec::with_capacity(n_rows);
        let mut diag_idx = Vec::with_capacity(n_rows);
        let mut inv_diag = Vec::with_capacity(n_rows);

        for (row, entries) in rows.iter().enumerate() {
            assert!(
                entries.len() <= width,
                "row {} holds {} entries, width is {}",
                row,
                entries.len(),
                width
            );

            let mut sorted = entries.clone();
            sorted.sort_by_key(|&(col, _)| col);

            let mut diag = None;
            for (slot, &(col, val)) in sorted.iter().enumerate() {
                assert!(
                    col < n_cols,
                    "row {}: column {} out of bounds (n_cols = {})",
                    row,
                    col,
                    n_cols
                );
                if slot > 0 {
                    assert_ne!(sorted[slot - 1].0, col, "row {}: duplicate column {}", row, col);
                }
                if col == row {
                    assert!(!val.is_zero(), "row {}: zero diagonal", row);
                    diag = Some(slot);
                }
                col_ind[slot * n_rows + row] = col;
                values[slot * n_rows + row] = val;
            }

            let diag = match diag {
                Some(slot) => slot,
                None => panic!("row {}: missing diagonal entry", row),
            };

            nnz_in_row.push(sorted.len());
            diag_idx.push(diag);
            inv_diag.push(T::one() / sorted[diag].1);
        }

        Self {
            n_rows,
            n_cols,
            width,
            col_ind: AVec::from_iter(CACHE_LINE, col_ind.into_iter()),
            values: AVec::from_iter(CACHE_LINE, values.into_iter()),
            nnz_in_row,
            diag_idx,
            inv_diag,
            row_hash: hash::row_hashes(n_rows, seed),
            coloring: None,
            halo: None,
        }
    }

    /// Returns the total number of valid entries in the matrix.
    pub fn nnz(&self) -> usize {
        self.nnz_in_row.iter().sum()
    }

    /// Returns the (column, value) pair stored at a slot.
    #[inline]
    pub fn entry(&self, row: usize, slot: usize) -> (usize, T) {
        let idx = slot * self.n_rows + row;
        (self.col_ind[idx], self.values[idx])
    }

    /// Returns an iterator over the valid (column, value) entries of a row.
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        assert!(row < self.n_rows, "row index out of bounds");
        let n_cols = self.n_cols;
        (0..self.width)
            .map(move |slot| self.entry(row, slot))
            .filter(move |&(col, _)| col < n_cols)
    }
}

impl<T> EllMatrix<T>
where
    T: Float + Send + Sync,
{
    /// Computes `y[0..n_rows] = A · x` over the valid slots, diagonal
    /// included.
    ///
    /// # Panics
    ///
    /// Panics if `x` is shorter than the local column count or `y` is
    /// shorter than the row count.
    pub fn spmv(&self, x: &[T], y: &mut [T]) {
        assert!(x.len() >= self.n_cols, "x must cover the local columns");
        assert!(y.len() >= self.n_rows, "y must cover the local rows");

        let m = self.n_rows;
        let n = self.n_cols;
        y[..m].par_iter_mut().enumerate().for_each(|(row, yi)| {
            let mut sum = T::zero();
            for slot in 0..self.width {
                let idx = slot * m + row;
                let col = self.col_ind[idx];
                if col < n {
                    sum = self.values[idx].mul_add(x[col], sum);
                }
            }
            *yi = sum;
        });
    }
}

impl<T: fmt::Debug + Float> fmt::Debug for EllMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "EllMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  width: {}", self.width)?;
        writeln!(f, "  colored: {}", self.coloring.is_some())?;

        let max_rows_to_print = 5.min(self.n_rows);
        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;
            for row in 0..max_rows_to_print {
                write!(f, "    row {}: ", row)?;
                for slot in 0..self.width {
                    let (col, val) = self.entry(row, slot);
                    if col < self.n_cols {
                        write!(f, "({}, {:?}) ", col, val)?;
                    }
                }
                writeln!(f)?;
            }
            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal(n: usize) -> EllMatrix<f64> {
        let rows: Vec<Vec<(usize, f64)>> = (0..n)
            .map(|i| {
                let mut row = vec![(i, 2.0)];
                if i > 0 {
                    row.push((i - 1, -1.0));
                }
                if i + 1 < n {
                    row.push((i + 1, -1.0));
                }
                row
            })
            .collect();
        EllMatrix::from_entries(n, n, 3, &rows, 7)
    }

    #[test]
    fn test_from_entries_layout() {
        let a = tridiagonal(4);

        assert_eq!(a.n_rows, 4);
        assert_eq!(a.nnz(), 10);
        assert_eq!(a.diag_idx, vec![0, 1, 1, 1]);
        assert_eq!(a.inv_diag, vec![0.5; 4]);

        // Entries come back sorted by column.
        let row1: Vec<_> = a.row_entries(1).collect();
        assert_eq!(row1, vec![(0, -1.0), (1, 2.0), (2, -1.0)]);

        // Unused slots hold the sentinel.
        assert_eq!(a.entry(0, 2).0, INVALID_INDEX);
    }

    #[test]
    fn test_spmv_tridiagonal() {
        let a = tridiagonal(4);
        let x = [1.0, 2.0, 3.0, 4.0];
        let mut y = [0.0; 4];
        a.spmv(&x, &mut y);
        assert_eq!(y, [0.0, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_halo_part_from_entries() {
        let halo = HaloPart::from_entries(2, vec![3], &[vec![(4, -1.0f64)]]);
        assert_eq!(halo.n_rows, 1);
        assert_eq!(halo.col_ind, vec![4, INVALID_INDEX]);
        assert_eq!(halo.values, vec![-1.0, 0.0]);
    }

    #[test]
    #[should_panic(expected = "missing diagonal entry")]
    fn test_missing_diagonal() {
        EllMatrix::from_entries(2, 2, 2, &[vec![(0, 1.0f64)], vec![(0, 1.0)]], 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_column_out_of_range() {
        EllMatrix::from_entries(2, 2, 2, &[vec![(0, 1.0f64), (5, 1.0)], vec![(1, 1.0)]], 0);
    }
}
