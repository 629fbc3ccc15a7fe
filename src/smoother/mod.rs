//! Multicolor symmetric Gauss-Seidel sweeps
//!
//! Both entry points run on a matrix that [`crate::prepare`] has colored
//! and permuted: blocks are contiguous row ranges, processed in ascending
//! order forward and descending order backward, rows inside a block in
//! parallel. [`sweep`] handles an arbitrary starting iterate and the
//! distributed halo protocol; [`sweep_zero`] is the specialization for an
//! all-zero start that skips every term known to vanish.

pub mod kernels;

use std::fmt;

use num_traits::Float;

use crate::exchange::HaloExchange;
use crate::matrix::ell::EllMatrix;

/// Failure signal of the sweep entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepError {
    /// The matrix has no installed coloring; run [`crate::prepare`] first.
    MissingColoring,
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::MissingColoring => {
                write!(f, "matrix has no multicolor execution plan installed")
            }
        }
    }
}

impl std::error::Error for SweepError {}

/// Performs one symmetric Gauss-Seidel sweep with `r` as right-hand side,
/// updating `x` in place.
///
/// For a distributed matrix the boundary exchange is started before any
/// local work, overlaps with the interior block, and is completed before
/// the halo correction; later blocks consume halo columns as ordinary
/// entries.
///
/// # Arguments
///
/// * `a` - Colored, permuted matrix
/// * `r` - Right-hand side, in block order, covering the local rows
/// * `x` - Iterate, in block order, length equal to the local column count
/// * `exchange` - Boundary exchange collaborator; [`crate::exchange::NoExchange`]
///   for a single partition
///
/// # Panics
///
/// Panics if the vector lengths do not match the matrix shape.
pub fn sweep<T, E>(a: &EllMatrix<T>, r: &[T], x: &mut [T], exchange: &mut E) -> Result<(), SweepError>
where
    T: Float + Send + Sync,
    E: HaloExchange<T>,
{
    assert_eq!(
        x.len(),
        a.n_cols,
        "x length must equal the local column count"
    );
    assert!(r.len() >= a.n_rows, "r must cover the local rows");

    let coloring = a.coloring.as_ref().ok_or(SweepError::MissingColoring)?;
    if coloring.n_blocks == 0 {
        return Ok(());
    }

    let distributed = a.halo.is_some();
    if distributed {
        exchange.begin(x);
    }

    // Interior block: overlaps with the exchange, so halo columns stay out
    // of its sums until the correction pass.
    let interior_limit = if distributed { a.n_rows } else { a.n_cols };
    kernels::sweep_block(a, r, x, 0, coloring.sizes[0], interior_limit);

    if distributed {
        exchange.complete(x);
        kernels::halo_correct(a, x);
    }

    // Solve L
    for block in 1..coloring.n_blocks {
        kernels::sweep_block(
            a,
            r,
            x,
            coloring.offsets[block],
            coloring.sizes[block],
            a.n_cols,
        );
    }

    // Solve U
    for block in (0..=coloring.upper_start).rev() {
        kernels::sweep_block(
            a,
            r,
            x,
            coloring.offsets[block],
            coloring.sizes[block],
            a.n_cols,
        );
    }

    Ok(())
}

/// Performs one symmetric Gauss-Seidel sweep assuming `x` is all zeros on
/// entry.
///
/// Equivalent to [`sweep`] on a zeroed iterate, but the forward pass skips
/// every neighbor term that is still zero and no boundary exchange takes
/// place; the halo region stays zero throughout.
///
/// # Panics
///
/// Panics if the vector lengths do not match the matrix shape.
pub fn sweep_zero<T>(a: &EllMatrix<T>, r: &[T], x: &mut [T]) -> Result<(), SweepError>
where
    T: Float + Send + Sync,
{
    assert_eq!(
        x.len(),
        a.n_cols,
        "x length must equal the local column count"
    );
    assert!(r.len() >= a.n_rows, "r must cover the local rows");

    let coloring = a.coloring.as_ref().ok_or(SweepError::MissingColoring)?;
    if coloring.n_blocks == 0 {
        return Ok(());
    }

    // Solve L
    kernels::pointwise_block(a, r, x, coloring.sizes[0]);
    for block in 1..coloring.n_blocks {
        kernels::forward_block_zero(a, r, x, coloring.offsets[block], coloring.sizes[block]);
    }

    // Solve U
    for block in (0..=coloring.upper_start).rev() {
        kernels::backward_block_zero(a, x, coloring.offsets[block], coloring.sizes[block]);
    }

    Ok(())
}
