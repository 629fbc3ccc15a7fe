//! # MCGS: Multicolor Gauss-Seidel
//!
//! MCGS is a multicolor symmetric Gauss-Seidel smoother for fixed-width
//! (ELL) sparse matrices, with the parallel graph coloring that makes the
//! inherently sequential sweep safe to run block-parallel, and with halo
//! correction for matrices partitioned across cooperating processes.
//!
//! ## Overview
//!
//! Symmetric Gauss-Seidel updates each row from the latest values of its
//! neighbors, which orders the rows into a chain. MCGS breaks the chain
//! the standard way for parallel iterative methods:
//!
//! 1. **Coloring**: a randomized Jones–Plassmann–Luby variant partitions
//!    the rows into independent sets (colors), two colors per round.
//!
//! 2. **Ordering**: a stable radix sort turns the color labels into a
//!    permutation grouping rows contiguously by color, and the matrix
//!    storage is rewritten into that block order.
//!
//! 3. **Smoothing**: forward and backward sweeps process blocks in order
//!    with all rows of a block updating in parallel; a distributed matrix
//!    overlaps its boundary exchange with the first block and folds the
//!    received halo values in afterwards.
//!
//! ## Usage
//!
//! ```
//! use mcgs::{prepare, sweep_zero, EllMatrix, McgsConfig, Workspace};
//!
//! // 1D Laplacian on 3 points.
//! let rows = vec![
//!     vec![(0, 2.0), (1, -1.0)],
//!     vec![(0, -1.0), (1, 2.0), (2, -1.0)],
//!     vec![(1, -1.0), (2, 2.0)],
//! ];
//! let mut a = EllMatrix::from_entries(3, 3, 3, &rows, 1);
//!
//! let mut workspace = Workspace::new();
//! prepare(&mut a, &McgsConfig::default(), &mut workspace);
//!
//! // The matrix now lives in block order; vectors follow it there.
//! let perm = a.coloring.as_ref().unwrap().perm.clone();
//! let r = mcgs::permute_vector(&perm, &[1.0, 0.0, 1.0]);
//!
//! let mut x = vec![0.0; 3];
//! sweep_zero(&a, &r, &mut x).unwrap();
//! ```

pub mod coloring;
pub mod exchange;
pub mod matrix;
pub mod ordering;
pub mod smoother;
pub mod utils;

use num_traits::Float;

// Re-export primary components
pub use coloring::{
    color_rows, count_color, terminal_block_exclusive, validate_blocks, validate_coloring,
    Workspace,
};
pub use exchange::{HaloExchange, NoExchange, StaticExchange};
pub use matrix::config::{McgsConfig, SweepMode, SystemParameters};
pub use matrix::{
    apply_permutation, permute_vector, reference_symgs, unpermute_vector, Coloring, EllMatrix,
    HaloPart, INVALID_INDEX,
};
pub use ordering::build_permutation;
pub use smoother::{sweep, sweep_zero, SweepError};
pub use utils::{from_sprs_csr, to_dense, to_sprs_csr};

/// Colors the matrix, builds the block-order permutation, rewrites the
/// storage into block order, and bounds the backward sweep.
///
/// This is the one-call setup path from an assembled matrix to one the
/// sweep entry points accept. The result is deterministic for a fixed
/// config seed and matrix hash seed.
///
/// In [`SweepMode::Optimized`] the terminal block is checked on the
/// permuted matrix: if it has no internal coupling, so that the backward
/// pass revisiting it first would only recompute its forward result, the
/// backward sweep starts one block earlier. [`SweepMode::Reference`] keeps
/// the full backward range.
///
/// # Arguments
///
/// * `a` - Assembled matrix; its coloring artifacts are overwritten
/// * `config` - Seed, sweep mode and round parameters
/// * `workspace` - Caller-owned coloring scratch, reusable across calls
pub fn prepare<T>(a: &mut EllMatrix<T>, config: &McgsConfig, workspace: &mut Workspace)
where
    T: Float + Send + Sync,
{
    let assignment = coloring::color_rows(a, config, workspace);
    let (perm, iperm) = ordering::build_permutation(&assignment.colors, assignment.max_color());

    let n_blocks = assignment.sizes.len();
    a.coloring = Some(Coloring {
        colors: assignment.colors,
        block_colors: assignment.block_colors,
        sizes: assignment.sizes,
        offsets: assignment.offsets,
        n_blocks,
        upper_start: n_blocks.saturating_sub(1),
        perm,
        iperm,
    });

    matrix::apply_permutation(a);

    if config.sweep_mode == SweepMode::Optimized
        && n_blocks > 1
        && coloring::terminal_block_exclusive(a)
    {
        if let Some(coloring) = a.coloring.as_mut() {
            coloring.upper_start = n_blocks - 2;
        }
    }
}

/// Version information for the MCGS library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
