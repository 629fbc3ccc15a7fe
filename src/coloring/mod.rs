//! Randomized parallel graph coloring
//!
//! Rows of the matrix form a graph whose edges are the valid off-diagonal
//! entries; coloring partitions the rows into independent sets so that a
//! whole color can be smoothed in parallel. The algorithm is a
//! Jones–Plassmann–Luby variant that settles two colors per round: every
//! still-uncolored row compares hash keys against its relevant neighbors
//! and takes the round's "max" candidate if no neighbor outranks it, or the
//! "min" candidate if no neighbor ranks below it.
//!
//! Candidate pairs are drawn as (even, odd) from a small range for the
//! first rounds, so a color id keeps one role forever and a reused color
//! class remains a single independent set. Later rounds hand out fresh
//! increasing ids, which bounds the total color count once random reuse
//! stops making progress.

pub mod hash;
pub mod reduction;

use num_traits::Float;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::matrix::config::McgsConfig;
use crate::matrix::ell::EllMatrix;
use crate::utils::exclusive_scan;

pub use reduction::{count_color, Workspace, REDUCTION_GROUPS};

/// Label of a row no round has settled yet.
pub const UNCOLORED: i32 = -1;

/// Output of the coloring passes: final labels plus the canonical block
/// table, prior to any permutation.
pub struct ColorAssignment {
    /// Per-row color label; no `UNCOLORED` entries remain.
    pub colors: Vec<i32>,
    /// Color id of each block, strictly ascending.
    pub block_colors: Vec<i32>,
    /// Rows per block.
    pub sizes: Vec<usize>,
    /// Block start positions, `sizes.len() + 1` entries starting at 0.
    pub offsets: Vec<usize>,
    /// Rounds the coloring loop ran.
    pub rounds: usize,
}

impl ColorAssignment {
    /// Largest color id handed out.
    pub fn max_color(&self) -> i32 {
        self.block_colors.last().copied().unwrap_or(0)
    }
}

/// Colors every row of the matrix and builds the block table.
///
/// Each round settles the two candidate colors with a data-parallel pass
/// over the rows, then counts the newly colored rows per candidate with the
/// two-phase reduction; the loop ends when the running total reaches the
/// row count. Entries that ended up sharing a color id are merged into one
/// block and empty candidates dropped, leaving a table with strictly
/// ascending color ids and strictly increasing offsets.
///
/// Deterministic for a fixed config seed and matrix hash seed.
pub fn color_rows<T>(a: &EllMatrix<T>, config: &McgsConfig, ws: &mut Workspace) -> ColorAssignment
where
    T: Float + Send + Sync,
{
    let m = a.n_rows;
    assert_eq!(a.row_hash.len(), m, "matrix is missing its row hash keys");

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut colors = vec![UNCOLORED; m];

    // Cumulative per-color totals; differencing them yields the newly
    // colored count even when a randomized round reuses a color id.
    let mut totals: Vec<usize> = Vec::with_capacity(2 * config.randomized_colors);

    let mut colored = 0;
    let mut rounds = 0;
    let mut next_color = config.randomized_colors as i32;

    while colored < m {
        let (color1, color2) = if rounds < config.randomized_rounds {
            // Max candidates are even, min candidates odd, so a color id
            // never switches roles across rounds.
            let k = rng.gen_range(0..config.randomized_colors as i32 / 2);
            (2 * k, 2 * k + 1)
        } else {
            let c = next_color;
            next_color += 2;
            (c, c + 1)
        };

        jpl_round(a, &colors, color1, color2, &mut ws.round_colors);
        std::mem::swap(&mut colors, &mut ws.round_colors);
        rounds += 1;

        if totals.len() <= color2 as usize {
            totals.resize(color2 as usize + 1, 0);
        }

        let total1 = count_color(&colors, color1, ws);
        colored += total1 - totals[color1 as usize];
        totals[color1 as usize] = total1;

        let total2 = count_color(&colors, color2, ws);
        colored += total2 - totals[color2 as usize];
        totals[color2 as usize] = total2;
    }

    let mut block_colors = Vec::new();
    let mut sizes = Vec::new();
    for (color, &count) in totals.iter().enumerate() {
        if count > 0 {
            block_colors.push(color as i32);
            sizes.push(count);
        }
    }
    let offsets = exclusive_scan(&sizes);

    ColorAssignment {
        colors,
        block_colors,
        sizes,
        offsets,
        rounds,
    }
}

/// One coloring round: decide every uncolored row against the candidate
/// pair, writing the decisions into `next` from a consistent snapshot of
/// the round-start labels.
fn jpl_round<T>(a: &EllMatrix<T>, colors: &[i32], color1: i32, color2: i32, next: &mut Vec<i32>)
where
    T: Float + Send + Sync,
{
    let m = a.n_rows;

    (0..m)
        .into_par_iter()
        .map(|row| {
            let current = colors[row];
            if current != UNCOLORED {
                return current;
            }

            let key = (a.row_hash[row], row);
            let mut is_max = true;
            let mut is_min = true;

            for slot in 0..a.width {
                let col = a.col_ind[slot * m + row];
                // Sentinel and halo slots have no color; skip the diagonal.
                if col >= m || col == row {
                    continue;
                }

                let neighbor = colors[col];
                if neighbor == UNCOLORED || neighbor == color1 || neighbor == color2 {
                    // Strict key order; the row index breaks hash ties.
                    if (a.row_hash[col], col) > key {
                        is_max = false;
                    } else {
                        is_min = false;
                    }
                    if !(is_max || is_min) {
                        return UNCOLORED;
                    }
                }
            }

            if is_max {
                color1
            } else if is_min {
                color2
            } else {
                UNCOLORED
            }
        })
        .collect_into_vec(next);
}

/// Checks that a finished label assignment is a proper coloring: every pair
/// of rows joined by a valid off-diagonal local entry holds distinct colors,
/// and no row is left uncolored.
pub fn validate_coloring<T>(a: &EllMatrix<T>, colors: &[i32]) -> bool
where
    T: Float + Send + Sync,
{
    let m = a.n_rows;
    assert_eq!(colors.len(), m, "one label per row is required");

    (0..m).all(|row| {
        colors[row] != UNCOLORED
            && a.row_entries(row)
                .all(|(col, _)| col >= m || col == row || colors[col] != colors[row])
    })
}

/// Checks, on the permuted matrix, that no row has a neighbor inside its
/// own block. This is the invariant that makes the block-parallel sweeps
/// safe.
pub fn validate_blocks<T>(a: &EllMatrix<T>) -> bool
where
    T: Float + Send + Sync,
{
    let coloring = match a.coloring.as_ref() {
        Some(c) => c,
        None => return false,
    };

    let m = a.n_rows;
    (0..m).all(|row| {
        let block = match coloring.offsets[..coloring.n_blocks]
            .partition_point(|&offset| offset <= row)
        {
            0 => return false, // offsets[0] = 0 always covers row 0
            b => b - 1,
        };
        let lo = coloring.offsets[block];
        let hi = coloring.offsets[block + 1];
        a.row_entries(row)
            .all(|(col, _)| col == row || col >= m || col < lo || col >= hi)
    })
}

/// Checks, on the permuted matrix, that the terminal block has no
/// off-diagonal neighbors inside itself, so revisiting it first in the
/// backward sweep recomputes its forward result unchanged and the backward
/// pass may start one block earlier.
pub fn terminal_block_exclusive<T>(a: &EllMatrix<T>) -> bool
where
    T: Float + Send + Sync,
{
    let coloring = match a.coloring.as_ref() {
        Some(c) if c.n_blocks > 0 => c,
        _ => return false,
    };

    let m = a.n_rows;
    let lo = coloring.offsets[coloring.n_blocks - 1];
    (lo..m).all(|row| {
        a.row_entries(row)
            .all(|(col, _)| col == row || col < lo || col >= m)
    })
}
