//! Two-phase parallel count reduction
//!
//! Counting how many rows hold a given color runs in two phases: the rows
//! are cut into chunks, each chunk sums its matches in parallel into a
//! partial-sum slot, and the partials are then reduced. The partial buffer
//! lives in a caller-owned [`Workspace`] so repeated coloring calls reuse
//! one allocation instead of sharing hidden scratch.

use rayon::prelude::*;

/// Upper bound on the number of partial sums a reduction produces.
pub const REDUCTION_GROUPS: usize = 256;

/// Caller-owned scratch for the coloring passes: the reduction partials and
/// the double buffer the round kernel writes its decisions into.
///
/// Allocate once, pass into every coloring call.
#[derive(Default)]
pub struct Workspace {
    /// Per-chunk partial sums of the active reduction.
    partials: Vec<usize>,
    /// Round decision buffer; swapped with the live color array each round.
    pub(crate) round_colors: Vec<i32>,
}

impl Workspace {
    /// Creates an empty workspace; buffers grow on first use.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Counts the rows holding `color`, using the workspace for partial sums.
pub fn count_color(colors: &[i32], color: i32, ws: &mut Workspace) -> usize {
    if colors.is_empty() {
        return 0;
    }

    // Phase 1: per-chunk partial sums.
    let chunk = colors.len().div_ceil(REDUCTION_GROUPS);
    colors
        .par_chunks(chunk)
        .map(|rows| rows.iter().filter(|&&c| c == color).count())
        .collect_into_vec(&mut ws.partials);

    // Phase 2: reduce the partials.
    ws.partials.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_color() {
        let mut ws = Workspace::new();
        let colors = vec![0, 1, 1, -1, 2, 1, 0];
        assert_eq!(count_color(&colors, 1, &mut ws), 3);
        assert_eq!(count_color(&colors, -1, &mut ws), 1);
        assert_eq!(count_color(&colors, 5, &mut ws), 0);
    }

    #[test]
    fn test_count_color_many_chunks() {
        let mut ws = Workspace::new();
        let colors: Vec<i32> = (0..10_000).map(|i| (i % 7) as i32).collect();
        assert_eq!(count_color(&colors, 3, &mut ws), 10_000 / 7 + 1);
        assert_eq!(count_color(&colors, 0, &mut ws), 10_000 / 7 + 1);
    }

    #[test]
    fn test_empty() {
        let mut ws = Workspace::new();
        assert_eq!(count_color(&[], 0, &mut ws), 0);
    }
}
