//! Block ordering: stable sort of rows by color
//!
//! Turns final per-row color labels into a permutation that groups rows
//! contiguously by ascending color id while preserving the original
//! relative order inside each color (stability). The sort is a
//! least-significant-digit radix sort over (key = color, value = original
//! row index) pairs, running only as many 8-bit passes as the observed
//! color range needs; each pass is a counting sort, so the whole
//! permutation is deterministic given deterministic colors.

use crate::utils::exclusive_scan;

/// Builds the block-order permutation from final color labels.
///
/// Returns `(perm, iperm)` where `perm[original_row] = position` and
/// `iperm[position] = original_row`.
///
/// # Arguments
///
/// * `colors` - Final per-row labels; every entry must be non-negative
/// * `max_color` - Largest label present, bounding the sorted bit range
///
/// # Panics
///
/// Panics if a label is negative or exceeds `max_color`.
pub fn build_permutation(colors: &[i32], max_color: i32) -> (Vec<usize>, Vec<usize>) {
    let m = colors.len();
    assert!(max_color >= 0, "max_color must be non-negative");

    let mut keys: Vec<u32> = colors
        .iter()
        .map(|&c| {
            assert!(
                c >= 0 && c <= max_color,
                "color label {} outside [0, {}]",
                c,
                max_color
            );
            c as u32
        })
        .collect();
    let mut vals: Vec<usize> = (0..m).collect();

    // Number of 8-bit digits needed to discriminate the color range.
    let bits = 32 - (max_color as u32).leading_zeros() as usize;
    let passes = bits.div_ceil(8);

    let mut keys_next = vec![0u32; m];
    let mut vals_next = vec![0usize; m];

    for pass in 0..passes {
        let shift = 8 * pass;

        let mut counts = vec![0usize; 256];
        for &key in &keys {
            counts[(key >> shift) as usize & 0xff] += 1;
        }
        let mut cursor = exclusive_scan(&counts);

        // Stable scatter: equal digits keep their input order.
        for i in 0..m {
            let digit = (keys[i] >> shift) as usize & 0xff;
            let dst = cursor[digit];
            cursor[digit] += 1;
            keys_next[dst] = keys[i];
            vals_next[dst] = vals[i];
        }

        std::mem::swap(&mut keys, &mut keys_next);
        std::mem::swap(&mut vals, &mut vals_next);
    }

    // Scatter the sorted row list into the forward permutation.
    let iperm = vals;
    let mut perm = vec![0usize; m];
    for (position, &original) in iperm.iter().enumerate() {
        perm[original] = position;
    }

    (perm, iperm)
}
