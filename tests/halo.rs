//! Distributed sweep: halo correction against a sequential equivalent
//!
//! One partition of a global 1D Laplacian is swept with a StaticExchange
//! standing in for the transport. The distributed sweep must match the
//! sequential reference run on the same local matrix with the halo region
//! preset to the received values: the interior pass defers the halo
//! columns and the correction pass folds them back in, so the net update
//! is the full row sum either way.

mod common;

use common::max_abs_diff;
use mcgs::{
    prepare, reference_symgs, sweep, EllMatrix, HaloPart, McgsConfig, StaticExchange, Workspace,
};

/// Rows 0..4 of an 8-row 1D Laplacian chain, with row 3 coupled to the
/// neighbor partition through halo column 4. Hash keys are crafted so the
/// coloring resolves in one round: high-keyed rows become the first block.
fn partition_matrix(keys: [u64; 4]) -> EllMatrix<f64> {
    let rows = vec![
        vec![(0, 2.5), (1, -1.0)],
        vec![(0, -1.0), (1, 2.5), (2, -1.0)],
        vec![(1, -1.0), (2, 2.5), (3, -1.0)],
        vec![(2, -1.0), (3, 2.5), (4, -1.0)],
    ];
    let mut a = EllMatrix::from_entries(4, 5, 3, &rows, 0);
    a.row_hash = keys.to_vec();
    a.halo = Some(HaloPart::from_entries(3, vec![3], &[vec![(4, -1.0)]]));
    a
}

const HIGH: u64 = 1 << 32;

fn check_against_reference(a: &EllMatrix<f64>, received: f64) {
    let perm = a.coloring.as_ref().unwrap().perm.clone();

    let r = mcgs::permute_vector(&perm, &[1.0, 2.0, 1.5, 0.5]);
    let x0 = mcgs::permute_vector(&perm, &[0.2, -0.1, 0.3, 0.0, 9.9]);

    let mut x = x0.clone();
    let mut exchange = StaticExchange::new(4, vec![received]);
    sweep(a, &r, &mut x, &mut exchange).unwrap();

    let mut expected = x0;
    expected[4] = received;
    reference_symgs(a, &r, &mut expected);

    assert!(max_abs_diff(&x[..4], &expected[..4]) < 1e-12);
    // The halo region is exactly what the exchange delivered.
    assert_eq!(x[4], received);
}

#[test]
fn test_halo_row_inside_leading_block() {
    // Rows 1 and 3 outrank their neighbors: block 0 = {1, 3}.
    let mut a = partition_matrix([0, HIGH + 1, 2, HIGH + 3]);
    let mut workspace = Workspace::new();
    prepare(&mut a, &McgsConfig::default(), &mut workspace);

    let coloring = a.coloring.as_ref().unwrap();
    assert_eq!(coloring.sizes[0], 2);
    // The halo row lands in the leading block, taking the correction path.
    assert!(coloring.perm[3] < coloring.sizes[0]);

    check_against_reference(&a, 0.6);
}

#[test]
fn test_halo_row_in_later_block() {
    // Rows 0 and 2 outrank their neighbors: block 0 = {0, 2} and the halo
    // row's coupling is consumed as an ordinary entry of its own block.
    let mut a = partition_matrix([HIGH, 1, HIGH + 2, 3]);
    let mut workspace = Workspace::new();
    prepare(&mut a, &McgsConfig::default(), &mut workspace);

    let coloring = a.coloring.as_ref().unwrap();
    assert_eq!(coloring.sizes[0], 2);
    assert!(coloring.perm[3] >= coloring.sizes[0]);

    check_against_reference(&a, -0.4);
}

#[test]
fn test_halo_correction_changes_the_boundary_row() {
    // Sweeping with a zero received value must differ from a nonzero one
    // in the boundary row, proving the halo actually feeds the result.
    let mut a = partition_matrix([0, HIGH + 1, 2, HIGH + 3]);
    let mut workspace = Workspace::new();
    prepare(&mut a, &McgsConfig::default(), &mut workspace);

    let perm = a.coloring.as_ref().unwrap().perm.clone();
    let r = mcgs::permute_vector(&perm, &[1.0, 2.0, 1.5, 0.5]);

    let mut x_zero = vec![0.0; 5];
    let mut exchange = StaticExchange::new(4, vec![0.0]);
    sweep(&a, &r, &mut x_zero, &mut exchange).unwrap();

    let mut x_fed = vec![0.0; 5];
    let mut exchange = StaticExchange::new(4, vec![2.0]);
    sweep(&a, &r, &mut x_fed, &mut exchange).unwrap();

    let boundary = perm[3];
    assert!((x_zero[boundary] - x_fed[boundary]).abs() > 1e-12);
}
