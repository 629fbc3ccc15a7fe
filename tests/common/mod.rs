//! Shared matrix builders and helpers for the integration tests
#![allow(dead_code)] // each test binary uses its own subset

use mcgs::EllMatrix;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Five-point stencil on an nx × ny grid: diagonal `4 + shift`, grid
/// neighbors -1. A positive shift makes the matrix strictly diagonally
/// dominant.
pub fn five_point(nx: usize, ny: usize, shift: f64, seed: u64) -> EllMatrix<f64> {
    let n = nx * ny;
    let rows: Vec<Vec<(usize, f64)>> = (0..n)
        .map(|i| {
            let (gx, gy) = (i % nx, i / nx);
            let mut row = vec![(i, 4.0 + shift)];
            if gx > 0 {
                row.push((i - 1, -1.0));
            }
            if gx + 1 < nx {
                row.push((i + 1, -1.0));
            }
            if gy > 0 {
                row.push((i - nx, -1.0));
            }
            if gy + 1 < ny {
                row.push((i + nx, -1.0));
            }
            row
        })
        .collect();
    EllMatrix::from_entries(n, n, 5, &rows, seed)
}

/// Random structurally symmetric matrix with bounded row degree and a
/// strictly dominant diagonal.
pub fn random_symmetric(n: usize, attempts: usize, seed: u64) -> EllMatrix<f64> {
    const MAX_DEGREE: usize = 5;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for _ in 0..attempts {
        let i = rng.gen_range(0..n);
        let j = rng.gen_range(0..n);
        if i != j && adj[i].len() < MAX_DEGREE && adj[j].len() < MAX_DEGREE && !adj[i].contains(&j)
        {
            adj[i].push(j);
            adj[j].push(i);
        }
    }

    let rows: Vec<Vec<(usize, f64)>> = adj
        .iter()
        .enumerate()
        .map(|(i, neighbors)| {
            let mut row = vec![(i, neighbors.len() as f64 + 1.0)];
            row.extend(neighbors.iter().map(|&j| (j, -1.0)));
            row
        })
        .collect();
    EllMatrix::from_entries(n, n, MAX_DEGREE + 1, &rows, seed)
}

/// Euclidean norm of `r - A x` over the local rows.
pub fn residual_norm(a: &EllMatrix<f64>, r: &[f64], x: &[f64]) -> f64 {
    let mut ax = vec![0.0; a.n_rows];
    a.spmv(x, &mut ax);
    r.iter()
        .zip(&ax)
        .map(|(ri, axi)| (ri - axi) * (ri - axi))
        .sum::<f64>()
        .sqrt()
}

/// Deterministic, mildly varied right-hand side.
pub fn varied_rhs(n: usize) -> Vec<f64> {
    (0..n).map(|i| 1.0 + 0.25 * ((i * 7 + 3) % 11) as f64).collect()
}

/// Largest absolute difference between two slices.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
