//! Benchmarks for the sweep kernels

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mcgs::{prepare, sweep, sweep_zero, EllMatrix, McgsConfig, NoExchange, Workspace};

/// Five-point stencil on an n × n grid
fn five_point(n: usize) -> EllMatrix<f64> {
    let size = n * n;
    let rows: Vec<Vec<(usize, f64)>> = (0..size)
        .map(|i| {
            let (gx, gy) = (i % n, i / n);
            let mut row = vec![(i, 4.0)];
            if gx > 0 {
                row.push((i - 1, -1.0));
            }
            if gx + 1 < n {
                row.push((i + 1, -1.0));
            }
            if gy > 0 {
                row.push((i - n, -1.0));
            }
            if gy + 1 < n {
                row.push((i + n, -1.0));
            }
            row
        })
        .collect();
    EllMatrix::from_entries(size, size, 5, &rows, 101)
}

fn bench_sweeps(c: &mut Criterion) {
    let n = 64;
    let size = n * n;

    let mut a = five_point(n);
    let mut workspace = Workspace::new();
    prepare(&mut a, &McgsConfig::default(), &mut workspace);

    let r = vec![1.0; size];

    c.bench_function("sweep_zero_5pt_64x64", |bench| {
        bench.iter(|| {
            let mut x = vec![0.0; size];
            sweep_zero(&a, &r, &mut x).unwrap();
            black_box(&x);
        })
    });

    c.bench_function("sweep_5pt_64x64", |bench| {
        let mut x = vec![0.5; size];
        bench.iter(|| {
            sweep(&a, &r, &mut x, &mut NoExchange).unwrap();
            black_box(&x);
        })
    });
}

criterion_group!(benches, bench_sweeps);
criterion_main!(benches);
