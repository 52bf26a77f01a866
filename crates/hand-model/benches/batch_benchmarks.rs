//! Benchmarks for batched forward and backward throughput.
//!
//! Run with: `cargo bench -p hand-model`
//!
//! Measures samples per second for varying batch sizes to check scaling
//! with CPU core count when the `parallel` feature is on.

#![allow(
    missing_docs,
    clippy::cast_precision_loss,
    clippy::unwrap_used,
    clippy::ignored_unit_patterns
)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hand_model::{DMatrix, DOF_COUNT, HandConfig, HandModel, POSITION_WIDTH};
use std::hint::black_box;

/// Distinct, bounded poses so no two rows are identical.
fn poses(batch: usize) -> DMatrix<f64> {
    DMatrix::from_fn(batch, DOF_COUNT, |i, j| {
        0.5 * ((i * DOF_COUNT + j) as f64 * 0.37).sin()
    })
}

fn bench_forward_batch(c: &mut Criterion) {
    let model = HandModel::new(HandConfig::default()).unwrap();
    let mut group = c.benchmark_group("forward_batch");

    for &batch in &[1, 16, 128, 1024] {
        let dofs = poses(batch);
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &dofs, |b, dofs| {
            b.iter(|| model.forward_batch(black_box(dofs)).unwrap());
        });
    }

    group.finish();
}

fn bench_backward_batch(c: &mut Criterion) {
    let model = HandModel::new(HandConfig::default()).unwrap();
    let mut group = c.benchmark_group("backward_batch");

    for &batch in &[1, 16, 128, 1024] {
        let dofs = poses(batch);
        let upstream = DMatrix::from_element(batch, POSITION_WIDTH, 0.1);
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch),
            &(dofs, upstream),
            |b, (dofs, upstream)| {
                b.iter(|| {
                    model
                        .backward_batch(black_box(dofs), black_box(upstream))
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_single_jacobian(c: &mut Criterion) {
    let model = HandModel::new(HandConfig::default()).unwrap();
    let dofs: Vec<f64> = poses(1).iter().copied().collect();
    c.bench_function("jacobian_single", |b| {
        b.iter(|| model.jacobian(black_box(&dofs)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_forward_batch,
    bench_backward_batch,
    bench_single_jacobian
);
criterion_main!(benches);
