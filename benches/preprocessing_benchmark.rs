// Preprocessing benchmark - measure windowing + resize time for CT slices
//
// Run with: cargo bench --bench preprocessing_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ich_ensemble::combine_mean;
use ich_windowing::{
    prepare_slice, resize_bilinear, stack_channels, Calibration, PreprocessConfig, RawGrid,
    CANONICAL_WINDOWS,
};
use ndarray::Array2;

/// Synthetic slice: stored values in the usual 12-bit CT range
fn test_grid(size: usize) -> RawGrid {
    let pixels = Array2::from_shape_fn((size, size), |(y, x)| ((x * 7 + y * 13) % 4096) as f32);
    RawGrid::new(pixels, Calibration::new(-1024.0, 1.0, false)).expect("valid grid")
}

/// Full pipeline at common acquisition matrix sizes
fn bench_prepare_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_slice");
    let config = PreprocessConfig::default();

    for size in [256usize, 512, 1024] {
        let grid = test_grid(size);
        group.bench_with_input(BenchmarkId::new("canonical", size), &grid, |b, grid| {
            b.iter(|| {
                let prepared = prepare_slice(black_box(grid), &config).expect("prepare");
                black_box(prepared);
            });
        });
    }

    group.finish();
}

/// Individual stages on a 512x512 slice
fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let grid = test_grid(512);

    group.bench_function("stack_channels", |b| {
        b.iter(|| black_box(stack_channels(black_box(&grid), &CANONICAL_WINDOWS).expect("stack")));
    });

    let plane = grid.calibrated();
    group.bench_function("resize_bilinear_512_to_256", |b| {
        b.iter(|| black_box(resize_bilinear(black_box(plane.view()), 256, 256)));
    });

    let outputs: Vec<[f32; 6]> = (0..5)
        .map(|i| {
            let p = i as f32 / 5.0;
            [p, 1.0 - p, 0.5, p * 0.5, 0.1, 0.9]
        })
        .collect();
    group.bench_function("combine_mean_5", |b| {
        b.iter(|| black_box(combine_mean(black_box(&outputs)).expect("combine")));
    });

    group.finish();
}

criterion_group!(benches, bench_prepare_slice, bench_stages);
criterion_main!(benches);
