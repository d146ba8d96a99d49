//! Benchmarks for relative position smoothing filters

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use iris_gaze_tracker::filters::create_filter;

fn benchmark_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");

    // Noisy relative positions sweeping across the eye
    let test_data: Vec<f64> = (0..100)
        .map(|i| {
            let t = f64::from(i) * 0.1;
            0.5 + 0.3 * t.sin() + 0.05 * (rand::random::<f64>() - 0.5)
        })
        .collect();

    for spec in ["none", "exponential:0.5", "moving_average:5", "moving_average:15", "median:5", "median:9"] {
        let mut filter = create_filter(spec).unwrap();

        group.bench_with_input(BenchmarkId::new("single_update", spec), &test_data[0], |b, &rp| {
            b.iter(|| black_box(filter.apply(black_box(rp))));
        });

        group.bench_with_input(BenchmarkId::new("sequence_100", spec), &test_data, |b, data| {
            b.iter(|| {
                filter.reset();
                for &rp in data {
                    black_box(filter.apply(black_box(rp)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_filters);
criterion_main!(benches);
