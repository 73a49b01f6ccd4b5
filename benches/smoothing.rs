use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pointsketch::{bezier_approx, catmull_rom, chaikin, Point, SmoothingPolicy};

fn zigzag(count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| Point::new(i as f64 * 2.5, if i % 2 == 0 { 0.0 } else { 10.0 }))
        .collect()
}

fn bench_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothing");
    for &count in &[100usize, 1_000, 10_000] {
        let points = zigzag(count);
        group.bench_with_input(BenchmarkId::new("chaikin_x2", count), &points, |b, p| {
            b.iter(|| chaikin(black_box(p), 2))
        });
        group.bench_with_input(BenchmarkId::new("catmull_rom_10", count), &points, |b, p| {
            b.iter(|| catmull_rom(black_box(p), 10))
        });
        group.bench_with_input(BenchmarkId::new("bezier_approx_3", count), &points, |b, p| {
            b.iter(|| bezier_approx(black_box(p), 3))
        });
    }
    group.finish();
}

fn bench_policy_levels(c: &mut Criterion) {
    let policy = SmoothingPolicy::default();
    let points = zigzag(1_000);
    let mut group = c.benchmark_group("policy");
    for level in 0..=3u32 {
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, &level| {
            b.iter(|| policy.apply(black_box(&points), level))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_algorithms, bench_policy_levels);
criterion_main!(benches);
