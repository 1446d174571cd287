//! Criterion benchmarks for coverage cache construction.
//! Focus sizes: hooks in {90, 180, 360} on a 500 px ring, separation 10.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use threadart::coverage::{through_pixels, CoverageCache};
use threadart::hooks::HookRing;

fn bench_coverage(c: &mut Criterion) {
    let mut group = c.benchmark_group("coverage");
    group.sample_size(10);
    for &n in &[90usize, 180, 360] {
        let ring = HookRing::new(n, 500).unwrap();
        group.bench_with_input(BenchmarkId::new("build", n), &ring, |b, ring| {
            b.iter(|| CoverageCache::build(ring, 10))
        });
    }
    let ring = HookRing::new(180, 1500).unwrap();
    group.bench_function("through_pixels_diameter_1500", |b| {
        b.iter(|| through_pixels(ring.position(0), ring.position(90)))
    });
    group.finish();
}

criterion_group!(benches, bench_coverage);
criterion_main!(benches);
