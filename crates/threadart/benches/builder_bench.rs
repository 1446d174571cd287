//! Criterion benchmarks for the greedy builder.
//! Measures batches of 100 chords on noisy rasters, with full scoring and
//! with half the candidates sampled.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use threadart::prelude::*;

fn noisy(size: usize, seed: u64) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    Raster::from_fn(size, size, |_, _| rng.gen_range(0.0..255.0))
}

fn bench_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder");
    group.sample_size(10);
    let ring = HookRing::new(180, 400).unwrap();
    let cache = CoverageCache::build(&ring, 10);
    let src = noisy(400, 43);
    for &fraction in &[1.0f64, 0.5] {
        let cfg = BuildCfg {
            n_lines: 100,
            sample_fraction: fraction,
            ..BuildCfg::default()
        };
        group.bench_with_input(
            BenchmarkId::new("100_chords", format!("{fraction}")),
            &cfg,
            |b, &cfg| {
                b.iter_batched(
                    || StdRng::seed_from_u64(44),
                    |rng| {
                        PathBuilder::new(&cache, &src, &WeightMaps::None, cfg, rng)
                            .unwrap()
                            .run(&mut NoProgress)
                            .unwrap()
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_builder);
criterion_main!(benches);
