//! Timing probe: greedy path on a synthetic radial gradient.
//!
//! Purpose
//! - Give a reproducible, image-free data point for "how long do cache build
//!   and 1000 chords take at 180 hooks / 600 px?"
//!
//! Run: `cargo run --release -p threadart --example radial_gradient`

use std::time::Instant;

use threadart::prelude::*;

fn main() {
    let size = 600;
    let ring = HookRing::new(180, size).expect("valid ring");

    let t0 = Instant::now();
    let cache = CoverageCache::build(&ring, 10);
    let cache_ms = t0.elapsed().as_secs_f64() * 1e3;

    // Dark centre fading to white at the rim; zero outside the circle.
    let c = (size as f64 - 1.0) / 2.0;
    let src = Raster::from_fn(size, size, |x, y| {
        let r = ((x as f64 - c).powi(2) + (y as f64 - c).powi(2)).sqrt();
        if r > size as f64 / 2.0 {
            0.0
        } else {
            255.0 * (1.0 - r / (size as f64 / 2.0))
        }
    });

    let cfg = BuildCfg {
        n_lines: 1000,
        darkness: 160.0,
        lightness_penalty: 0.3,
        sample_fraction: 0.5,
        ..BuildCfg::default()
    };
    let t1 = Instant::now();
    let path = build_path(&cache, &src, &WeightMaps::None, cfg, 7).expect("path");
    let build_ms = t1.elapsed().as_secs_f64() * 1e3;
    let export = PathExport::new(&path, &ring, 0.54);

    println!("chords_cached={} cache_time_ms={cache_ms:.3}", cache.len());
    println!(
        "chords={} thread_m={:.2} build_time_ms={build_ms:.3}",
        export.n_chords, export.thread_length
    );
}
