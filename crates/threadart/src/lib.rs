//! Greedy string-art core: hooks on a circle, chord coverage, penalty model
//! and the path builder.
//!
//! Pipeline
//! - `hooks::HookRing` → `coverage::CoverageCache` (rasterized chords, built once)
//!   → `builder::PathBuilder` (greedy Selecting → Committing loop scored by
//!   `penalty::fitness`) → `export::PathExport` (hook order, thread length).
//!
//! API Policy
//! - The crate does no I/O and prints nothing. Image loading, rendering and
//!   reporting belong to callers (see the `threadart` CLI crate).
//! - Randomness only enters through an explicit `rand::Rng`.

pub mod builder;
pub mod coverage;
pub mod error;
pub mod export;
pub mod hooks;
pub mod penalty;
pub mod raster;
pub mod weights;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use builder::{build_path, BuildCfg, Path, PathBuilder};
pub use error::ThreadError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::builder::{
        build_path, max_lines, BuildCfg, BuilderState, NoProgress, Path, PathBuilder,
        ProgressSink, ProgressSnapshot,
    };
    pub use crate::coverage::{through_pixels, Chord, CoverageCache};
    pub use crate::error::ThreadError;
    pub use crate::export::{thread_length, PathExport};
    pub use crate::hooks::HookRing;
    pub use crate::penalty::{average_penalty, fitness, penalty, Normalization};
    pub use crate::raster::{Pixel, Raster};
    pub use crate::weights::WeightMaps;
}
