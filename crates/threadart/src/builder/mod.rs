//! Greedy path builder.
//!
//! Purpose
//! - Grow a hook path one chord at a time. Each step scores every admissible
//!   chord out of the current tail against the working raster and commits the
//!   best one by subtracting `darkness` along its coverage.
//!
//! Why this design
//! - Each commit changes the raster the next selection reads, so the loop is
//!   strictly sequential. Scoring inside one step is read-only.
//! - Randomness (start hook, candidate subsampling) comes from the injected
//!   `Rng` only; a seeded `StdRng` makes runs reproducible.
//! - Ties go to the first candidate in ascending hook order. Changing the
//!   order changes output silently, so it is covered by tests.
//! - A step always commits its best chord, even with non-positive fitness;
//!   a run adds exactly `n_lines` chords.
//!
//! Code cross-refs: `coverage::CoverageCache::candidates`, `penalty::fitness`.

mod search;
mod types;

pub use search::{build_path, max_lines, PathBuilder};
pub use types::{BuildCfg, BuilderState, NoProgress, Path, ProgressSink, ProgressSnapshot};
