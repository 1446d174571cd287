//! Chord rasterizer and coverage cache.
//!
//! Purpose
//! - Rasterize every admissible chord once, up front, into the sorted pixel
//!   list it passes through, so the builder's hot loop only does lookups.
//!
//! Model
//! - `through_pixels` samples `max(round(L), 1) + 1` equally spaced points on
//!   the segment, rounds them to pixels and returns the sorted, deduplicated
//!   set. Endpoints are ordered before sampling, so argument order does not
//!   matter.
//! - The cache holds only pairs whose index difference lies strictly between
//!   `min_separation` and `n_hooks - min_separation`; near-neighbour chords are
//!   short and nearly degenerate and are never candidates.
//!
//! Code cross-refs: `hooks::HookRing`, `builder::PathBuilder`, `penalty::fitness`.

mod cache;
mod raster_line;

pub use cache::{Chord, CoverageCache};
pub use raster_line::through_pixels;
