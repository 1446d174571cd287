//! Coverage cache keyed by canonical chords.

use std::collections::HashMap;

use crate::hooks::{is_admissible, HookRing};
use crate::raster::Pixel;

use super::raster_line::through_pixels;

/// Unordered pair of distinct hooks, stored as `(min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Chord {
    lo: usize,
    hi: usize,
}

impl Chord {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b, "a chord joins two distinct hooks");
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    /// Hooks in ascending order.
    #[inline]
    pub fn hooks(&self) -> (usize, usize) {
        (self.lo, self.hi)
    }
}

/// Pixel coverage of every admissible chord of one `HookRing`.
///
/// Read-only after `build`; safe to share across threads and across runs
/// with the same hook count, pixel size and separation.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageCache {
    n_hooks: usize,
    pixel_size: usize,
    min_separation: usize,
    lines: HashMap<Chord, Vec<Pixel>>,
}

impl CoverageCache {
    pub fn build(ring: &HookRing, min_separation: usize) -> Self {
        Self::build_with_progress(ring, min_separation, |_, _| {})
    }

    /// Like `build`, calling `progress(done, total)` after each chord.
    pub fn build_with_progress(
        ring: &HookRing,
        min_separation: usize,
        mut progress: impl FnMut(usize, usize),
    ) -> Self {
        let pairs = admissible_pairs(ring.len(), min_separation);
        let total = pairs.len();
        let mut lines = HashMap::with_capacity(total);
        for (done, chord) in pairs.into_iter().enumerate() {
            let (a, b) = chord.hooks();
            lines.insert(chord, through_pixels(ring.position(a), ring.position(b)));
            progress(done + 1, total);
        }
        Self {
            n_hooks: ring.len(),
            pixel_size: ring.pixel_size(),
            min_separation,
            lines,
        }
    }

    #[inline]
    pub fn n_hooks(&self) -> usize {
        self.n_hooks
    }

    #[inline]
    pub fn pixel_size(&self) -> usize {
        self.pixel_size
    }

    #[inline]
    pub fn min_separation(&self) -> usize {
        self.min_separation
    }

    /// Number of cached chords.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn get(&self, chord: Chord) -> Option<&[Pixel]> {
        self.lines.get(&chord).map(Vec::as_slice)
    }

    /// Coverage of the chord `a–b`, in either order. `None` if not admissible.
    #[inline]
    pub fn coverage(&self, a: usize, b: usize) -> Option<&[Pixel]> {
        if a == b {
            return None;
        }
        self.get(Chord::new(a, b))
    }

    #[inline]
    pub fn is_admissible(&self, a: usize, b: usize) -> bool {
        is_admissible(self.n_hooks, self.min_separation, a, b)
    }

    /// Admissible next hooks from `tail`, ascending by hook index.
    pub fn candidates(&self, tail: usize) -> Vec<usize> {
        (0..self.n_hooks)
            .filter(|&b| self.is_admissible(tail, b))
            .collect()
    }

    /// Iterate `(chord, pixels)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (Chord, &[Pixel])> + '_ {
        self.lines.iter().map(|(c, px)| (*c, px.as_slice()))
    }
}

/// All admissible `i < j` pairs, ascending.
fn admissible_pairs(n_hooks: usize, min_separation: usize) -> Vec<Chord> {
    let mut out = Vec::new();
    for j in 0..n_hooks {
        for i in 0..j {
            if is_admissible(n_hooks, min_separation, i, j) {
                out.push(Chord::new(i, j));
            }
        }
    }
    out
}
