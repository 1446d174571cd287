//! Path metrics and export.
//!
//! The renderer and the instruction printer live outside the core; they take
//! a `PathExport` (hook order plus physical thread length) and the `HookRing`.

use crate::builder::Path;
use crate::hooks::HookRing;

/// Thread length in pixels: sum of consecutive hook distances.
pub fn pixel_length(path: &Path, ring: &HookRing) -> f64 {
    path.hooks()
        .windows(2)
        .map(|w| ring.distance(w[0], w[1]))
        .sum()
}

/// Physical thread length for a frame of `physical_diameter` (any unit; the
/// result is in the same unit).
pub fn thread_length(path: &Path, ring: &HookRing, physical_diameter: f64) -> f64 {
    pixel_length(path, ring) * (physical_diameter / ring.pixel_size() as f64)
}

impl Path {
    /// See [`thread_length`].
    #[inline]
    pub fn thread_length(&self, ring: &HookRing, physical_diameter: f64) -> f64 {
        thread_length(self, ring, physical_diameter)
    }
}

/// Finished run as handed to renderers and instruction writers.
#[derive(Clone, Debug, PartialEq)]
pub struct PathExport {
    /// Hook order to follow by hand.
    pub hooks: Vec<usize>,
    pub n_chords: usize,
    pub thread_length: f64,
}

impl PathExport {
    pub fn new(path: &Path, ring: &HookRing, physical_diameter: f64) -> Self {
        Self {
            hooks: path.hooks().to_vec(),
            n_chords: path.n_chords(),
            thread_length: thread_length(path, ring, physical_diameter),
        }
    }

    /// Rebuild the `Path` (e.g. to recompute metrics).
    pub fn to_path(&self) -> Path {
        Path::from_hooks(self.hooks.clone())
    }
}
