//! Hook geometry: evenly spaced pegs on the frame circle.
//!
//! Model
//! - `n` hooks at angles `θ_k = 2πk/n`, `k = 0..n`, counter-clockwise in raster
//!   coordinates starting at angle 0.
//! - Radius `r = pixel_size/2 - 1`; position `(r(1 + cos θ) + 0.5, r(1 + sin θ) + 0.5)`,
//!   so the ring sits one pixel inside the raster and centers on the pixel grid.
//!
//! Code cross-refs: `coverage::CoverageCache` (rasterizes chords between these
//! positions), `export::PathExport` (thread length).

use nalgebra::Vector2;

use crate::error::ThreadError;

/// Fixed hook positions for one `(n_hooks, pixel_size)` pair. Immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct HookRing {
    positions: Vec<Vector2<f64>>,
    pixel_size: usize,
}

impl HookRing {
    pub fn new(n_hooks: usize, pixel_size: usize) -> Result<Self, ThreadError> {
        if n_hooks < 3 {
            return Err(ThreadError::config(format!(
                "n_hooks must be >= 3, got {n_hooks}"
            )));
        }
        if pixel_size < 4 {
            return Err(ThreadError::config(format!(
                "pixel diameter must be >= 4, got {pixel_size}"
            )));
        }
        let radius = pixel_size as f64 / 2.0 - 1.0;
        let step = std::f64::consts::TAU / n_hooks as f64;
        let positions = (0..n_hooks)
            .map(|k| {
                let theta = k as f64 * step;
                Vector2::new(
                    radius * (1.0 + theta.cos()) + 0.5,
                    radius * (1.0 + theta.sin()) + 0.5,
                )
            })
            .collect();
        Ok(Self {
            positions,
            pixel_size,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Side length of the square raster the ring is laid out on.
    #[inline]
    pub fn pixel_size(&self) -> usize {
        self.pixel_size
    }

    #[inline]
    pub fn position(&self, hook: usize) -> Vector2<f64> {
        self.positions[hook]
    }

    #[inline]
    pub fn positions(&self) -> &[Vector2<f64>] {
        &self.positions
    }

    /// Euclidean pixel distance between two hooks.
    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        (self.positions[a] - self.positions[b]).norm()
    }

    /// Hops between two hooks going the short way around the ring.
    #[inline]
    pub fn circular_distance(&self, a: usize, b: usize) -> usize {
        circular_distance(self.len(), a, b)
    }
}

/// `min(|a - b|, n - |a - b|)`.
#[inline]
pub fn circular_distance(n_hooks: usize, a: usize, b: usize) -> usize {
    let d = a.abs_diff(b);
    d.min(n_hooks - d)
}

/// Pair admissibility under a minimum separation: index difference strictly
/// between `min_separation` and `n_hooks - min_separation`.
#[inline]
pub fn is_admissible(n_hooks: usize, min_separation: usize, a: usize, b: usize) -> bool {
    let d = a.abs_diff(b);
    d > min_separation && d + min_separation < n_hooks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_hooks_sit_on_axes() {
        let ring = HookRing::new(4, 10).unwrap();
        assert_eq!(ring.len(), 4);
        let expect = [(8.5, 4.5), (4.5, 8.5), (0.5, 4.5), (4.5, 0.5)];
        for (k, (x, y)) in expect.into_iter().enumerate() {
            let p = ring.position(k);
            assert!((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9, "hook {k}: {p:?}");
        }
        assert!((ring.distance(0, 2) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn hooks_lie_on_circle_inside_raster() {
        let size = 101;
        let ring = HookRing::new(37, size).unwrap();
        let c = Vector2::new(size as f64 / 2.0 - 0.5, size as f64 / 2.0 - 0.5);
        let r = size as f64 / 2.0 - 1.0;
        for p in ring.positions() {
            assert!(((p - c).norm() - r).abs() < 1e-9);
            assert!(p.x >= 0.0 && p.y >= 0.0);
            assert!(p.x < size as f64 && p.y < size as f64);
        }
    }

    #[test]
    fn rejects_too_few_hooks() {
        assert!(HookRing::new(2, 100).unwrap_err().is_config());
        assert!(HookRing::new(3, 3).is_err());
        assert!(HookRing::new(3, 4).is_ok());
    }

    #[test]
    fn admissibility_matches_circular_distance() {
        let n = 20;
        for sep in 0..6 {
            for a in 0..n {
                for b in 0..n {
                    let expect = a != b && circular_distance(n, a, b) > sep;
                    assert_eq!(is_admissible(n, sep, a, b), expect, "a={a} b={b} sep={sep}");
                }
            }
        }
    }
}
