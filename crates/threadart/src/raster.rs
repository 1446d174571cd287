//! Signed intensity rasters and pixel coordinates.
//!
//! Conventions
//! - `Raster` stores one `f64` per pixel in an `nalgebra::DMatrix` with
//!   `nrows = width` (x) and `ncols = height` (y), so `raster[p]` reads as
//!   `m[(p.x, p.y)]`.
//! - Values are never clamped. The working raster of a run starts at "ink
//!   needed" (dark source pixels are large and positive) and goes negative
//!   where chords over-darken.

use nalgebra::DMatrix;
use std::ops::{Index, IndexMut};

use crate::error::ThreadError;

/// Integer raster coordinate. Orders lexicographically by `x`, then `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
}

impl Pixel {
    #[inline]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Mutable 2D grid of signed intensities (or weights).
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    data: DMatrix<f64>,
}

impl Raster {
    /// Raster filled with a constant value.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            data: DMatrix::from_element(width, height, value),
        }
    }

    /// Raster with `f(x, y)` at every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        Self {
            data: DMatrix::from_fn(width, height, |x, y| f(x, y)),
        }
    }

    /// Raster from row-major samples (`data[y * width + x]`).
    pub fn from_row_major(width: usize, height: usize, data: &[f64]) -> Result<Self, ThreadError> {
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| ThreadError::config("raster size overflows usize"))?;
        if data.len() != expected {
            return Err(ThreadError::config(format!(
                "raster expects {expected} samples for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self::from_fn(width, height, |x, y| data[y * width + x]))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn get(&self, p: Pixel) -> Option<f64> {
        self.data.get((p.x, p.y)).copied()
    }

    /// Subtract `amount` from every listed pixel. Unclamped.
    pub fn subtract_along(&mut self, pixels: &[Pixel], amount: f64) {
        for &p in pixels {
            self.data[(p.x, p.y)] -= amount;
        }
    }

    /// Iterate `(pixel, value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Pixel, f64)> + '_ {
        let w = self.width();
        self.data
            .iter()
            .enumerate()
            .map(move |(k, &v)| (Pixel::new(k % w, k / w), v))
    }

    /// Sum of all values.
    pub fn sum(&self) -> f64 {
        self.data.sum()
    }
}

impl Index<Pixel> for Raster {
    type Output = f64;
    #[inline]
    fn index(&self, p: Pixel) -> &f64 {
        &self.data[(p.x, p.y)]
    }
}

impl IndexMut<Pixel> for Raster {
    #[inline]
    fn index_mut(&mut self, p: Pixel) -> &mut f64 {
        &mut self.data[(p.x, p.y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_layout_maps_to_xy() {
        let r = Raster::from_row_major(3, 2, &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap();
        assert_eq!(r.dims(), (3, 2));
        assert_eq!(r[Pixel::new(2, 0)], 2.0);
        assert_eq!(r[Pixel::new(1, 1)], 11.0);
        assert_eq!(r.get(Pixel::new(3, 0)), None);
        assert!(Raster::from_row_major(3, 2, &[0.0; 5]).is_err());
    }

    #[test]
    fn subtract_goes_negative_unclamped() {
        let mut r = Raster::filled(4, 4, 10.0);
        let line = [Pixel::new(0, 0), Pixel::new(1, 1)];
        r.subtract_along(&line, 25.0);
        r.subtract_along(&line, 25.0);
        assert_eq!(r[Pixel::new(0, 0)], -40.0);
        assert_eq!(r[Pixel::new(1, 1)], -40.0);
        assert_eq!(r[Pixel::new(2, 2)], 10.0);
    }

    #[test]
    fn iter_visits_every_pixel_once() {
        let r = Raster::from_fn(3, 5, |x, y| (x * 10 + y) as f64);
        let seen: Vec<(Pixel, f64)> = r.iter().collect();
        assert_eq!(seen.len(), 15);
        for (p, v) in seen {
            assert_eq!(v, (p.x * 10 + p.y) as f64);
        }
        assert_eq!(r.sum(), r.iter().map(|(_, v)| v).sum::<f64>());
    }
}
