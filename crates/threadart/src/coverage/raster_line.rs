use nalgebra::Vector2;

use crate::raster::Pixel;

/// Pixels the segment between `a` and `b` passes through, sorted and deduplicated.
///
/// Endpoints are included. The segment is always walked from the
/// lexicographically smaller endpoint, so swapping `a` and `b` gives the same
/// result bit for bit. Coordinates round half to even (hooks and axis-aligned
/// samples sit on half-pixel coordinates, where this decides the pixel) and
/// are clamped at zero.
pub fn through_pixels(a: Vector2<f64>, b: Vector2<f64>) -> Vec<Pixel> {
    let (p0, p1) = if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) };
    let delta = p1 - p0;
    let steps = (delta.norm().round() as usize).max(1);
    let mut pixels: Vec<Pixel> = (0..=steps)
        .map(|k| {
            // Last sample is p1 itself; p0 + (p1 - p0) may be off by an ulp.
            let q = if k == steps {
                p1
            } else {
                p0 + delta * (k as f64) / (steps as f64)
            };
            Pixel::new(to_index(q.x), to_index(q.y))
        })
        .collect();
    pixels.sort_unstable();
    pixels.dedup();
    pixels
}

#[inline]
fn to_index(v: f64) -> usize {
    v.round_ties_even().max(0.0) as usize
}
