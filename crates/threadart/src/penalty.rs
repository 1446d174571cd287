//! Penalty model and chord fitness.
//!
//! Penalty
//! - Per pixel with residual `v` and weights `(w_pos, w_neg)`:
//!   `v·w_pos` if `v > 0`, `-λ·v·w_neg` if `v < 0`, else 0, where `λ` is the
//!   lightness penalty in `[0, 1]`. Lower is better.
//! - Unweighted runs use `(1, 1)`; single-map runs use `(w, w)`, so the sign is
//!   always taken from the unweighted residual.
//!
//! Fitness
//! - Penalty drop over a chord's pixels if `darkness` were subtracted there,
//!   divided by the normalization denominator. Purely local: nothing outside
//!   the chord is looked at, which is what makes the search greedy.
//! - A zero denominator gives fitness 0.

use crate::raster::{Pixel, Raster};
use crate::weights::WeightMaps;

/// Denominator used when scoring a chord.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// Raw improvement; long chords are favored.
    None,
    /// Improvement per covered pixel.
    #[default]
    Length,
    /// Improvement per unit of weight along the chord (needs a weight map).
    WeightedLength,
}

/// Penalty contribution of one residual value.
#[inline]
pub fn pixel_penalty(v: f64, w_pos: f64, w_neg: f64, lightness_penalty: f64) -> f64 {
    if v > 0.0 {
        v * w_pos
    } else if v < 0.0 {
        -lightness_penalty * v * w_neg
    } else {
        0.0
    }
}

/// Total penalty of a raster.
pub fn penalty(raster: &Raster, weights: &WeightMaps, lightness_penalty: f64) -> f64 {
    raster
        .iter()
        .map(|(p, v)| {
            let (wp, wn) = weights.pair(p);
            pixel_penalty(v, wp, wn, lightness_penalty)
        })
        .sum()
}

/// Penalty per pixel, the figure reported in progress snapshots.
pub fn average_penalty(raster: &Raster, weights: &WeightMaps, lightness_penalty: f64) -> f64 {
    let n = raster.width() * raster.height();
    if n == 0 {
        return 0.0;
    }
    penalty(raster, weights, lightness_penalty) / n as f64
}

/// Fitness of darkening `pixels` by `darkness`. Does not touch `raster`.
pub fn fitness(
    raster: &Raster,
    pixels: &[Pixel],
    darkness: f64,
    lightness_penalty: f64,
    weights: &WeightMaps,
    normalization: Normalization,
) -> f64 {
    let mut improvement = 0.0;
    let mut weight_len = 0.0;
    for &p in pixels {
        let old = raster[p];
        let (wp, wn) = weights.pair(p);
        improvement += pixel_penalty(old, wp, wn, lightness_penalty)
            - pixel_penalty(old - darkness, wp, wn, lightness_penalty);
        if let Some(w) = weights.length_weight(p) {
            weight_len += w;
        }
    }
    let norm = match normalization {
        Normalization::None => 1.0,
        Normalization::Length => pixels.len() as f64,
        Normalization::WeightedLength => weight_len,
    };
    if norm == 0.0 {
        0.0
    } else {
        improvement / norm
    }
}
