//! Importance weight maps.
//!
//! A run is either unweighted, weighted by one map for every residual sign, or
//! weighted by a dual pair (one map where the residual is positive, another
//! where it is negative). The two weighted modes are mutually exclusive.

use crate::error::ThreadError;
use crate::raster::{Pixel, Raster};

/// Weight configuration of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum WeightMaps {
    #[default]
    None,
    Single(Raster),
    Dual { pos: Raster, neg: Raster },
}

impl WeightMaps {
    /// Assemble from optional loose maps as they arrive from the caller.
    ///
    /// Rejects a single map together with a dual pair, and a dual pair with
    /// one half missing.
    pub fn from_parts(
        single: Option<Raster>,
        pos: Option<Raster>,
        neg: Option<Raster>,
    ) -> Result<Self, ThreadError> {
        match (single, pos, neg) {
            (None, None, None) => Ok(Self::None),
            (Some(w), None, None) => Ok(Self::Single(w)),
            (None, Some(pos), Some(neg)) => Ok(Self::Dual { pos, neg }),
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ThreadError::config(
                "a single weight map and dual weight maps cannot be combined",
            )),
            (None, Some(_), None) | (None, None, Some(_)) => Err(ThreadError::config(
                "dual weighting needs both a positive and a negative map",
            )),
        }
    }

    #[inline]
    pub fn is_weighted(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// `(w_pos, w_neg)` at `p`: the weights applied to a positive and to a
    /// negative residual respectively.
    #[inline]
    pub fn pair(&self, p: Pixel) -> (f64, f64) {
        match self {
            Self::None => (1.0, 1.0),
            Self::Single(w) => {
                let v = w[p];
                (v, v)
            }
            Self::Dual { pos, neg } => (pos[p], neg[p]),
        }
    }

    /// Weight used as the per-pixel length in weighted-length normalization.
    /// `None` when the run is unweighted.
    #[inline]
    pub fn length_weight(&self, p: Pixel) -> Option<f64> {
        match self {
            Self::None => None,
            Self::Single(w) => Some(w[p]),
            Self::Dual { pos, .. } => Some(pos[p]),
        }
    }

    /// Check every map has the given dimensions.
    pub fn check_dims(&self, dims: (usize, usize)) -> Result<(), ThreadError> {
        let check = |name: &str, r: &Raster| {
            if r.dims() == dims {
                Ok(())
            } else {
                Err(ThreadError::config(format!(
                    "{name} weight map is {}x{}, raster is {}x{}",
                    r.width(),
                    r.height(),
                    dims.0,
                    dims.1
                )))
            }
        };
        match self {
            Self::None => Ok(()),
            Self::Single(w) => check("single", w),
            Self::Dual { pos, neg } => {
                check("positive", pos)?;
                check("negative", neg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(v: f64) -> Raster {
        Raster::filled(4, 4, v)
    }

    #[test]
    fn from_parts_accepts_exclusive_modes() {
        assert_eq!(WeightMaps::from_parts(None, None, None).unwrap(), WeightMaps::None);
        assert!(matches!(
            WeightMaps::from_parts(Some(map(0.5)), None, None).unwrap(),
            WeightMaps::Single(_)
        ));
        let dual = WeightMaps::from_parts(None, Some(map(1.0)), Some(map(0.25))).unwrap();
        assert_eq!(dual.pair(Pixel::new(1, 2)), (1.0, 0.25));
        assert_eq!(dual.length_weight(Pixel::new(0, 0)), Some(1.0));
    }

    #[test]
    fn from_parts_rejects_mixed_and_half_dual() {
        let mixed = WeightMaps::from_parts(Some(map(0.5)), Some(map(1.0)), Some(map(1.0)));
        assert!(mixed.unwrap_err().is_config());
        assert!(WeightMaps::from_parts(Some(map(0.5)), Some(map(1.0)), None).is_err());
        assert!(WeightMaps::from_parts(None, None, Some(map(1.0))).is_err());
    }

    #[test]
    fn check_dims_reports_mismatch() {
        let w = WeightMaps::Dual {
            pos: map(1.0),
            neg: Raster::filled(4, 5, 1.0),
        };
        assert!(w.check_dims((4, 4)).is_err());
        assert!(WeightMaps::Single(map(1.0)).check_dims((4, 4)).is_ok());
        assert!(WeightMaps::None.check_dims((100, 3)).is_ok());
    }
}
