//! Greedy Selecting → Committing loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coverage::{Chord, CoverageCache};
use crate::error::ThreadError;
use crate::penalty::{average_penalty, fitness, Normalization};
use crate::raster::Raster;
use crate::weights::WeightMaps;

use super::types::{BuildCfg, BuilderState, NoProgress, Path, ProgressSink, ProgressSnapshot};

/// Build a path with a `StdRng` seeded from `seed` and no progress sink.
pub fn build_path(
    cache: &CoverageCache,
    source: &Raster,
    weights: &WeightMaps,
    cfg: BuildCfg,
    seed: u64,
) -> Result<Path, ThreadError> {
    PathBuilder::new(cache, source, weights, cfg, StdRng::seed_from_u64(seed))?.run(&mut NoProgress)
}

/// Largest chord count a run may request for `n_hooks` hooks.
#[inline]
pub fn max_lines(n_hooks: usize) -> usize {
    n_hooks * n_hooks.saturating_sub(1) / 2
}

/// Greedy path builder owning the working raster of one run.
pub struct PathBuilder<'a, R> {
    cache: &'a CoverageCache,
    weights: &'a WeightMaps,
    cfg: BuildCfg,
    rng: R,
    raster: Raster,
    path: Path,
    state: BuilderState,
    initial_average_penalty: f64,
}

impl<'a, R: Rng> PathBuilder<'a, R> {
    /// Validate the configuration, pick the start hook and copy the source.
    ///
    /// Every configuration error is reported here, before any selection.
    pub fn new(
        cache: &'a CoverageCache,
        source: &Raster,
        weights: &'a WeightMaps,
        cfg: BuildCfg,
        mut rng: R,
    ) -> Result<Self, ThreadError> {
        validate(cache, source, weights, &cfg)?;
        let n = cache.n_hooks();
        let start = match cfg.start_hook {
            Some(h) => h,
            None => rng.gen_range(0..n),
        };
        let raster = source.clone();
        let initial_average_penalty = average_penalty(&raster, weights, cfg.lightness_penalty);
        Ok(Self {
            cache,
            weights,
            cfg,
            rng,
            raster,
            path: Path::start(start, cfg.n_lines + 1),
            state: BuilderState::Selecting,
            initial_average_penalty,
        })
    }

    #[inline]
    pub fn state(&self) -> BuilderState {
        self.state
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current tail hook.
    #[inline]
    pub fn tail(&self) -> usize {
        self.path.tail().unwrap_or_default()
    }

    /// Working raster (residual ink still needed).
    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            iteration: self.path.n_chords(),
            n_lines: self.cfg.n_lines,
            average_penalty: average_penalty(
                &self.raster,
                self.weights,
                self.cfg.lightness_penalty,
            ),
            initial_average_penalty: self.initial_average_penalty,
        }
    }

    /// One Selecting → Committing iteration. `Ok(None)` once done.
    pub fn step(&mut self) -> Result<Option<Chord>, ThreadError> {
        if self.state == BuilderState::Done {
            return Ok(None);
        }
        self.state = BuilderState::Selecting;
        let next = self.select()?;
        self.state = BuilderState::Committing;
        let chord = self.commit(next);
        self.state = if self.path.n_chords() >= self.cfg.n_lines {
            BuilderState::Done
        } else {
            BuilderState::Selecting
        };
        Ok(Some(chord))
    }

    /// Drive the loop to `Done`, reporting to `sink`, and return the path.
    pub fn run<S: ProgressSink>(mut self, sink: &mut S) -> Result<Path, ThreadError> {
        let every = self.cfg.progress_every;
        while self.state != BuilderState::Done {
            let i = self.path.n_chords();
            if i > 0 && i % every == 0 {
                sink.on_progress(&self.snapshot());
            }
            self.step()?;
        }
        sink.on_progress(&self.snapshot());
        Ok(self.path)
    }

    /// Best next hook from the tail; first-seen wins ties.
    fn select(&mut self) -> Result<usize, ThreadError> {
        let tail = self.tail();
        let mut candidates = self.cache.candidates(tail);
        if candidates.is_empty() {
            return Err(ThreadError::EmptyCandidateSet { hook: tail });
        }
        if self.cfg.sample_fraction < 1.0 {
            candidates = subsample(&mut self.rng, candidates, self.cfg.sample_fraction);
        }
        let mut best: Option<(usize, f64)> = None;
        for hook in candidates {
            let Some(pixels) = self.cache.coverage(tail, hook) else {
                continue;
            };
            let f = fitness(
                &self.raster,
                pixels,
                self.cfg.darkness,
                self.cfg.lightness_penalty,
                self.weights,
                self.cfg.normalization,
            );
            if best.map_or(true, |(_, bf)| f > bf) {
                best = Some((hook, f));
            }
        }
        best.map(|(hook, _)| hook)
            .ok_or(ThreadError::EmptyCandidateSet { hook: tail })
    }

    fn commit(&mut self, next: usize) -> Chord {
        let chord = Chord::new(self.tail(), next);
        if let Some(pixels) = self.cache.get(chord) {
            self.raster.subtract_along(pixels, self.cfg.darkness);
        }
        self.path.push(next);
        chord
    }
}

/// Keep `max(1, ⌊len·fraction⌋)` candidates drawn without replacement, in
/// their original (ascending) order.
fn subsample<R: Rng>(rng: &mut R, candidates: Vec<usize>, fraction: f64) -> Vec<usize> {
    let len = candidates.len();
    let keep = ((len as f64 * fraction).floor() as usize).clamp(1, len);
    let mut picked = rand::seq::index::sample(rng, len, keep).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|k| candidates[k]).collect()
}

fn validate(
    cache: &CoverageCache,
    source: &Raster,
    weights: &WeightMaps,
    cfg: &BuildCfg,
) -> Result<(), ThreadError> {
    let n = cache.n_hooks();
    if n < 3 {
        return Err(ThreadError::config(format!("n_hooks must be >= 3, got {n}")));
    }
    if cfg.n_lines == 0 {
        return Err(ThreadError::config("n_lines must be >= 1"));
    }
    if cfg.n_lines > max_lines(n) {
        return Err(ThreadError::config(format!(
            "n_lines {} exceeds the maximum {} for {n} hooks",
            cfg.n_lines,
            max_lines(n)
        )));
    }
    if !(0.0..=255.0).contains(&cfg.darkness) {
        return Err(ThreadError::config(format!(
            "darkness must lie in [0, 255], got {}",
            cfg.darkness
        )));
    }
    if !(0.0..=1.0).contains(&cfg.lightness_penalty) {
        return Err(ThreadError::config(format!(
            "lightness_penalty must lie in [0, 1], got {}",
            cfg.lightness_penalty
        )));
    }
    if !(cfg.sample_fraction > 0.0 && cfg.sample_fraction <= 1.0) {
        return Err(ThreadError::config(format!(
            "sample_fraction must lie in (0, 1], got {}",
            cfg.sample_fraction
        )));
    }
    if cfg.progress_every == 0 {
        return Err(ThreadError::config("progress_every must be >= 1"));
    }
    if let Some(h) = cfg.start_hook {
        if h >= n {
            return Err(ThreadError::config(format!(
                "start hook {h} out of range for {n} hooks"
            )));
        }
    }
    let size = cache.pixel_size();
    if source.dims() != (size, size) {
        return Err(ThreadError::config(format!(
            "raster is {}x{}, hook ring expects {size}x{size}",
            source.width(),
            source.height()
        )));
    }
    weights.check_dims(source.dims())?;
    if cfg.normalization == Normalization::WeightedLength && !weights.is_weighted() {
        return Err(ThreadError::config(
            "weighted-length normalization needs a weight map",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsample_keeps_order_and_at_least_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let all: Vec<usize> = (10..30).collect();
        let half = subsample(&mut rng, all.clone(), 0.5);
        assert_eq!(half.len(), 10);
        assert!(half.windows(2).all(|w| w[0] < w[1]));
        assert!(half.iter().all(|h| all.contains(h)));
        assert_eq!(subsample(&mut rng, all.clone(), 0.001).len(), 1);
        assert_eq!(subsample(&mut rng, vec![4, 9], 0.99).len(), 1);
    }

    #[test]
    fn max_lines_is_pair_count() {
        assert_eq!(max_lines(3), 3);
        assert_eq!(max_lines(180), 16110);
    }
}
