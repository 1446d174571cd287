//! Configuration, state and output types for the path builder.

use crate::coverage::Chord;
use crate::penalty::Normalization;

/// Run configuration of the greedy builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildCfg {
    /// Chords to add; the path ends up with `n_lines + 1` hooks.
    pub n_lines: usize,
    /// Intensity removed along a committed chord, in `[0, 255]`.
    pub darkness: f64,
    /// Weight of over-darkened pixels relative to under-darkened ones, in `[0, 1]`.
    pub lightness_penalty: f64,
    pub normalization: Normalization,
    /// Fraction of candidates scored per step, in `(0, 1]`. `1` scores all.
    pub sample_fraction: f64,
    /// Fixed start hook; drawn from the RNG when `None`.
    pub start_hook: Option<usize>,
    /// Emit a progress snapshot every this many chords.
    pub progress_every: usize,
}

impl Default for BuildCfg {
    fn default() -> Self {
        Self {
            n_lines: 2500,
            darkness: 250.0,
            lightness_penalty: 0.0,
            normalization: Normalization::Length,
            sample_fraction: 1.0,
            start_hook: None,
            progress_every: 100,
        }
    }
}

/// Builder lifecycle. `Initializing` completes inside `PathBuilder::new`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    Initializing,
    Selecting,
    Committing,
    Done,
}

/// Ordered hook sequence; consecutive hooks form the chords.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    hooks: Vec<usize>,
}

impl Path {
    pub(crate) fn start(hook: usize, capacity: usize) -> Self {
        let mut hooks = Vec::with_capacity(capacity);
        hooks.push(hook);
        Self { hooks }
    }

    pub(crate) fn push(&mut self, hook: usize) {
        self.hooks.push(hook);
    }

    /// Wrap an existing hook sequence (e.g. one read back from an export).
    pub fn from_hooks(hooks: Vec<usize>) -> Self {
        Self { hooks }
    }

    #[inline]
    pub fn hooks(&self) -> &[usize] {
        &self.hooks
    }

    #[inline]
    pub fn tail(&self) -> Option<usize> {
        self.hooks.last().copied()
    }

    /// Number of chords (`hooks - 1`, or 0 for an empty path).
    #[inline]
    pub fn n_chords(&self) -> usize {
        self.hooks.len().saturating_sub(1)
    }

    pub fn chords(&self) -> impl Iterator<Item = Chord> + '_ {
        self.hooks.windows(2).map(|w| Chord::new(w[0], w[1]))
    }
}

/// Periodic progress report for an external sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressSnapshot {
    /// Chords committed so far.
    pub iteration: usize,
    pub n_lines: usize,
    pub average_penalty: f64,
    pub initial_average_penalty: f64,
}

/// Receiver of progress snapshots. The builder itself never prints.
pub trait ProgressSink {
    fn on_progress(&mut self, snapshot: &ProgressSnapshot);
}

/// Sink that drops every snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline]
    fn on_progress(&mut self, _snapshot: &ProgressSnapshot) {}
}

impl<F: FnMut(&ProgressSnapshot)> ProgressSink for F {
    #[inline]
    fn on_progress(&mut self, snapshot: &ProgressSnapshot) {
        self(snapshot)
    }
}
