//! Errors surfaced by the core.
//!
//! Zero normalization denominators are not errors: `penalty::fitness` returns
//! `0.0` for them and the run continues.

use std::fmt;

/// Errors surfaced by hook generation, weight setup and the path builder.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadError {
    /// Invalid run configuration; detected before any raster mutation.
    Config { reason: String },
    /// No admissible next hook from `hook` under the separation constraint.
    EmptyCandidateSet { hook: usize },
}

impl ThreadError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True for configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl fmt::Display for ThreadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => write!(f, "invalid configuration: {reason}"),
            Self::EmptyCandidateSet { hook } => write!(
                f,
                "no admissible next hook from hook {hook} (too few hooks for the separation)"
            ),
        }
    }
}

impl std::error::Error for ThreadError {}
