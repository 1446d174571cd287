//! Provenance sidecars: `<artifact>.provenance.json` next to run outputs.
//!
//! Each sidecar names the code revision, the crate version, the callsite that
//! wrote it, the seed, the run parameters and the geometry key (hooks, pixel
//! size, separation) whose coverage cache the run used.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;
use threadart::coverage::CoverageCache;

/// Metadata recorded next to a generated artifact.
pub struct Payload {
    pub params: Value,
    pub seed: Option<u64>,
    pub geometry: Option<Value>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self { params, seed: None, geometry: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Record the cache key: artifacts sharing it were built from the same chords.
    pub fn with_geometry(mut self, cache: &CoverageCache) -> Self {
        self.geometry = Some(json!({
            "n_hooks": cache.n_hooks(),
            "pixel_size": cache.pixel_size(),
            "min_separation": cache.min_separation(),
            "chords": cache.len(),
        }));
        self
    }
}

/// Write the sidecar for `artifact` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = provenance_path(artifact);
    let callsite = Location::caller();
    let doc = json!({
        "code_rev": code_rev(),
        "version": threadart::VERSION,
        "callsite": format!("{}:{}", callsite.file(), callsite.line()),
        "seed": payload.seed,
        "geometry": payload.geometry,
        "params": payload.params,
        "outputs": [artifact.to_string_lossy()],
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

/// `dir/out.png` → `dir/out.provenance.json`.
fn provenance_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| "artifact".into(), |s| s.to_string_lossy().into_owned());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// Build-time `GIT_COMMIT`, then runtime `GIT_COMMIT`, then `git rev-parse`.
pub fn code_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_owned)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    from_env.or_else(git_head).unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_owned())
}
