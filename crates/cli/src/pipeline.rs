//! One run end to end: geometry, inputs, greedy build, outputs.

use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use threadart::builder::{max_lines, BuildCfg, PathBuilder, ProgressSnapshot};
use threadart::coverage::CoverageCache;
use threadart::export::PathExport;
use threadart::hooks::HookRing;
use threadart::penalty::Normalization;
use threadart::raster::Raster;
use threadart::weights::WeightMaps;

use crate::output::{write_instructions, write_summary, RunSummary};
use crate::prepare::{load_raster, Channel};
use crate::provenance::{write_sidecar, Payload};
use crate::render::{save_progress_renders, save_render};

/// Input image files of a run.
#[derive(Clone, Debug)]
pub struct Inputs {
    pub src: PathBuf,
    pub weighted: Option<PathBuf>,
    pub wpos: Option<PathBuf>,
    pub wneg: Option<PathBuf>,
}

impl Inputs {
    pub fn check_exist(&self) -> Result<()> {
        let all = [Some(&self.src), self.weighted.as_ref(), self.wpos.as_ref(), self.wneg.as_ref()];
        for p in all.into_iter().flatten() {
            ensure!(p.is_file(), "file {} not found", p.display());
        }
        Ok(())
    }
}

/// Source raster and weights prepared for one wheel size.
pub struct Prepared {
    pub source: Raster,
    pub weights: WeightMaps,
}

impl Prepared {
    pub fn load(inputs: &Inputs, wheel_p: usize) -> Result<Self> {
        let source = load_raster(&inputs.src, wheel_p, Channel::Darkness)?;
        let load_weight = |p: &Option<PathBuf>| -> Result<Option<Raster>> {
            p.as_deref()
                .map(|p| load_raster(p, wheel_p, Channel::Weight))
                .transpose()
        };
        let weights = WeightMaps::from_parts(
            load_weight(&inputs.weighted)?,
            load_weight(&inputs.wpos)?,
            load_weight(&inputs.wneg)?,
        )?;
        Ok(Self { source, weights })
    }
}

/// Per-run parameters after clamping.
#[derive(Clone, Copy, Debug)]
pub struct Job {
    pub n_lines: usize,
    pub wheel_m: f64,
    pub darkness: f64,
    pub lightness_penalty: f64,
    /// Defaults to weighted length for weighted runs, length otherwise.
    pub normalization: Option<Normalization>,
    pub sample_fraction: f64,
    pub seed: u64,
    pub progress_renders: bool,
}

/// Clamp CLI values into the ranges the tool accepts.
pub fn clamp_geometry(hooks: usize, wheel_p: usize) -> (usize, usize) {
    (hooks.max(3), wheel_p.max(10))
}

pub fn clamp_lines(lines: usize, n_hooks: usize) -> usize {
    lines.clamp(1, max_lines(n_hooks).max(1))
}

pub fn clamp_wheel_m(wheel_m: f64) -> f64 {
    wheel_m.max(0.1)
}

/// Hook ring and coverage cache, logging cache progress in 10% steps.
pub fn build_geometry(n_hooks: usize, wheel_p: usize, min_separation: usize) -> Result<(HookRing, CoverageCache)> {
    let ring = HookRing::new(n_hooks, wheel_p)?;
    let t0 = Instant::now();
    let cache = CoverageCache::build_with_progress(&ring, min_separation, |done, total| {
        if done * 10 / total != (done - 1) * 10 / total {
            tracing::info!(done, total, elapsed_s = t0.elapsed().as_secs_f64(), "coverage_cache");
        }
    });
    tracing::info!(
        n_hooks,
        wheel_p,
        min_separation,
        chords = cache.len(),
        elapsed_s = t0.elapsed().as_secs_f64(),
        "geometry_ready"
    );
    Ok((ring, cache))
}

/// Run the builder and write `out.png`, progress renders, `out.txt` and
/// `summary.json` under `out_dir`, with provenance sidecars for the render and
/// the summary.
pub fn run_job(
    ring: &HookRing,
    cache: &CoverageCache,
    prepared: &Prepared,
    job: Job,
    out_dir: &Path,
) -> Result<RunSummary> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let normalization = job.normalization.unwrap_or(if prepared.weights.is_weighted() {
        Normalization::WeightedLength
    } else {
        Normalization::Length
    });
    let cfg = BuildCfg {
        n_lines: job.n_lines,
        darkness: job.darkness,
        lightness_penalty: job.lightness_penalty,
        normalization,
        sample_fraction: job.sample_fraction,
        start_hook: None,
        progress_every: 100,
    };
    let rng = StdRng::seed_from_u64(job.seed);
    let builder = PathBuilder::new(cache, &prepared.source, &prepared.weights, cfg, rng)?;
    tracing::info!(start_hook = builder.tail(), seed = job.seed, "starting hook");

    let t0 = Instant::now();
    let mut last: Option<ProgressSnapshot> = None;
    let mut sink = |s: &ProgressSnapshot| {
        let elapsed = t0.elapsed().as_secs_f64();
        let eta_s = if s.iteration > 0 {
            elapsed * (s.n_lines - s.iteration) as f64 / s.iteration as f64
        } else {
            0.0
        };
        tracing::info!(
            iteration = s.iteration,
            n_lines = s.n_lines,
            average_penalty = %format!("{:.2}", s.average_penalty),
            initial_average_penalty = %format!("{:.2}", s.initial_average_penalty),
            elapsed_s = %format!("{elapsed:.1}"),
            eta_s = %format!("{eta_s:.1}"),
            "progress"
        );
        last = Some(*s);
    };
    let path = builder.run(&mut sink)?;
    let elapsed_s = t0.elapsed().as_secs_f64();
    let export = PathExport::new(&path, ring, job.wheel_m);
    tracing::info!(
        chords = export.n_chords,
        thread_length_m = export.thread_length,
        elapsed_s,
        "path_done"
    );

    let params = json!({
        "n_hooks": ring.len(),
        "n_lines": job.n_lines,
        "wheel_m": job.wheel_m,
        "wheel_p": ring.pixel_size(),
        "darkness": job.darkness,
        "lightness_penalty": job.lightness_penalty,
        "normalization": format!("{normalization:?}"),
        "sample_fraction": job.sample_fraction,
        "min_separation": cache.min_separation(),
        "weighted": prepared.weights.is_weighted(),
    });

    let render_path = out_dir.join("out.png");
    save_render(&path, ring, &render_path)?;
    write_sidecar(&render_path, Payload::new(params.clone()).with_seed(job.seed).with_geometry(cache))?;
    if job.progress_renders {
        let files = save_progress_renders(&path, ring, out_dir, "out")?;
        tracing::info!(count = files.len(), "progress_renders");
    }

    let txt_path = out_dir.join("out.txt");
    write_instructions(&export, &txt_path)?;

    let (initial, final_avg) = last
        .map(|s| (s.initial_average_penalty, s.average_penalty))
        .unwrap_or_default();
    let summary = RunSummary {
        n_hooks: ring.len(),
        n_lines: job.n_lines,
        wheel_m: job.wheel_m,
        wheel_p: ring.pixel_size(),
        darkness: job.darkness,
        lightness_penalty: job.lightness_penalty,
        normalization: format!("{normalization:?}"),
        sample_fraction: job.sample_fraction,
        min_separation: cache.min_separation(),
        seed: job.seed,
        initial_average_penalty: initial,
        final_average_penalty: final_avg,
        elapsed_s,
        thread_length_m: export.thread_length,
        hooks: export.hooks,
    };
    let summary_path = out_dir.join("summary.json");
    write_summary(&summary, &summary_path)?;
    write_sidecar(&summary_path, Payload::new(params).with_seed(job.seed).with_geometry(cache))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn clamps_follow_tool_limits() {
        assert_eq!(clamp_geometry(1, 4), (3, 10));
        assert_eq!(clamp_lines(0, 6), 1);
        assert_eq!(clamp_lines(100, 6), 15);
        assert_eq!(clamp_wheel_m(0.0), 0.1);
    }

    #[test]
    fn run_job_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        let mut img = GrayImage::from_pixel(32, 32, Luma([255]));
        for x in 0..32 {
            img.put_pixel(x, 16, Luma([0]));
        }
        img.save(&src).unwrap();
        let inputs = Inputs { src, weighted: None, wpos: None, wneg: None };
        inputs.check_exist().unwrap();

        let prepared = Prepared::load(&inputs, 24).unwrap();
        let (ring, cache) = build_geometry(12, 24, 2).unwrap();
        let job = Job {
            n_lines: 20,
            wheel_m: 0.5,
            darkness: 200.0,
            lightness_penalty: 0.0,
            normalization: None,
            sample_fraction: 1.0,
            seed: 7,
            progress_renders: true,
        };
        let out = dir.path().join("out_12");
        let summary = run_job(&ring, &cache, &prepared, job, &out).unwrap();
        assert_eq!(summary.hooks.len(), 21);
        assert_eq!(summary.normalization, "Length");
        assert!(summary.initial_average_penalty > 0.0);
        assert!(summary.final_average_penalty.is_finite());
        for f in ["out.png", "out.txt", "summary.json", "out.provenance.json", "summary.provenance.json"] {
            assert!(out.join(f).exists(), "{f}");
        }
        let sidecar: serde_json::Value =
            serde_json::from_slice(&fs::read(out.join("summary.provenance.json")).unwrap()).unwrap();
        assert_eq!(sidecar["geometry"]["n_hooks"], 12);
        assert_eq!(sidecar["seed"], 7);
        let text = std::fs::read_to_string(out.join("out.txt")).unwrap();
        assert!(text.starts_with("distance = "));
    }

    #[test]
    fn mixed_weight_maps_fail_while_loading() {
        let dir = tempfile::tempdir().unwrap();
        let file = |name: &str| {
            let p = dir.path().join(name);
            GrayImage::from_pixel(16, 16, Luma([90])).save(&p).unwrap();
            p
        };
        let inputs = Inputs {
            src: file("src.png"),
            weighted: Some(file("w.png")),
            wpos: Some(file("pos.png")),
            wneg: None,
        };
        inputs.check_exist().unwrap();
        let err = Prepared::load(&inputs, 16).err().unwrap();
        let cause = err.downcast_ref::<threadart::ThreadError>().unwrap();
        assert!(cause.is_config());
        let half_dual = Inputs { weighted: None, ..inputs };
        assert!(Prepared::load(&half_dual, 16).is_err());
    }

    #[test]
    fn missing_inputs_are_reported() {
        let inputs = Inputs {
            src: PathBuf::from("/nonexistent/src.png"),
            weighted: None,
            wpos: None,
            wneg: None,
        };
        let err = inputs.check_exist().unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
