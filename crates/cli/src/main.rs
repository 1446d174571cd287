use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use threadart::penalty::Normalization;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod output;
mod pipeline;
mod prepare;
mod provenance;
mod render;

use pipeline::{build_geometry, clamp_geometry, clamp_lines, clamp_wheel_m, run_job, Inputs, Job, Prepared};

#[derive(Parser)]
#[command(name = "threadart")]
#[command(about = "Greedy thread portrait generator")]
struct Cmd {
    /// Log per-image preparation details
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build one thread path and write render, instructions and summary
    Run(RunArgs),
    /// Sweep a grid of parameters, one output directory per combination
    Grid(GridArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NormArg {
    None,
    Length,
    WeightedLength,
}

impl From<NormArg> for Normalization {
    fn from(n: NormArg) -> Self {
        match n {
            NormArg::None => Normalization::None,
            NormArg::Length => Normalization::Length,
            NormArg::WeightedLength => Normalization::WeightedLength,
        }
    }
}

#[derive(Args)]
struct InputArgs {
    /// Source image
    src: PathBuf,
    /// Single importance map (black = important)
    #[arg(long, conflicts_with_all = ["wpos", "wneg"])]
    weighted: Option<PathBuf>,
    /// Importance map for under-darkened pixels
    #[arg(long, requires = "wneg")]
    wpos: Option<PathBuf>,
    /// Importance map for over-darkened pixels
    #[arg(long, requires = "wpos")]
    wneg: Option<PathBuf>,
}

impl InputArgs {
    fn inputs(&self) -> Inputs {
        Inputs {
            src: self.src.clone(),
            weighted: self.weighted.clone(),
            wpos: self.wpos.clone(),
            wneg: self.wneg.clone(),
        }
    }
}

#[derive(Args)]
struct SearchArgs {
    /// Defaults to weighted-length with weight maps, length otherwise
    #[arg(long, value_enum)]
    normalization: Option<NormArg>,
    #[arg(long, default_value_t = 0.5)]
    sample_fraction: f64,
    /// Hooks closer than this (circularly) are never joined
    #[arg(long, default_value_t = 10)]
    min_separation: usize,
    /// Drawn from the clock and logged when absent
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    no_progress_renders: bool,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, default_value = "out")]
    dst_dir: PathBuf,
    #[arg(long, default_value_t = 180)]
    hooks: usize,
    #[arg(long, default_value_t = 2500)]
    lines: usize,
    /// Physical wheel diameter in meters
    #[arg(long, default_value_t = 0.54)]
    wheel_m: f64,
    /// Wheel diameter in pixels
    #[arg(long, default_value_t = 1500)]
    wheel_p: usize,
    #[arg(long, default_value_t = 250.0)]
    darkness: f64,
    #[arg(long, default_value_t = 0.0)]
    lightness_penalty: f64,
    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Args)]
struct GridArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Parent of the per-combination directories
    #[arg(long, default_value = ".")]
    dst_root: PathBuf,
    #[arg(long, value_delimiter = ',', default_values_t = [180usize])]
    hooks: Vec<usize>,
    /// Thread widths in millimetres; wheel_p = 1 / width_m
    #[arg(long, value_delimiter = ',', default_values_t = [0.5f64, 0.8])]
    line_w_mm: Vec<f64>,
    #[arg(long, value_delimiter = ',', default_values_t = [2500usize])]
    lines: Vec<usize>,
    #[arg(long, value_delimiter = ',', default_values_t = [250.0f64])]
    darkness: Vec<f64>,
    #[arg(long, value_delimiter = ',', default_values_t = [0.0f64])]
    lightness_penalty: Vec<f64>,
    #[arg(long, value_delimiter = ',', default_values_t = [0.54f64])]
    wheel_m: Vec<f64>,
    #[command(flatten)]
    search: SearchArgs,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Run(args) => run(args),
        Action::Grid(args) => grid(args),
        Action::Report => report(),
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

fn job(search: &SearchArgs, n_lines: usize, wheel_m: f64, darkness: f64, lp: f64, seed: u64) -> Job {
    Job {
        n_lines,
        wheel_m: clamp_wheel_m(wheel_m),
        darkness,
        lightness_penalty: lp,
        normalization: search.normalization.map(Normalization::from),
        sample_fraction: search.sample_fraction,
        seed,
        progress_renders: !search.no_progress_renders,
    }
}

fn run(args: RunArgs) -> Result<()> {
    let inputs = args.input.inputs();
    inputs.check_exist()?;
    let (n_hooks, wheel_p) = clamp_geometry(args.hooks, args.wheel_p);
    let n_lines = clamp_lines(args.lines, n_hooks);
    let seed = resolve_seed(args.search.seed);
    tracing::info!(
        src = %inputs.src.display(),
        n_hooks,
        n_lines,
        wheel_p,
        seed,
        dst = %args.dst_dir.display(),
        "run"
    );

    let prepared = Prepared::load(&inputs, wheel_p)?;
    let (ring, cache) = build_geometry(n_hooks, wheel_p, args.search.min_separation)?;
    let job = job(&args.search, n_lines, args.wheel_m, args.darkness, args.lightness_penalty, seed);
    let summary = run_job(&ring, &cache, &prepared, job, &args.dst_dir)?;
    tracing::info!(
        final_average_penalty = summary.final_average_penalty,
        thread_length_m = summary.thread_length_m,
        "done"
    );
    Ok(())
}

fn grid(args: GridArgs) -> Result<()> {
    let inputs = args.input.inputs();
    inputs.check_exist()?;
    let seed = resolve_seed(args.search.seed);
    tracing::info!(src = %inputs.src.display(), seed, "grid");

    for &hooks in &args.hooks {
        for &line_w_mm in &args.line_w_mm {
            let line_w_m = line_w_mm / 1000.0;
            let (n_hooks, wheel_p) = clamp_geometry(hooks, (1.0 / line_w_m) as usize);
            let prepared = Prepared::load(&inputs, wheel_p)?;
            let (ring, cache) = build_geometry(n_hooks, wheel_p, args.search.min_separation)?;
            for &lines in &args.lines {
                let n_lines = clamp_lines(lines, n_hooks);
                for &darkness in &args.darkness {
                    for &lp in &args.lightness_penalty {
                        for &wheel_m in &args.wheel_m {
                            let dir = args.dst_root.join(format!(
                                "out_{n_hooks}_{line_w_mm}_{n_lines}_{darkness}_{lp}_{wheel_m}"
                            ));
                            tracing::info!(dst = %dir.display(), "grid_point");
                            let job = job(&args.search, n_lines, wheel_m, darkness, lp, seed);
                            run_job(&ring, &cache, &prepared, job, &dir)?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::code_rev(),
        "version": threadart::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
