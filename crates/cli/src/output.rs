//! Human-readable instructions and the JSON run summary.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use threadart::export::PathExport;

/// Hooks per line in the threading instructions.
const HOOKS_PER_LINE: usize = 100;

/// `distance = N meters` followed by the hook sequence, 100 hooks per line.
pub fn instructions(export: &PathExport) -> String {
    let mut out = format!("distance = {} meters\n", export.thread_length as u64);
    for block in export.hooks.chunks(HOOKS_PER_LINE) {
        let line: Vec<String> = block.iter().map(|h| h.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

pub fn write_instructions(export: &PathExport, out: &Path) -> Result<()> {
    fs::write(out, instructions(export)).with_context(|| format!("writing {}", out.display()))
}

/// Everything needed to reproduce and assess one run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub n_hooks: usize,
    pub n_lines: usize,
    pub wheel_m: f64,
    pub wheel_p: usize,
    pub darkness: f64,
    pub lightness_penalty: f64,
    pub normalization: String,
    pub sample_fraction: f64,
    pub min_separation: usize,
    pub seed: u64,
    pub initial_average_penalty: f64,
    pub final_average_penalty: f64,
    pub elapsed_s: f64,
    pub thread_length_m: f64,
    pub hooks: Vec<usize>,
}

pub fn write_summary(summary: &RunSummary, out: &Path) -> Result<()> {
    fs::write(out, serde_json::to_vec_pretty(summary)?)
        .with_context(|| format!("writing {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_wrap_every_hundred_hooks() {
        let export = PathExport {
            hooks: (0..250).map(|k| k % 7).collect(),
            n_chords: 249,
            thread_length: 123.9,
        };
        let text = instructions(&export);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "distance = 123 meters");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].split(' ').count(), 100);
        assert_eq!(lines[3].split(' ').count(), 50);
        assert!(lines[1].starts_with("0 1 2 3 4 5 6 0"));
    }
}
