//! Preview renders of a finished path: black chords on a white disc.

use anyhow::{Context, Result};
use image::{GrayImage, Luma};
use std::path::{Path as FsPath, PathBuf};
use threadart::coverage::through_pixels;
use threadart::hooks::HookRing;
use threadart::Path;

/// Draw the first `n_chords` chords of `path`. Raster `y` is flipped back to
/// image rows.
pub fn render(path: &Path, ring: &HookRing, n_chords: usize) -> GrayImage {
    let size = ring.pixel_size() as u32;
    let mut img = GrayImage::from_pixel(size, size, Luma([255]));
    for chord in path.chords().take(n_chords) {
        let (a, b) = chord.hooks();
        for p in through_pixels(ring.position(a), ring.position(b)) {
            let (x, y) = (p.x as u32, p.y as u32);
            if x < size && y < size {
                img.put_pixel(x, size - 1 - y, Luma([0]));
            }
        }
    }
    img
}

/// Write the full render to `out`.
pub fn save_render(path: &Path, ring: &HookRing, out: &FsPath) -> Result<()> {
    render(path, ring, path.n_chords())
        .save(out)
        .with_context(|| format!("writing render {}", out.display()))
}

/// Partial renders at `k / (n/100)` of the chords for `k = 1..n/100`, named
/// `<stem>_<pct>pct.png`. Nothing is written for paths under 100 chords.
pub fn save_progress_renders(path: &Path, ring: &HookRing, dir: &FsPath, stem: &str) -> Result<Vec<PathBuf>> {
    let n = path.n_chords();
    let steps = n / 100;
    let mut written = Vec::with_capacity(steps.saturating_sub(1));
    for k in 1..steps {
        let fraction = k as f64 / steps as f64;
        let upto = (n as f64 * fraction) as usize;
        let pct = (fraction * 100.0) as usize;
        let out = dir.join(format!("{stem}_{pct:03}pct.png"));
        render(path, ring, upto)
            .save(&out)
            .with_context(|| format!("writing progress render {}", out.display()))?;
        written.push(out);
    }
    Ok(written)
}
