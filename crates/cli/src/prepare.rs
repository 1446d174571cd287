//! Source and weight image preparation.
//!
//! Images are resized to the wheel's pixel diameter, converted to luma, masked
//! to the inscribed circle and flipped so raster `y` grows upwards (the
//! orientation the hook ring uses).

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::GrayImage;
use std::path::Path;
use threadart::raster::Raster;

/// How luma is turned into raster values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// `255 - l`: black is 255 ("ink needed"), white is 0.
    Darkness,
    /// `1 - l/255`: black is 1 (most important), white is 0.
    Weight,
}

pub fn load_raster(path: &Path, size: usize, channel: Channel) -> Result<Raster> {
    let side = u32::try_from(size).context("wheel pixel size does not fit u32")?;
    let img = image::open(path)
        .with_context(|| format!("opening image {}", path.display()))?
        .resize_exact(side, side, FilterType::Lanczos3)
        .to_luma8();
    tracing::debug!(path = %path.display(), size, ?channel, "prepared image");
    Ok(luma_to_raster(&img, channel))
}

/// Convert a square luma image; pixels outside the inscribed circle become 0.
pub fn luma_to_raster(img: &GrayImage, channel: Channel) -> Raster {
    let size = img.width() as usize;
    let centre = (size as f64 - 1.0) * 0.5;
    let limit = size as f64 * 0.5;
    Raster::from_fn(size, size, |x, y| {
        let dist = ((x as f64 - centre).powi(2) + (y as f64 - centre).powi(2)).sqrt();
        if dist > limit {
            return 0.0;
        }
        let l = img.get_pixel(x as u32, (size - 1 - y) as u32)[0] as f64;
        match channel {
            Channel::Darkness => 255.0 - l,
            Channel::Weight => 1.0 - l / 255.0,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use threadart::raster::Pixel;

    #[test]
    fn darkness_inverts_and_flips() {
        let mut img = GrayImage::from_pixel(8, 8, Luma([255]));
        // top-left in image space → (x=3, y=top) in raster space
        img.put_pixel(3, 0, Luma([0]));
        let r = luma_to_raster(&img, Channel::Darkness);
        assert_eq!(r[Pixel::new(3, 7)], 255.0);
        assert_eq!(r[Pixel::new(3, 0)], 0.0);
        assert_eq!(r[Pixel::new(4, 4)], 0.0);
    }

    #[test]
    fn corners_are_masked() {
        let img = GrayImage::from_pixel(10, 10, Luma([0]));
        let r = luma_to_raster(&img, Channel::Darkness);
        assert_eq!(r[Pixel::new(0, 0)], 0.0);
        assert_eq!(r[Pixel::new(9, 9)], 0.0);
        assert_eq!(r[Pixel::new(5, 5)], 255.0);
        let w = luma_to_raster(&img, Channel::Weight);
        assert_eq!(w[Pixel::new(5, 5)], 1.0);
        assert_eq!(w[Pixel::new(0, 9)], 0.0);
    }

    #[test]
    fn load_raster_resizes_to_wheel() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("grey.png");
        GrayImage::from_pixel(20, 12, Luma([128])).save(&file).unwrap();
        let r = load_raster(&file, 16, Channel::Weight).unwrap();
        assert_eq!(r.dims(), (16, 16));
        let v = r[Pixel::new(8, 8)];
        assert!((v - (1.0 - 128.0 / 255.0)).abs() < 0.02, "{v}");
    }
}
