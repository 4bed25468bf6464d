//! Basic intensity filters
//!
//! Each one blends the input against a "degenerate" reference image:
//! `out = degenerate + factor * (input - degenerate)`. A factor of 1.0
//! reproduces the input exactly, 0.0 gives the reference, and values above
//! 1.0 extrapolate away from it.

use super::Filter;
use crate::kernels::{clamp_u8, from_planes, smooth_3x3, to_planes};
use crate::types::{Result, LUMA_WEIGHTS};
use image::{Rgb, RgbImage};

/// Integer Rec. 601 luma, rounded
#[inline]
pub(crate) fn luma(pixel: &Rgb<u8>) -> u8 {
    let weighted: u32 = LUMA_WEIGHTS.iter().zip(pixel.0).map(|(w, v)| w * v as u32).sum();
    ((weighted + 500) / 1000) as u8
}

fn blend(degenerate: &RgbImage, image: &RgbImage, factor: f32) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let d = degenerate.get_pixel(x, y);
        let p = image.get_pixel(x, y);
        let mut out = [0u8; 3];
        for c in 0..3 {
            let base = d[c] as f32;
            out[c] = clamp_u8(base + factor * (p[c] as f32 - base));
        }
        Rgb(out)
    })
}

/// Uniform intensity scale; <1 darker, >1 brighter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessFilter {
    pub factor: f32,
}

impl BrightnessFilter {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }
}

impl Default for BrightnessFilter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Filter for BrightnessFilter {
    fn name(&self) -> String {
        "Brightness".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        let black = RgbImage::new(image.width(), image.height());
        Ok(blend(&black, image, self.factor))
    }

    fn factor(&self) -> Option<f32> {
        Some(self.factor)
    }
}

/// Contrast stretch around the image's mean gray level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastFilter {
    pub factor: f32,
}

impl ContrastFilter {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }
}

impl Default for ContrastFilter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Filter for ContrastFilter {
    fn name(&self) -> String {
        "Contrast".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        let count = image.width() as u64 * image.height() as u64;
        if count == 0 {
            return Ok(image.clone());
        }

        let total: u64 = image.pixels().map(|p| luma(p) as u64).sum();
        let mean = (total as f64 / count as f64 + 0.5) as u8;
        let gray = RgbImage::from_pixel(image.width(), image.height(), Rgb([mean, mean, mean]));
        Ok(blend(&gray, image, self.factor))
    }

    fn factor(&self) -> Option<f32> {
        Some(self.factor)
    }
}

/// Colour saturation; 0 is grayscale, 1 unchanged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationFilter {
    pub factor: f32,
}

impl SaturationFilter {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }
}

impl Default for SaturationFilter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Filter for SaturationFilter {
    fn name(&self) -> String {
        "Saturation".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        let gray = RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let l = luma(image.get_pixel(x, y));
            Rgb([l, l, l])
        });
        Ok(blend(&gray, image, self.factor))
    }

    fn factor(&self) -> Option<f32> {
        Some(self.factor)
    }
}

/// Sharpness; 0 is the smoothed image, 1 unchanged, >1 sharper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpnessFilter {
    pub factor: f32,
}

impl SharpnessFilter {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }
}

impl Default for SharpnessFilter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Filter for SharpnessFilter {
    fn name(&self) -> String {
        "Sharpness".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        let smoothed = from_planes(&smooth_3x3(&to_planes(image)))?;
        Ok(blend(&smoothed, image, self.factor))
    }

    fn factor(&self) -> Option<f32> {
        Some(self.factor)
    }
}
