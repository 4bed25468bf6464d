//! Filters used by slide restoration

use super::{check_radius, Filter};
use crate::kernels::{from_planes, gaussian_blur, median_3x3, to_planes};
use crate::types::{ColorBalance, Result};
use image::RgbImage;

/// Per-channel multipliers, truncated and capped at 255
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBalanceFilter {
    pub balance: ColorBalance,
}

impl ColorBalanceFilter {
    pub fn new(balance: ColorBalance) -> Self {
        Self { balance }
    }
}

impl Filter for ColorBalanceFilter {
    fn name(&self) -> String {
        "ColorBalance".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        let factors = self.balance.as_array();
        let mut out = image.clone();
        for pixel in out.pixels_mut() {
            for (value, factor) in pixel.0.iter_mut().zip(factors) {
                *value = (*value as f32 * factor).clamp(0.0, 255.0) as u8;
            }
        }
        Ok(out)
    }
}

/// 3×3 median; removes dust and scratches
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DespeckleFilter;

impl Filter for DespeckleFilter {
    fn name(&self) -> String {
        "Despeckle".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        from_planes(&median_3x3(&to_planes(image)))
    }
}

/// Light Gaussian blur for grain reduction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlurFilter {
    pub radius: f32,
}

impl GaussianBlurFilter {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Filter for GaussianBlurFilter {
    fn name(&self) -> String {
        "GaussianBlur".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        check_radius(self, self.radius)?;
        from_planes(&gaussian_blur(&to_planes(image), self.radius)?)
    }
}
