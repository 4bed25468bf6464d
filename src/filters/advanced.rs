//! Advanced enhancement filters
//!
//! Unlike the basic blend filters, these take domain parameters: a radius in
//! pixels, a white point in Kelvin, percentage adjustments for tonal ranges.

use super::color::{hsv_to_rgb, rgb_to_hsv};
use super::{check_radius, Filter};
use crate::kernels::{gaussian_blur, to_planes};
use crate::types::{Channel, Error, Result, COLOR_TEMP_BASELINE, LUMA_WEIGHTS};
use image::{Rgb, RgbImage};
use std::cmp::Ordering;

/// Weighted luma sum at exactly L = 0.5 (`1000 * 255 / 2`)
const MID_LUMINANCE: u32 = 127_500;

/// Unsharp masking: add back the difference between the image and a blur of it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnsharpMaskFilter {
    /// Gaussian sigma in pixels
    pub radius: f32,
    /// Strength of the added detail, in percent
    pub percent: i32,
    /// Minimum absolute difference before a sample is sharpened
    pub threshold: i32,
}

impl UnsharpMaskFilter {
    pub fn new(radius: f32, percent: i32, threshold: i32) -> Self {
        Self {
            radius,
            percent,
            threshold,
        }
    }
}

impl Default for UnsharpMaskFilter {
    fn default() -> Self {
        Self::new(1.5, 80, 0)
    }
}

impl Filter for UnsharpMaskFilter {
    fn name(&self) -> String {
        "UnsharpMask".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        check_radius(self, self.radius)?;

        let blurred = gaussian_blur(&to_planes(image), self.radius)?;
        let amount = self.percent as f32 / 100.0;
        let threshold = self.threshold.max(0) as f32;

        Ok(RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let p = image.get_pixel(x, y);
            let mut out = p.0;
            for c in 0..3 {
                let original = p[c] as f32;
                let diff = original - blurred[(c, y as usize, x as usize)].round();
                if diff.abs() >= threshold {
                    out[c] = (original + diff * amount).round().clamp(0.0, 255.0) as u8;
                }
            }
            Rgb(out)
        }))
    }
}

/// Shift the white point; below 6500 K is warmer, above is cooler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTemperatureFilter {
    pub kelvin: f32,
}

impl ColorTemperatureFilter {
    pub fn new(kelvin: f32) -> Self {
        Self { kelvin }
    }
}

impl Filter for ColorTemperatureFilter {
    fn name(&self) -> String {
        "ColorTemperature".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        if !self.kelvin.is_finite() || self.kelvin <= 0.0 {
            return Err(Error::Filter {
                filter: self.name(),
                reason: format!("kelvin must be positive, got {}", self.kelvin),
            });
        }

        let ratio = self.kelvin / COLOR_TEMP_BASELINE;
        Ok(RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b] = image.get_pixel(x, y).0;
            let red = (r as f32 * ratio).min(255.0) as u8;
            let blue = (b as f32 / ratio).min(255.0) as u8;
            Rgb([red, g, blue])
        }))
    }
}

/// Independent percentage adjustments for dark and bright pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowsHighlightsFilter {
    pub shadow_adjust: f32,
    pub highlight_adjust: f32,
}

impl ShadowsHighlightsFilter {
    pub fn new(shadow_adjust: f32, highlight_adjust: f32) -> Self {
        Self {
            shadow_adjust,
            highlight_adjust,
        }
    }
}

impl Filter for ShadowsHighlightsFilter {
    fn name(&self) -> String {
        "ShadowsHighlights".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        let shadow_scale = 1.0 + self.shadow_adjust / 100.0;
        let highlight_scale = 1.0 + self.highlight_adjust / 100.0;

        Ok(RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let p = image.get_pixel(x, y).0;
            let weighted: u32 = LUMA_WEIGHTS.iter().zip(p).map(|(w, v)| w * v as u32).sum();

            let scale = match weighted.cmp(&MID_LUMINANCE) {
                Ordering::Less => shadow_scale,
                Ordering::Greater => highlight_scale,
                Ordering::Equal => 1.0,
            };
            Rgb(p.map(|v| (v as f32 * scale).clamp(0.0, 255.0) as u8))
        }))
    }
}

/// Scale HSV saturation, keeping hue and value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibranceFilter {
    pub factor: f32,
}

impl VibranceFilter {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }
}

impl Filter for VibranceFilter {
    fn name(&self) -> String {
        "Vibrance".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        Ok(RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let (h, s, v) = rgb_to_hsv(image.get_pixel(x, y).0);
            Rgb(hsv_to_rgb(h, (s * self.factor).clamp(0.0, 1.0), v))
        }))
    }

    fn factor(&self) -> Option<f32> {
        Some(self.factor)
    }
}

/// Mid-tone contrast, implemented as a wide, low-threshold unsharp mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClarityFilter {
    /// Strength in percent
    pub strength: f32,
}

impl ClarityFilter {
    const RADIUS: f32 = 2.0;
    const THRESHOLD: i32 = 3;

    pub fn new(strength: f32) -> Self {
        Self { strength }
    }

    fn as_unsharp_mask(&self) -> UnsharpMaskFilter {
        let percent = ((1.0 + self.strength / 100.0) * 100.0).round() as i32;
        UnsharpMaskFilter::new(Self::RADIUS, percent, Self::THRESHOLD)
    }
}

impl Filter for ClarityFilter {
    fn name(&self) -> String {
        "Clarity".to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        self.as_unsharp_mask().apply(image)
    }
}

/// Multiply a single channel, leaving the others untouched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorChannelFilter {
    pub channel: Channel,
    pub factor: f32,
}

impl ColorChannelFilter {
    pub fn new(channel: Channel, factor: f32) -> Self {
        Self { channel, factor }
    }
}

impl Filter for ColorChannelFilter {
    fn name(&self) -> String {
        match self.channel {
            Channel::Red => "RedChannel",
            Channel::Green => "GreenChannel",
            Channel::Blue => "BlueChannel",
        }
        .to_string()
    }

    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        let index = self.channel.index();
        let mut out = image.clone();
        for pixel in out.pixels_mut() {
            pixel[index] = (pixel[index] as f32 * self.factor).clamp(0.0, 255.0) as u8;
        }
        Ok(out)
    }

    fn factor(&self) -> Option<f32> {
        Some(self.factor)
    }
}
