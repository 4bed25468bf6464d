//! Raster kernels operating on float channel planes
//!
//! An RGB image is unpacked into an `Array3<f32>` of shape `(3, height, width)`,
//! one layer per channel, so neighbourhood kernels can run layer by layer.

pub mod gaussian;
pub mod median;
pub mod smooth;

pub use gaussian::{gaussian_blur, gaussian_kernel_1d, MAX_SIGMA};
pub use median::median_3x3;
pub use smooth::smooth_3x3;

use crate::types::{Error, Result};
use image::RgbImage;
use ndarray::Array3;

/// Clamp a float sample into `[0, 255]` and truncate it
#[inline]
pub fn clamp_u8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Unpack an RGB image into channel planes
pub fn to_planes(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    let mut planes = Array3::<f32>::zeros((3, height as usize, width as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            planes[(c, y as usize, x as usize)] = pixel[c] as f32;
        }
    }

    planes
}

/// Pack channel planes back into an RGB image, rounding each sample
pub fn from_planes(planes: &Array3<f32>) -> Result<RgbImage> {
    let (channels, height, width) = planes.dim();
    if channels != 3 {
        return Err(Error::Processing(format!(
            "Expected 3 channel planes, got {}",
            channels
        )));
    }

    let mut raw = Vec::with_capacity(height * width * 3);
    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                raw.push(clamp_u8(planes[(c, y, x)].round()));
            }
        }
    }

    RgbImage::from_raw(width as u32, height as u32, raw)
        .ok_or_else(|| Error::Processing("Failed to create image buffer".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_planes_preserve_pixels() {
        let mut image = RgbImage::new(4, 3);
        image.put_pixel(1, 2, Rgb([10, 20, 30]));
        image.put_pixel(3, 0, Rgb([255, 0, 128]));

        let planes = to_planes(&image);
        assert_eq!(planes.dim(), (3, 3, 4));
        assert_eq!(planes[(0, 2, 1)], 10.0);
        assert_eq!(planes[(2, 0, 3)], 128.0);

        let back = from_planes(&planes).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_clamp_u8() {
        assert_eq!(clamp_u8(-4.0), 0);
        assert_eq!(clamp_u8(300.0), 255);
        assert_eq!(clamp_u8(127.9), 127);
        assert_eq!(clamp_u8(f32::NAN), 0);
    }

    #[test]
    fn test_from_planes_rejects_wrong_layer_count() {
        let planes = Array3::<f32>::zeros((2, 4, 4));
        assert!(from_planes(&planes).is_err());
    }
}
