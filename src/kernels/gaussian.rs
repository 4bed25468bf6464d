//! Separable Gaussian blur
//!
//! Used directly for slide denoising and as the low-pass stage of unsharp
//! masking. Each channel layer gets a horizontal pass into a temp buffer
//! followed by a vertical pass, with clamped boundaries.

use crate::types::{Error, Result};
use ndarray::{Array2, Array3, ArrayView2, ArrayViewMut2, Axis};

/// Largest accepted standard deviation, in pixels
pub const MAX_SIGMA: f32 = 100.0;

/// Blur every channel layer with a Gaussian of standard deviation `sigma`
///
/// A non-positive or NaN `sigma` returns an unmodified copy; one above
/// [`MAX_SIGMA`] is an error.
pub fn gaussian_blur(planes: &Array3<f32>, sigma: f32) -> Result<Array3<f32>> {
    let kernel = gaussian_kernel_1d(sigma)?;
    if kernel.len() == 1 {
        return Ok(planes.clone());
    }

    let mut out = Array3::<f32>::zeros(planes.raw_dim());
    for (layer, out_layer) in planes.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        blur_layer(layer, out_layer, &kernel);
    }
    Ok(out)
}

fn blur_layer(layer: ArrayView2<f32>, mut out: ArrayViewMut2<f32>, kernel: &[f32]) {
    let (height, width) = layer.dim();
    if height == 0 || width == 0 {
        return;
    }
    let half_k = kernel.len() / 2;
    let mut temp = Array2::<f32>::zeros((height, width));

    // Horizontal pass: layer -> temp
    for y in 0..height {
        let row = layer.row(y);

        // Left edge (clamped boundary)
        for x in 0..half_k.min(width) {
            let mut sum = 0.0f32;
            for (i, &k_val) in kernel.iter().enumerate() {
                let sx = (x + i).saturating_sub(half_k).min(width - 1);
                sum += row[sx] * k_val;
            }
            temp[(y, x)] = sum;
        }

        // Interior (no clamping needed)
        for x in half_k..width.saturating_sub(half_k) {
            let mut sum = 0.0f32;
            let base = x - half_k;
            for (i, &k_val) in kernel.iter().enumerate() {
                sum += row[base + i] * k_val;
            }
            temp[(y, x)] = sum;
        }

        // Right edge (clamped boundary)
        for x in width.saturating_sub(half_k).max(half_k.min(width))..width {
            let mut sum = 0.0f32;
            for (i, &k_val) in kernel.iter().enumerate() {
                let sx = (x + i).saturating_sub(half_k).min(width - 1);
                sum += row[sx] * k_val;
            }
            temp[(y, x)] = sum;
        }
    }

    // Vertical pass: temp -> out
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (i, &k_val) in kernel.iter().enumerate() {
                let sy = (y + i).saturating_sub(half_k).min(height - 1);
                sum += temp[(sy, x)] * k_val;
            }
            out[(y, x)] = sum;
        }
    }
}

/// Generate a normalized 1D Gaussian kernel with half-width `ceil(3 * sigma)`
pub fn gaussian_kernel_1d(sigma: f32) -> Result<Vec<f32>> {
    if sigma.is_nan() || sigma <= 0.0 {
        return Ok(vec![1.0]);
    }
    if sigma > MAX_SIGMA {
        return Err(Error::Processing(format!(
            "Gaussian sigma {} exceeds {}",
            sigma, MAX_SIGMA
        )));
    }

    let half = (3.0 * sigma).ceil() as usize;
    let size = 2 * half + 1;
    let center = half as f32;
    let mut kernel = Vec::with_capacity(size);
    let mut sum = 0.0;

    for i in 0..size {
        let x = i as f32 - center;
        let value = (-x * x / (2.0 * sigma * sigma)).exp();
        kernel.push(value);
        sum += value;
    }

    for k in &mut kernel {
        *k /= sum;
    }

    Ok(kernel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_gaussian_kernel() {
        let kernel = gaussian_kernel_1d(1.0).unwrap();
        assert_eq!(kernel.len(), 7);

        // Check normalization
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 0.001);

        // Check symmetry
        assert!((kernel[0] - kernel[6]).abs() < 0.001);
        assert!((kernel[2] - kernel[4]).abs() < 0.001);

        // Center should be largest
        assert!(kernel[3] > kernel[2]);
        assert!(kernel[2] > kernel[1]);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        assert_eq!(gaussian_kernel_1d(0.0).unwrap(), vec![1.0]);
        assert_eq!(gaussian_kernel_1d(-2.0).unwrap(), vec![1.0]);

        let planes = Array3::from_shape_fn((3, 4, 5), |(c, y, x)| (c * 20 + y * 5 + x) as f32);
        assert_eq!(gaussian_blur(&planes, 0.0).unwrap(), planes);
    }

    #[test]
    fn test_oversized_sigma_is_rejected() {
        assert_eq!(gaussian_kernel_1d(MAX_SIGMA).unwrap().len(), 601);
        assert!(gaussian_kernel_1d(MAX_SIGMA + 1.0).is_err());
        assert!(gaussian_kernel_1d(1e20).is_err());
        assert!(gaussian_kernel_1d(f32::INFINITY).is_err());

        let planes = Array3::from_elem((3, 4, 4), 10.0f32);
        assert!(matches!(gaussian_blur(&planes, 1e20), Err(Error::Processing(_))));
    }

    #[test]
    fn test_flat_image_unchanged() {
        let planes = Array3::from_elem((3, 9, 9), 120.0f32);
        let blurred = gaussian_blur(&planes, 1.5).unwrap();
        for &v in blurred.iter() {
            assert!((v - 120.0).abs() < 1e-3, "flat field drifted: {}", v);
        }
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut planes = Array3::<f32>::zeros((3, 11, 11));
        planes[(0, 5, 5)] = 255.0;

        let blurred = gaussian_blur(&planes, 1.0).unwrap();
        assert!(blurred[(0, 5, 5)] < 255.0);
        assert!(blurred[(0, 5, 6)] > 0.0);
        assert!(blurred[(0, 4, 5)] > 0.0);
        // Other layers untouched
        assert_eq!(blurred[(1, 5, 5)], 0.0);

        // Energy is preserved away from the borders
        let total: f32 = blurred.index_axis(Axis(0), 0).iter().sum();
        assert!((total - 255.0).abs() < 0.5);
    }

    #[test]
    fn test_narrow_image() {
        let planes = Array3::from_elem((3, 2, 3), 50.0f32);
        let blurred = gaussian_blur(&planes, 2.0).unwrap();
        for &v in blurred.iter() {
            assert!((v - 50.0).abs() < 1e-3);
        }
    }
}
