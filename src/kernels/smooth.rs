//! 3×3 smoothing kernel used as the blurred reference for sharpness
//!
//! Weights are `[[1, 1, 1], [1, 5, 1], [1, 1, 1]] / 13`. Border samples are
//! copied from the input unchanged.

use ndarray::{Array3, Axis};

const SMOOTH_WEIGHTS: [[f32; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 5.0, 1.0], [1.0, 1.0, 1.0]];
const SMOOTH_SCALE: f32 = 13.0;

pub fn smooth_3x3(planes: &Array3<f32>) -> Array3<f32> {
    let mut out = planes.clone();

    for (layer, mut out_layer) in planes.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        let (height, width) = layer.dim();
        if height < 3 || width < 3 {
            continue;
        }

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let mut sum = 0.0f32;
                for (dy, row) in SMOOTH_WEIGHTS.iter().enumerate() {
                    for (dx, &w) in row.iter().enumerate() {
                        sum += layer[(y + dy - 1, x + dx - 1)] * w;
                    }
                }
                out_layer[(y, x)] = sum / SMOOTH_SCALE;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_field_unchanged() {
        let planes = Array3::from_elem((3, 6, 6), 77.0f32);
        let smoothed = smooth_3x3(&planes);
        for &v in smoothed.iter() {
            assert!((v - 77.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_center_weighting() {
        let mut planes = Array3::<f32>::zeros((3, 3, 3));
        planes[(0, 1, 1)] = 130.0;

        let smoothed = smooth_3x3(&planes);
        assert!((smoothed[(0, 1, 1)] - 50.0).abs() < 1e-4);
        // Border copied
        assert_eq!(smoothed[(0, 0, 0)], 0.0);
    }

    #[test]
    fn test_tiny_image_copied() {
        let planes = Array3::from_shape_fn((3, 2, 2), |(c, y, x)| (c + y + x) as f32);
        assert_eq!(smooth_3x3(&planes), planes);
    }
}
