//! 3×3 median filter for dust and scratch removal

use ndarray::{Array3, Axis};

/// Replace each sample with the median of its 3×3 neighbourhood
///
/// Runs per channel layer; neighbours outside the image replicate the edge.
pub fn median_3x3(planes: &Array3<f32>) -> Array3<f32> {
    let mut out = Array3::<f32>::zeros(planes.raw_dim());

    for (layer, mut out_layer) in planes.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        let (height, width) = layer.dim();
        let mut window = [0.0f32; 9];

        for y in 0..height {
            for x in 0..width {
                let mut n = 0;
                for dy in 0..3 {
                    let sy = (y + dy).saturating_sub(1).min(height - 1);
                    for dx in 0..3 {
                        let sx = (x + dx).saturating_sub(1).min(width - 1);
                        window[n] = layer[(sy, sx)];
                        n += 1;
                    }
                }
                window.sort_unstable_by(f32::total_cmp);
                out_layer[(y, x)] = window[4];
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_isolated_speck() {
        let mut planes = Array3::from_elem((3, 5, 5), 100.0f32);
        planes[(1, 2, 2)] = 255.0;

        let filtered = median_3x3(&planes);
        assert_eq!(filtered[(1, 2, 2)], 100.0);
        assert!(filtered.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_preserves_straight_edge() {
        // Left half dark, right half bright
        let planes = Array3::from_shape_fn((3, 6, 6), |(_, _, x)| if x < 3 { 0.0 } else { 200.0 });

        let filtered = median_3x3(&planes);
        assert_eq!(filtered, planes);
    }

    #[test]
    fn test_single_pixel_image() {
        let planes = Array3::from_elem((3, 1, 1), 42.0f32);
        assert_eq!(median_3x3(&planes), planes);
    }
}
