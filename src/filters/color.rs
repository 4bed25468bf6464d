//! RGB <-> HSV conversion on normalized `[0, 1]` components

/// Convert 8-bit RGB into `(hue, saturation, value)`, all in `[0, 1]`
pub fn rgb_to_hsv(rgb: [u8; 3]) -> (f32, f32, f32) {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = max;
    if delta <= 0.0 || max <= 0.0 {
        return (0.0, 0.0, value);
    }
    let saturation = delta / max;

    let sextant = if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    let mut hue = sextant / 6.0;
    if hue < 0.0 {
        hue += 1.0;
    }

    (hue, saturation, value)
}

/// Convert `(hue, saturation, value)` back to 8-bit RGB, rounding each channel
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [u8; 3] {
    let to_u8 = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    if saturation <= 0.0 {
        let v = to_u8(value);
        return [v, v, v];
    }

    let h = (hue.rem_euclid(1.0)) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match sector as u32 % 6 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };

    [to_u8(r), to_u8(g), to_u8(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), (0.0, 1.0, 1.0));
        let (h, s, v) = rgb_to_hsv([0, 0, 255]);
        assert!((h - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!((s, v), (1.0, 1.0));
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let (_, s, v) = rgb_to_hsv([128, 128, 128]);
        assert_eq!(s, 0.0);
        assert!((v - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(hsv_to_rgb(0.3, 0.0, 128.0 / 255.0), [128, 128, 128]);
    }

    #[test]
    fn test_skin_tone_survives_conversion() {
        let (h, s, v) = rgb_to_hsv([210, 160, 120]);
        assert!(h > 0.0 && h < 1.0 / 6.0);
        assert_eq!(hsv_to_rgb(h, s, v), [210, 160, 120]);
    }
}
