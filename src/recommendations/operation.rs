//! Typed result of classifying one recommendation

use crate::filters::{
    BrightnessFilter, ClarityFilter, ColorChannelFilter, ColorTemperatureFilter, ContrastFilter,
    Filter, SaturationFilter, ShadowsHighlightsFilter, SharpnessFilter, UnsharpMaskFilter,
    VibranceFilter,
};
use crate::types::{Category, Channel, Direction, Enhancement};
use std::fmt;

/// A single adjustment with its parameters resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Brightness { percent: f32 },
    Contrast { percent: f32 },
    Saturation { percent: f32 },
    Sharpness { percent: f32 },
    ColorTemperature { shift: f32, kelvin: f32 },
    ColorChannel { channel: Channel, percent: f32, factor: f32 },
    UnsharpMask { radius: f32, percent: i32, threshold: i32 },
    ShadowsHighlights { shadow: f32, highlight: f32 },
    Vibrance { percent: f32 },
    Clarity { strength: f32 },
}

fn percent_factor(percent: f32) -> f32 {
    1.0 + percent / 100.0
}

impl Operation {
    pub fn category(&self) -> Category {
        match self {
            Operation::Brightness { .. } => Category::Brightness,
            Operation::Contrast { .. } => Category::Contrast,
            Operation::Saturation { .. } => Category::Saturation,
            Operation::Sharpness { .. } => Category::Sharpness,
            Operation::ColorTemperature { .. } => Category::ColorTemperature,
            Operation::ColorChannel { .. } => Category::ColorChannel,
            Operation::UnsharpMask { .. } => Category::UnsharpMask,
            Operation::ShadowsHighlights { .. } => Category::ShadowsHighlights,
            Operation::Vibrance { .. } => Category::Vibrance,
            Operation::Clarity { .. } => Category::Clarity,
        }
    }

    /// Build the filter that performs this operation
    pub fn to_filter(&self) -> Box<dyn Filter> {
        match *self {
            Operation::Brightness { percent } => Box::new(BrightnessFilter::new(percent_factor(percent))),
            Operation::Contrast { percent } => Box::new(ContrastFilter::new(percent_factor(percent))),
            Operation::Saturation { percent } => Box::new(SaturationFilter::new(percent_factor(percent))),
            Operation::Sharpness { percent } => Box::new(SharpnessFilter::new(percent_factor(percent))),
            Operation::ColorTemperature { kelvin, .. } => Box::new(ColorTemperatureFilter::new(kelvin)),
            Operation::ColorChannel {
                channel, factor, ..
            } => Box::new(ColorChannelFilter::new(channel, factor)),
            Operation::UnsharpMask {
                radius,
                percent,
                threshold,
            } => Box::new(UnsharpMaskFilter::new(radius, percent, threshold)),
            Operation::ShadowsHighlights { shadow, highlight } => {
                Box::new(ShadowsHighlightsFilter::new(shadow, highlight))
            }
            Operation::Vibrance { percent } => Box::new(VibranceFilter::new(percent_factor(percent))),
            Operation::Clarity { strength } => Box::new(ClarityFilter::new(strength)),
        }
    }

    /// Describe this operation as an `Enhancement` record
    ///
    /// Shadows/highlights reports the shadow adjustment as `amount_percent`
    /// and the highlight adjustment as `value`.
    pub fn to_enhancement(&self, raw_text: &str) -> Enhancement {
        let (direction, amount_percent, value) = match *self {
            Operation::Brightness { percent }
            | Operation::Contrast { percent }
            | Operation::Saturation { percent }
            | Operation::Sharpness { percent }
            | Operation::Vibrance { percent }
            | Operation::ColorChannel { percent, .. } => (Direction::of(percent), Some(percent), None),
            Operation::Clarity { strength } => (Direction::of(strength), Some(strength), None),
            Operation::ColorTemperature { shift, kelvin } => (Direction::of(shift), None, Some(kelvin)),
            Operation::UnsharpMask { radius, percent, .. } => {
                (Direction::Increase, Some(percent as f32), Some(radius))
            }
            Operation::ShadowsHighlights { shadow, highlight } => (
                Direction::of(shadow + highlight),
                Some(shadow),
                Some(highlight),
            ),
        };

        Enhancement {
            action: self.category(),
            direction,
            amount_percent,
            value,
            raw_text: raw_text.to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Brightness { percent }
            | Operation::Contrast { percent }
            | Operation::Saturation { percent }
            | Operation::Sharpness { percent }
            | Operation::Vibrance { percent } => {
                write!(f, "{} {:+}%", self.category(), percent)
            }
            Operation::ColorTemperature { shift, kelvin } => {
                write!(f, "color_temperature {}K ({:+}K)", kelvin, shift)
            }
            Operation::ColorChannel {
                channel,
                percent,
                factor,
            } => write!(f, "{} channel {:+}% (x{:.2})", channel.as_str(), percent, factor),
            Operation::UnsharpMask {
                radius,
                percent,
                threshold,
            } => write!(
                f,
                "unsharp_mask radius={} strength={}% threshold={}",
                radius, percent, threshold
            ),
            Operation::ShadowsHighlights { shadow, highlight } => {
                write!(f, "shadows {:+}%, highlights {:+}%", shadow, highlight)
            }
            Operation::Clarity { strength } => write!(f, "clarity {:+}%", strength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_operations_build_factor_filters() {
        let filter = Operation::Brightness { percent: 25.0 }.to_filter();
        assert_eq!(filter.name(), "Brightness");
        assert!((filter.factor().unwrap() - 1.25).abs() < 1e-6);

        let filter = Operation::Vibrance { percent: -10.0 }.to_filter();
        assert!((filter.factor().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_temperature_filter_uses_target_kelvin() {
        let filter = Operation::ColorTemperature {
            shift: -800.0,
            kelvin: 5700.0,
        }
        .to_filter();
        let temp = filter.downcast_ref::<ColorTemperatureFilter>().unwrap();
        assert_eq!(temp.kelvin, 5700.0);
    }

    #[test]
    fn test_enhancement_records() {
        let enh = Operation::Contrast { percent: -15.0 }.to_enhancement("CONTRAST: reduce by 15%");
        assert_eq!(enh.action, Category::Contrast);
        assert_eq!(enh.direction, Direction::Decrease);
        assert_eq!(enh.amount_percent, Some(-15.0));
        assert_eq!(enh.value, None);
        assert_eq!(enh.raw_text, "CONTRAST: reduce by 15%");

        let enh = Operation::ColorTemperature {
            shift: 400.0,
            kelvin: 6900.0,
        }
        .to_enhancement("warm by 400K");
        assert_eq!(enh.direction, Direction::Increase);
        assert_eq!(enh.value, Some(6900.0));

        let enh = Operation::UnsharpMask {
            radius: 1.2,
            percent: 90,
            threshold: 2,
        }
        .to_enhancement("unsharp");
        assert_eq!(enh.amount_percent, Some(90.0));
        assert_eq!(enh.value, Some(1.2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::Brightness { percent: 25.0 }.to_string(), "brightness +25%");
        assert_eq!(
            Operation::ShadowsHighlights {
                shadow: 15.0,
                highlight: -10.0
            }
            .to_string(),
            "shadows +15%, highlights -10%"
        );
    }
}
