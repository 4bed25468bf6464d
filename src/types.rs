//! Core types and structures for PictureForge

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Neutral daylight white point used by the colour temperature filter
pub const COLOR_TEMP_BASELINE: f32 = 6500.0;

/// Allowed target colour temperatures (Kelvin)
pub const DEFAULT_KELVIN_RANGE: (f32, f32) = (1500.0, 15000.0);

/// Allowed single-channel multipliers
pub const DEFAULT_CHANNEL_FACTOR_RANGE: (f32, f32) = (0.1, 2.5);

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Rec. 601 luma weights, in thousandths
pub const LUMA_WEIGHTS: [u32; 3] = [299, 587, 114];

/// Profile used when a requested profile name is unknown
pub const FALLBACK_PROFILE: &str = "aged";

/// Default accepted unsharp mask radius, in pixels
pub const DEFAULT_RADIUS_RANGE: (f32, f32) = (0.0, 25.0);

/// One of the three RGB channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }

    /// Parse a channel name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "red" | "r" => Some(Channel::Red),
            "green" | "g" => Some(Channel::Green),
            "blue" | "b" => Some(Channel::Blue),
            _ => None,
        }
    }
}

/// Keyword category a recommendation is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Brightness,
    Contrast,
    ColorTemperature,
    ColorChannel,
    UnsharpMask,
    ShadowsHighlights,
    Vibrance,
    Clarity,
    Saturation,
    Sharpness,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Brightness => "brightness",
            Category::Contrast => "contrast",
            Category::ColorTemperature => "color_temperature",
            Category::ColorChannel => "color_channel",
            Category::UnsharpMask => "unsharp_mask",
            Category::ShadowsHighlights => "shadows_highlights",
            Category::Vibrance => "vibrance",
            Category::Clarity => "clarity",
            Category::Saturation => "saturation",
            Category::Sharpness => "sharpness",
        }
    }

    /// Basic categories are deduplicated and applied first, in a fixed order
    pub fn is_basic(self) -> bool {
        matches!(
            self,
            Category::Brightness | Category::Contrast | Category::Saturation | Category::Sharpness
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub fn of(amount: f32) -> Self {
        if amount < 0.0 {
            Direction::Decrease
        } else {
            Direction::Increase
        }
    }
}

/// A single parsed enhancement recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enhancement {
    pub action: Category,
    pub direction: Direction,
    /// Suggested change in percent, when the recommendation is percent-based
    pub amount_percent: Option<f32>,
    /// Absolute target value (Kelvin for colour temperature, radius for unsharp mask)
    pub value: Option<f32>,
    pub raw_text: String,
}

/// Per-channel multipliers applied during slide restoration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorBalance {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl ColorBalance {
    pub const NEUTRAL: ColorBalance = ColorBalance {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };

    pub fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.red, self.green, self.blue]
    }
}

impl Default for ColorBalance {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Named parameter bundle correcting one film-aging pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideProfile {
    pub name: String,
    pub description: String,
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub sharpness: f32,
    pub color_balance: ColorBalance,
    pub denoise: bool,
    pub denoise_radius: f32,
}

impl Default for SlideProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            saturation: 1.0,
            contrast: 1.0,
            brightness: 1.0,
            sharpness: 1.0,
            color_balance: ColorBalance::NEUTRAL,
            denoise: false,
            denoise_radius: 0.5,
        }
    }
}

impl SlideProfile {
    /// Check every factor against its documented range
    pub fn validate(&self) -> Result<()> {
        let factors = [
            ("saturation", self.saturation),
            ("contrast", self.contrast),
            ("brightness", self.brightness),
            ("sharpness", self.sharpness),
            ("color_balance.red", self.color_balance.red),
            ("color_balance.green", self.color_balance.green),
            ("color_balance.blue", self.color_balance.blue),
        ];
        for (field, value) in factors {
            if !value.is_finite() || !(0.0..=3.0).contains(&value) {
                return Err(Error::InvalidProfile(format!(
                    "{}: {} must be within [0, 3], got {}",
                    self.name, field, value
                )));
            }
        }
        if !self.denoise_radius.is_finite() || !(0.0..=5.0).contains(&self.denoise_radius) {
            return Err(Error::InvalidProfile(format!(
                "{}: denoise_radius must be within [0, 5], got {}",
                self.name, self.denoise_radius
            )));
        }
        Ok(())
    }
}

/// Best-guess slide profile with a confidence in `[0, 100]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideProfileDetection {
    pub profile_name: String,
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: u8,
}

impl SlideProfileDetection {
    pub fn new(profile_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            profile_name: profile_name.into(),
            confidence: clamp_confidence(confidence),
        }
    }
}

/// Clamp any numeric confidence into `[0, 100]`
pub fn clamp_confidence(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Accept integer or float confidences and clamp them into range
pub(crate) fn deserialize_confidence<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_confidence(raw))
}

/// PictureForge error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Filter {filter} failed: {reason}")]
    Filter { filter: String, reason: String },

    #[error("No enhancement recommendations could be parsed")]
    EmptyPipeline,

    #[error("Invalid slide profile: {0}")]
    InvalidProfile(String),

    #[error("Fallback profile 'aged' is not registered")]
    MissingFallbackProfile,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Analysis parse error: {0}")]
    Analysis(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_name() {
        assert_eq!(Channel::from_name("RED"), Some(Channel::Red));
        assert_eq!(Channel::from_name("blue"), Some(Channel::Blue));
        assert_eq!(Channel::from_name("purple"), None);
        assert_eq!(Channel::Green.index(), 1);
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence(-5.0), 0);
        assert_eq!(clamp_confidence(150.0), 100);
        assert_eq!(clamp_confidence(72.4), 72);
        assert_eq!(clamp_confidence(f64::NAN), 0);
    }

    #[test]
    fn test_detection_deserialize_clamps() {
        let det: SlideProfileDetection =
            serde_json::from_str(r#"{"profile_name": "faded", "confidence": 180}"#).unwrap();
        assert_eq!(det.confidence, 100);

        let det: SlideProfileDetection =
            serde_json::from_str(r#"{"profile_name": "faded", "confidence": 64.6}"#).unwrap();
        assert_eq!(det.confidence, 65);
    }

    #[test]
    fn test_profile_validate() {
        let mut profile = SlideProfile {
            name: "test".to_string(),
            ..SlideProfile::default()
        };
        assert!(profile.validate().is_ok());

        profile.saturation = 3.5;
        assert!(matches!(profile.validate(), Err(Error::InvalidProfile(_))));

        profile.saturation = 1.0;
        profile.denoise_radius = 6.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_color_balance_neutral() {
        assert!(ColorBalance::default().is_neutral());
        assert!(!ColorBalance::new(0.85, 1.0, 1.25).is_neutral());
        assert_eq!(ColorBalance::new(0.85, 1.0, 1.25).as_array(), [0.85, 1.0, 1.25]);
    }
}
