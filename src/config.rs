//! TOML configuration
//!
//! Every key is optional. A typical file:
//!
//! ```toml
//! [enhancement]
//! jpeg_quality = 92
//! kelvin_range = [2000.0, 12000.0]
//! radius_range = [0.0, 10.0]
//!
//! [enhancement.unsharp_mask]
//! radius = 1.2
//!
//! [slide_restoration]
//! despeckle = false
//!
//! [slide_restoration.profiles.kodachrome]
//! name = "Kodachrome"
//! saturation = 1.2
//! color_balance = { red = 0.95, green = 1.0, blue = 1.05 }
//! ```

use crate::filters::UnsharpMaskFilter;
use crate::kernels::MAX_SIGMA;
use crate::recommendations::ParserSettings;
use crate::restoration::{ProfileRegistry, RestoreOptions};
use crate::types::{
    Error, Result, SlideProfile, DEFAULT_CHANNEL_FACTOR_RANGE, DEFAULT_JPEG_QUALITY,
    DEFAULT_KELVIN_RANGE, DEFAULT_RADIUS_RANGE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File names looked for by [`Config::discover`]
pub const CONFIG_FILE_NAMES: [&str; 2] = ["picture_forge.toml", ".picture_forge.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub enhancement: EnhancementConfig,
    pub slide_restoration: RestorationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    pub jpeg_quality: u32,
    pub kelvin_range: (f32, f32),
    pub channel_factor_range: (f32, f32),
    /// Accepted unsharp mask radius in pixels; capped at [`MAX_SIGMA`]
    pub radius_range: (f32, f32),
    pub unsharp_mask: UnsharpMaskConfig,
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY as u32,
            kelvin_range: DEFAULT_KELVIN_RANGE,
            channel_factor_range: DEFAULT_CHANNEL_FACTOR_RANGE,
            radius_range: DEFAULT_RADIUS_RANGE,
            unsharp_mask: UnsharpMaskConfig::default(),
        }
    }
}

/// Defaults for unsharp mask parameters a recommendation leaves out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsharpMaskConfig {
    pub radius: f32,
    pub percent: i32,
    pub threshold: i32,
}

impl Default for UnsharpMaskConfig {
    fn default() -> Self {
        let defaults = UnsharpMaskFilter::default();
        Self {
            radius: defaults.radius,
            percent: defaults.percent,
            threshold: defaults.threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestorationConfig {
    pub jpeg_quality: u32,
    pub confidence_threshold: u32,
    pub denoise: bool,
    pub despeckle: bool,
    /// Extra profiles merged over the built-in ones
    pub profiles: BTreeMap<String, SlideProfile>,
}

impl Default for RestorationConfig {
    fn default() -> Self {
        let options = RestoreOptions::default();
        Self {
            jpeg_quality: options.jpeg_quality as u32,
            confidence_threshold: options.confidence_threshold as u32,
            denoise: options.denoise,
            despeckle: options.despeckle,
            profiles: BTreeMap::new(),
        }
    }
}

/// A sanitised configuration plus where it came from
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    pub config: Config,
    /// `None` when built-in defaults are in use
    pub source: Option<PathBuf>,
    /// Values that were out of range and have been corrected
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Read, parse and sanitise the file at `path`
    pub fn load(path: &Path) -> Result<ConfigHandle> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        let warnings = config.sanitize();
        for warning in &warnings {
            log::warn!("{}: {}", path.display(), warning);
        }

        log::info!("Loaded config from {:?}", path);
        Ok(ConfigHandle {
            config,
            source: Some(path.to_path_buf()),
            warnings,
        })
    }

    /// Load the first config file found in `dir`, or fall back to defaults
    pub fn discover(dir: &Path) -> Result<ConfigHandle> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
        }
        log::debug!("No config file in {:?}, using defaults", dir);
        Ok(ConfigHandle::default())
    }

    /// Clamp out-of-range values, returning one message per correction
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        clamp_quality("enhancement.jpeg_quality", &mut self.enhancement.jpeg_quality, &mut warnings);
        clamp_quality(
            "slide_restoration.jpeg_quality",
            &mut self.slide_restoration.jpeg_quality,
            &mut warnings,
        );

        let threshold = &mut self.slide_restoration.confidence_threshold;
        if *threshold > 100 {
            warnings.push(format!(
                "slide_restoration.confidence_threshold {} exceeds 100, using 100",
                threshold
            ));
            *threshold = 100;
        }

        fix_range(
            "enhancement.kelvin_range",
            &mut self.enhancement.kelvin_range,
            DEFAULT_KELVIN_RANGE,
            &mut warnings,
        );
        fix_range(
            "enhancement.channel_factor_range",
            &mut self.enhancement.channel_factor_range,
            DEFAULT_CHANNEL_FACTOR_RANGE,
            &mut warnings,
        );

        let radius_range = &mut self.enhancement.radius_range;
        fix_range("enhancement.radius_range", radius_range, DEFAULT_RADIUS_RANGE, &mut warnings);
        if radius_range.0 < 0.0 || radius_range.1 > MAX_SIGMA {
            let capped = (
                radius_range.0.clamp(0.0, MAX_SIGMA),
                radius_range.1.clamp(0.0, MAX_SIGMA),
            );
            warnings.push(format!(
                "enhancement.radius_range {:?} exceeds [0, {}], using {:?}",
                radius_range, MAX_SIGMA, capped
            ));
            *radius_range = capped;
        }

        let unsharp = &mut self.enhancement.unsharp_mask;
        let defaults = UnsharpMaskConfig::default();
        if !unsharp.radius.is_finite() || !(0.0..=MAX_SIGMA).contains(&unsharp.radius) {
            warnings.push(format!(
                "enhancement.unsharp_mask.radius {} is invalid, using {}",
                unsharp.radius, defaults.radius
            ));
            unsharp.radius = defaults.radius;
        }
        if unsharp.threshold < 0 {
            warnings.push(format!(
                "enhancement.unsharp_mask.threshold {} is negative, using 0",
                unsharp.threshold
            ));
            unsharp.threshold = 0;
        }

        warnings
    }

    pub fn parser_settings(&self) -> ParserSettings {
        let unsharp = &self.enhancement.unsharp_mask;
        ParserSettings {
            kelvin_range: self.enhancement.kelvin_range,
            channel_factor_range: self.enhancement.channel_factor_range,
            radius_range: self.enhancement.radius_range,
            unsharp_defaults: UnsharpMaskFilter::new(unsharp.radius, unsharp.percent, unsharp.threshold),
        }
    }

    pub fn restore_options(&self) -> RestoreOptions {
        let restoration = &self.slide_restoration;
        RestoreOptions {
            denoise: restoration.denoise,
            despeckle: restoration.despeckle,
            jpeg_quality: restoration.jpeg_quality.clamp(1, 100) as u8,
            confidence_threshold: restoration.confidence_threshold.min(100) as u8,
        }
    }

    pub fn enhancement_quality(&self) -> u8 {
        self.enhancement.jpeg_quality.clamp(1, 100) as u8
    }

    /// Built-in profiles plus the ones defined in this file
    pub fn profile_registry(&self) -> Result<ProfileRegistry> {
        ProfileRegistry::from_config(&self.slide_restoration)
    }
}

impl ProfileRegistry {
    /// Built-in profiles with the configured ones merged over them
    pub fn from_config(config: &RestorationConfig) -> Result<Self> {
        let mut registry = Self::builtin();
        for (key, profile) in &config.profiles {
            let mut profile = profile.clone();
            if profile.name.is_empty() {
                profile.name = key.clone();
            }
            registry
                .register(key.clone(), profile)
                .map_err(|e| Error::Config(format!("profile '{}': {}", key, e)))?;
        }
        Ok(registry)
    }
}

fn clamp_quality(field: &str, quality: &mut u32, warnings: &mut Vec<String>) {
    let clamped = (*quality).clamp(1, 100);
    if clamped != *quality {
        warnings.push(format!("{} {} is outside 1..=100, using {}", field, quality, clamped));
        *quality = clamped;
    }
}

fn fix_range(field: &str, range: &mut (f32, f32), default: (f32, f32), warnings: &mut Vec<String>) {
    if !range.0.is_finite() || !range.1.is_finite() {
        warnings.push(format!("{} has non-finite bounds, using defaults", field));
        *range = default;
    } else if range.0 > range.1 {
        warnings.push(format!("{} is reversed, swapping bounds", field));
        *range = (range.1, range.0);
    }
}
