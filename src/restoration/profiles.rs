//! Slide restoration profiles

use crate::types::{ColorBalance, Error, Result, SlideProfile, FALLBACK_PROFILE};
use log::warn;
use std::collections::BTreeMap;

/// Named set of slide profiles
///
/// Built once, then shared read-only by any number of restorers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, SlideProfile>,
}

impl ProfileRegistry {
    /// Registry with no profiles at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The six built-in profiles
    pub fn builtin() -> Self {
        let profiles = builtin_profiles()
            .into_iter()
            .map(|(key, profile)| (key.to_string(), profile))
            .collect();
        Self { profiles }
    }

    /// Add or replace a profile after checking its ranges
    pub fn register(&mut self, key: impl Into<String>, profile: SlideProfile) -> Result<()> {
        profile.validate()?;
        self.profiles.insert(key.into(), profile);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&SlideProfile> {
        self.profiles.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.profiles.contains_key(key)
    }

    /// Profile keys in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlideProfile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up `key`, falling back to the "aged" profile when it is unknown
    ///
    /// Returns the key actually used alongside the profile.
    pub fn resolve<'a>(&'a self, key: &'a str) -> Result<(&'a str, &'a SlideProfile)> {
        if let Some(profile) = self.profiles.get(key) {
            return Ok((key, profile));
        }
        warn!("Unknown profile: {}. Using '{}'", key, FALLBACK_PROFILE);
        self.profiles
            .get(FALLBACK_PROFILE)
            .map(|profile| (FALLBACK_PROFILE, profile))
            .ok_or(Error::MissingFallbackProfile)
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    name: &str,
    description: &str,
    saturation: f32,
    contrast: f32,
    brightness: f32,
    sharpness: f32,
    color_balance: (f32, f32, f32),
    denoise: bool,
) -> SlideProfile {
    SlideProfile {
        name: name.to_string(),
        description: description.to_string(),
        saturation,
        contrast,
        brightness,
        sharpness,
        color_balance: ColorBalance::new(color_balance.0, color_balance.1, color_balance.2),
        denoise,
        denoise_radius: 0.5,
    }
}

fn builtin_profiles() -> [(&'static str, SlideProfile); 6] {
    [
        (
            "faded",
            profile(
                "Faded Slide",
                "For slides with significant color fading",
                1.5,
                1.6,
                1.15,
                1.2,
                (1.0, 1.05, 1.15),
                true,
            ),
        ),
        (
            "color_cast",
            profile(
                "Color Cast",
                "For slides with general color cast issues",
                1.3,
                1.4,
                1.1,
                1.15,
                (1.0, 1.05, 0.95),
                true,
            ),
        ),
        (
            "red_cast",
            profile(
                "Red Cast",
                "For slides with reddish/warm color cast",
                1.25,
                1.35,
                1.1,
                1.15,
                (0.85, 1.08, 1.12),
                true,
            ),
        ),
        (
            "yellow_cast",
            profile(
                "Yellow Cast",
                "For slides with yellowish aging cast",
                0.75,
                1.2,
                1.05,
                1.1,
                (0.85, 1.0, 1.25),
                true,
            ),
        ),
        (
            "aged",
            profile(
                "Aged",
                "For generally aged slides with mild degradation",
                1.25,
                1.3,
                1.08,
                1.1,
                (1.0, 1.02, 1.05),
                true,
            ),
        ),
        (
            "well_preserved",
            profile(
                "Well Preserved",
                "For slides in good condition needing minor touch-up",
                1.1,
                1.15,
                1.05,
                1.08,
                (1.0, 1.0, 1.0),
                false,
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = ProfileRegistry::builtin();
        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.names(),
            vec!["aged", "color_cast", "faded", "red_cast", "well_preserved", "yellow_cast"]
        );
        for (_, profile) in registry.iter() {
            assert!(profile.validate().is_ok(), "{}", profile.name);
        }
    }

    #[test]
    fn test_yellow_cast_values() {
        let registry = ProfileRegistry::builtin();
        let profile = registry.get("yellow_cast").unwrap();
        assert_eq!(profile.color_balance, ColorBalance::new(0.85, 1.0, 1.25));
        assert_eq!(profile.saturation, 0.75);
        assert!(profile.denoise);
        assert!(!registry.get("well_preserved").unwrap().denoise);
    }

    #[test]
    fn test_register_validates() {
        let mut registry = ProfileRegistry::empty();
        assert!(registry.is_empty());

        let good = SlideProfile {
            name: "Lab".to_string(),
            contrast: 1.4,
            ..SlideProfile::default()
        };
        registry.register("lab", good).unwrap();
        assert!(registry.contains("lab"));

        let bad = SlideProfile {
            name: "Broken".to_string(),
            brightness: -1.0,
            ..SlideProfile::default()
        };
        assert!(matches!(registry.register("broken", bad), Err(Error::InvalidProfile(_))));
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_resolve_falls_back_to_aged() {
        let registry = ProfileRegistry::builtin();
        let (key, profile) = registry.resolve("not_a_real_profile").unwrap();
        assert_eq!(key, "aged");
        assert_eq!(profile, registry.get("aged").unwrap());

        let (key, _) = registry.resolve("faded").unwrap();
        assert_eq!(key, "faded");
    }

    #[test]
    fn test_resolve_without_fallback_fails() {
        let registry = ProfileRegistry::empty();
        assert!(matches!(registry.resolve("faded"), Err(Error::MissingFallbackProfile)));
    }
}
