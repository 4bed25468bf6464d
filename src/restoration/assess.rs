//! Heuristic slide condition assessment
//!
//! Used when the analysis carries no explicit profile suggestion. Free-text
//! colour fields are scanned for fixed keyword groups; the resulting
//! characteristics map onto a profile by a fixed priority.

use crate::analysis::{AnalysisResult, LooseRecord};
use serde::Serialize;
use std::fmt;

const RED_WORDS: [&str; 3] = ["magenta", "red", "reddish"];
const YELLOW_WORDS: [&str; 5] = ["yellow", "warm", "sepia", "golden", "brown"];
const COOL_WORDS: [&str; 3] = ["cyan", "cool", "blue"];
const FADED_WORDS: [&str; 5] = ["dull", "low", "muted", "faded", "washed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Characteristic {
    RedCast,
    YellowCast,
    CoolCast,
    Faded,
    LowContrast,
    HighGrain,
}

impl Characteristic {
    pub fn as_str(self) -> &'static str {
        match self {
            Characteristic::RedCast => "red_cast",
            Characteristic::YellowCast => "yellow_cast",
            Characteristic::CoolCast => "cool_cast",
            Characteristic::Faded => "faded",
            Characteristic::LowContrast => "low_contrast",
            Characteristic::HighGrain => "high_grain",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the heuristic assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideAssessment {
    /// `unknown`, `heavily_aged`, `well_preserved`, or the recommended profile
    pub condition: String,
    pub confidence: u8,
    pub characteristics: Vec<Characteristic>,
    pub recommended_profile: String,
}

impl SlideAssessment {
    fn unknown() -> Self {
        Self {
            condition: "unknown".to_string(),
            confidence: 0,
            characteristics: Vec::new(),
            recommended_profile: "aged".to_string(),
        }
    }

    /// Assess the colour fields of an analysis result
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        match analysis.color_analysis() {
            Some(colors) => Self::assess(
                colors,
                analysis.enhancement.contrast_level.as_ref(),
                analysis.enhancement.sharpness_clarity.as_ref(),
            ),
            None => Self::unknown(),
        }
    }

    /// Assess from the individual loose records
    pub fn assess(
        colors: &LooseRecord,
        contrast: Option<&LooseRecord>,
        sharpness: Option<&LooseRecord>,
    ) -> Self {
        let mut characteristics = Vec::new();

        let casts = format!(
            "{} {}",
            colors.text("color_temperature"),
            colors.text("detected_color_casts")
        );
        let contains_any = |text: &str, words: &[&str]| words.iter().any(|w| text.contains(w));

        if contains_any(&casts, &RED_WORDS) {
            characteristics.push(Characteristic::RedCast);
        } else if contains_any(&casts, &YELLOW_WORDS) {
            characteristics.push(Characteristic::YellowCast);
        } else if contains_any(&casts, &COOL_WORDS) {
            characteristics.push(Characteristic::CoolCast);
        }

        if contains_any(&colors.text("saturation_level"), &FADED_WORDS) {
            characteristics.push(Characteristic::Faded);
        }
        if contrast.is_some_and(|c| c.text("current_contrast").contains("low")) {
            characteristics.push(Characteristic::LowContrast);
        }
        if sharpness.is_some_and(|s| {
            let noise = s.text("noise_level");
            noise.contains("high") || noise.contains("grain")
        }) {
            characteristics.push(Characteristic::HighGrain);
        }

        let has = |c: Characteristic| characteristics.contains(&c);
        let (profile, confidence) = if has(Characteristic::RedCast) {
            ("red_cast", 80)
        } else if has(Characteristic::YellowCast) {
            ("yellow_cast", 80)
        } else if has(Characteristic::Faded) {
            ("faded", 80)
        } else if has(Characteristic::CoolCast) {
            ("color_cast", 75)
        } else if !characteristics.is_empty() {
            ("aged", 70)
        } else {
            ("well_preserved", 60)
        };

        let (condition, confidence) = if characteristics.len() >= 3 {
            ("heavily_aged", 85)
        } else {
            (profile, confidence)
        };

        Self {
            condition: condition.to_string(),
            confidence,
            characteristics,
            recommended_profile: profile.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assess_colors(fields: LooseRecord) -> SlideAssessment {
        SlideAssessment::assess(&fields, None, None)
    }

    #[test]
    fn test_magenta_tint_is_red_cast() {
        let result = assess_colors(LooseRecord::from([("detected_color_casts", "magenta tint")]));
        assert_eq!(result.recommended_profile, "red_cast");
        assert_eq!(result.characteristics, vec![Characteristic::RedCast]);
        assert_eq!(result.confidence, 80);
    }

    #[test]
    fn test_red_beats_yellow_and_faded() {
        let result = assess_colors(LooseRecord::from([
            ("color_temperature", "warm, golden"),
            ("detected_color_casts", "reddish"),
            ("saturation_level", "muted"),
        ]));
        assert_eq!(result.recommended_profile, "red_cast");
    }

    #[test]
    fn test_yellow_cast() {
        let result = assess_colors(LooseRecord::from([("color_temperature", "Sepia toned")]));
        assert_eq!(result.recommended_profile, "yellow_cast");
        assert_eq!(result.condition, "yellow_cast");
    }

    #[test]
    fn test_faded_beats_cool_cast() {
        let result = assess_colors(LooseRecord::from([
            ("color_temperature", "cool"),
            ("saturation_level", "washed out"),
        ]));
        assert_eq!(result.recommended_profile, "faded");
        assert_eq!(
            result.characteristics,
            vec![Characteristic::CoolCast, Characteristic::Faded]
        );
    }

    #[test]
    fn test_cool_cast_maps_to_color_cast() {
        let result = assess_colors(LooseRecord::from([("detected_color_casts", "cyan shift")]));
        assert_eq!(result.recommended_profile, "color_cast");
        assert_eq!(result.confidence, 75);
    }

    #[test]
    fn test_other_characteristics_give_aged() {
        let colors = LooseRecord::from([("color_temperature", "neutral")]);
        let contrast = LooseRecord::from([("current_contrast", "Low")]);
        let result = SlideAssessment::assess(&colors, Some(&contrast), None);
        assert_eq!(result.recommended_profile, "aged");
        assert_eq!(result.characteristics, vec![Characteristic::LowContrast]);
        assert_eq!(result.confidence, 70);
    }

    #[test]
    fn test_nothing_detected_is_well_preserved() {
        let result = assess_colors(LooseRecord::from([
            ("color_temperature", "neutral"),
            ("saturation_level", "vivid"),
        ]));
        assert_eq!(result.recommended_profile, "well_preserved");
        assert_eq!(result.condition, "well_preserved");
        assert_eq!(result.confidence, 60);
    }

    #[test]
    fn test_three_characteristics_are_heavily_aged() {
        let colors = LooseRecord::from([
            ("color_temperature", "yellowish"),
            ("saturation_level", "dull"),
        ]);
        let sharpness = LooseRecord::from([("noise_level", "visible grain")]);
        let result = SlideAssessment::assess(&colors, None, Some(&sharpness));
        assert_eq!(result.condition, "heavily_aged");
        assert_eq!(result.confidence, 85);
        assert_eq!(result.recommended_profile, "yellow_cast");
    }

    #[test]
    fn test_missing_color_analysis_defaults_to_aged() {
        let result = SlideAssessment::from_analysis(&AnalysisResult::default());
        assert_eq!(result.recommended_profile, "aged");
        assert_eq!(result.condition, "unknown");
        assert_eq!(result.confidence, 0);
    }
}
