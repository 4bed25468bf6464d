//! Recommendation parsing
//!
//! Turns free-text enhancement recommendations ("BRIGHTNESS: increase by 25%",
//! "COLOR_TEMPERATURE: cool by 800K", ...) into a [`Pipeline`]. Each entry is
//! classified into at most one category by the ordered table in [`rules`]; entries
//! without a number, or matching a known no-op phrase, are skipped.
//!
//! The resulting pipeline always starts with the basic adjustments in the
//! order brightness, contrast, saturation, sharpness (a later entry for the
//! same basic category replaces an earlier one), followed by every advanced
//! operation in input order.

mod extract;
pub mod operation;
pub(crate) mod rules;

pub use operation::Operation;

use crate::analysis::AnalysisResult;
use crate::filters::UnsharpMaskFilter;
use crate::pipeline::Pipeline;
use crate::types::{
    Category, Enhancement, DEFAULT_CHANNEL_FACTOR_RANGE, DEFAULT_KELVIN_RANGE,
    DEFAULT_RADIUS_RANGE,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Phrases meaning "leave the image alone"
const NO_OP_PHRASES: [&str; 5] = [
    "no enhancements needed",
    "no_enhancements: maintain current quality",
    "none needed",
    "maintain",
    "normalize",
];

/// Record fields checked, in order, for the recommendation text
const TEXT_FIELDS: [&str; 4] = ["action", "text", "description", "recommendation"];

/// Canonical application order of the basic categories
const BASIC_ORDER: [Category; 4] = [
    Category::Brightness,
    Category::Contrast,
    Category::Saturation,
    Category::Sharpness,
];

/// One recommendation as delivered by the analysis step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationEntry {
    Text(String),
    Record(Map<String, Value>),
    Other(Value),
}

impl RecommendationEntry {
    /// Wrap plain strings as entries
    pub fn from_texts<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts.into_iter().map(|t| Self::Text(t.into())).collect()
    }

    /// Text carried by this entry
    ///
    /// Records yield the first string among `action`, `text`, `description`,
    /// `recommendation`, then the first string-valued field, then their JSON
    /// form. Anything else yields an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Record(map) => TEXT_FIELDS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .or_else(|| map.values().find_map(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
            Self::Other(_) => String::new(),
        }
    }
}

impl From<&str> for RecommendationEntry {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RecommendationEntry {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Parsing limits and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ParserSettings {
    /// Allowed target colour temperature, Kelvin
    pub kelvin_range: (f32, f32),
    /// Allowed single-channel multiplier
    pub channel_factor_range: (f32, f32),
    /// Allowed unsharp mask radius, pixels
    pub radius_range: (f32, f32),
    /// Values used when an unsharp mask recommendation omits a parameter
    pub unsharp_defaults: UnsharpMaskFilter,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            kelvin_range: DEFAULT_KELVIN_RANGE,
            channel_factor_range: DEFAULT_CHANNEL_FACTOR_RANGE,
            radius_range: DEFAULT_RADIUS_RANGE,
            unsharp_defaults: UnsharpMaskFilter::default(),
        }
    }
}

/// An operation together with the text it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecommendation {
    pub operation: Operation,
    pub raw_text: String,
}

impl ParsedRecommendation {
    pub fn to_enhancement(&self) -> Enhancement {
        self.operation.to_enhancement(&self.raw_text)
    }
}

/// Converts recommendation entries into filters
#[derive(Debug, Clone, Default)]
pub struct RecommendationParser {
    settings: ParserSettings,
}

impl RecommendationParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ParserSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Build a pipeline from the given entries
    pub fn parse(&self, entries: &[RecommendationEntry]) -> Pipeline {
        let mut pipeline = Pipeline::new();
        for parsed in self.parse_operations(entries) {
            pipeline.push_boxed(parsed.operation.to_filter());
        }
        pipeline
    }

    /// Enhancement records for the operations the pipeline would apply
    pub fn parse_enhancements(&self, entries: &[RecommendationEntry]) -> Vec<Enhancement> {
        self.parse_operations(entries)
            .iter()
            .map(ParsedRecommendation::to_enhancement)
            .collect()
    }

    /// Build a pipeline from the recommendations in an analysis result
    pub fn parse_from_analysis(&self, analysis: &AnalysisResult) -> Pipeline {
        self.parse(analysis.recommendations())
    }

    /// Parse every entry and arrange the results in application order
    pub fn parse_operations(&self, entries: &[RecommendationEntry]) -> Vec<ParsedRecommendation> {
        let mut basic: Vec<ParsedRecommendation> = Vec::new();
        let mut advanced: Vec<ParsedRecommendation> = Vec::new();

        for entry in entries {
            let Some(parsed) = self.parse_entry(entry) else {
                continue;
            };
            if parsed.operation.category().is_basic() {
                let category = parsed.operation.category();
                if let Some(previous) = basic.iter().position(|p| p.operation.category() == category) {
                    debug!("Replacing earlier {} recommendation", category);
                    basic.remove(previous);
                }
                basic.push(parsed);
            } else {
                advanced.push(parsed);
            }
        }

        let mut ordered = Vec::with_capacity(basic.len() + advanced.len());
        for category in BASIC_ORDER {
            if let Some(index) = basic.iter().position(|p| p.operation.category() == category) {
                ordered.push(basic.swap_remove(index));
            }
        }
        ordered.extend(advanced);
        ordered
    }

    /// Classify one entry; `None` when it is skipped
    pub fn parse_entry(&self, entry: &RecommendationEntry) -> Option<ParsedRecommendation> {
        let text = entry.to_text();
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        if NO_OP_PHRASES.contains(&lower.as_str()) {
            debug!("Skipping no-op recommendation: {:?}", text);
            return None;
        }
        if !extract::has_digit(&lower) {
            debug!("Skipping recommendation without a value: {:?}", text);
            return None;
        }

        let Some(rule) = rules::classify(&lower) else {
            debug!("No category matches recommendation: {:?}", text);
            return None;
        };

        let shadowed = rules::shadowed_categories(rule, &lower);
        if !shadowed.is_empty() {
            let names: Vec<&str> = shadowed.iter().map(|c| c.as_str()).collect();
            warn!(
                "Recommendation {:?} also mentions {}; treating it as {}",
                text,
                names.join(", "),
                rule.category
            );
        }

        match (rule.extract)(&lower, &self.settings) {
            Some(operation) => {
                debug!("Parsed {:?} as {}", text, operation);
                Some(ParsedRecommendation {
                    operation,
                    raw_text: text,
                })
            }
            None => {
                debug!("No {} parameters found in {:?}", rule.category, text);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{
        BrightnessFilter, ColorTemperatureFilter, ContrastFilter, UnsharpMaskFilter,
    };
    use serde_json::json;

    fn entries(texts: &[&str]) -> Vec<RecommendationEntry> {
        RecommendationEntry::from_texts(texts.iter().copied())
    }

    #[test]
    fn test_brightness_and_contrast() {
        let pipeline = RecommendationParser::new().parse(&entries(&[
            "BRIGHTNESS: increase by 25%",
            "CONTRAST: boost by 20%",
        ]));

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.names(), vec!["Brightness", "Contrast"]);
        let brightness = pipeline.get(0).and_then(|f| f.downcast_ref::<BrightnessFilter>()).unwrap();
        let contrast = pipeline.get(1).and_then(|f| f.downcast_ref::<ContrastFilter>()).unwrap();
        assert!((brightness.factor - 1.25).abs() < 1e-6);
        assert!((contrast.factor - 1.20).abs() < 1e-6);
    }

    #[test]
    fn test_brightness_factor_for_any_percent() {
        let parser = RecommendationParser::new();
        for n in [-90, -25, -1, 0, 1, 7, 33, 150] {
            let pipeline = parser.parse(&entries(&[&format!("BRIGHTNESS: increase by {}%", n)]));
            let factor = pipeline.get(0).and_then(|f| f.factor()).unwrap();
            assert!((factor - (1.0 + n as f32 / 100.0)).abs() < 1e-6, "n = {}", n);
        }
    }

    #[test]
    fn test_cool_temperature() {
        let pipeline = RecommendationParser::new().parse(&entries(&["COLOR_TEMPERATURE: cool by 800K"]));
        let temp = pipeline
            .get(0)
            .and_then(|f| f.downcast_ref::<ColorTemperatureFilter>())
            .unwrap();
        assert_eq!(temp.kelvin, 5700.0);
    }

    #[test]
    fn test_texts_without_digits_are_skipped() {
        let parser = RecommendationParser::new();
        let pipeline = parser.parse(&entries(&[
            "BRIGHTNESS: increase slightly",
            "Improve contrast",
            "SHARPNESS: a little more",
        ]));
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_no_op_phrases_are_skipped() {
        let parser = RecommendationParser::new();
        let pipeline = parser.parse(&entries(&["No enhancements needed", "  MAINTAIN  ", "none needed"]));
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_basic_order_is_canonical() {
        let pipeline = RecommendationParser::new().parse(&entries(&[
            "SHARPNESS: increase by 10%",
            "COLOR_TEMPERATURE: warm by 300K",
            "SATURATION: boost by 15%",
            "CONTRAST: boost by 5%",
            "BRIGHTNESS: increase by 8%",
        ]));
        assert_eq!(
            pipeline.names(),
            vec!["Brightness", "Contrast", "Saturation", "Sharpness", "ColorTemperature"]
        );
    }

    #[test]
    fn test_later_basic_entry_replaces_earlier() {
        let pipeline = RecommendationParser::new().parse(&entries(&[
            "BRIGHTNESS: increase by 10%",
            "BRIGHTNESS: increase by 30%",
        ]));
        assert_eq!(pipeline.len(), 1);
        assert!((pipeline.get(0).and_then(|f| f.factor()).unwrap() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_advanced_operations_keep_input_order() {
        let pipeline = RecommendationParser::new().parse(&entries(&[
            "VIBRANCE: increase by 10%",
            "UNSHARP_MASK: radius=1.0px, strength=60%, threshold=2",
            "RED_CHANNEL: reduce by 8%",
            "CLARITY: boost by 20%",
            "SHADOWS: brighten by 10%",
        ]));
        assert_eq!(
            pipeline.names(),
            vec!["Vibrance", "UnsharpMask", "RedChannel", "Clarity", "ShadowsHighlights"]
        );

        let unsharp = pipeline
            .get(1)
            .and_then(|f| f.downcast_ref::<UnsharpMaskFilter>())
            .unwrap();
        assert_eq!(*unsharp, UnsharpMaskFilter::new(1.0, 60, 2));
        assert!((pipeline.get(2).and_then(|f| f.factor()).unwrap() - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_record_entries() {
        let recs: Vec<RecommendationEntry> = serde_json::from_value(json!([
            {"priority": 1, "action": "CONTRAST: boost by 10%"},
            {"note": "BRIGHTNESS: increase by 5%", "other": "ignored"},
            {"level": 3},
            42
        ]))
        .unwrap();

        assert_eq!(recs[0].to_text(), "CONTRAST: boost by 10%");
        assert_eq!(recs[1].to_text(), "BRIGHTNESS: increase by 5%");
        assert_eq!(recs[2].to_text(), r#"{"level":3}"#);
        assert_eq!(recs[3].to_text(), "");

        let pipeline = RecommendationParser::new().parse(&recs);
        assert_eq!(pipeline.names(), vec!["Brightness", "Contrast"]);
    }

    #[test]
    fn test_enhancement_records() {
        let enhancements = RecommendationParser::new().parse_enhancements(&entries(&[
            "COLOR_TEMPERATURE: cool by 800K",
            "CONTRAST: decrease by 10%",
        ]));
        assert_eq!(enhancements.len(), 2);
        assert_eq!(enhancements[0].action, Category::Contrast);
        assert_eq!(enhancements[0].amount_percent, Some(-10.0));
        assert_eq!(enhancements[1].action, Category::ColorTemperature);
        assert_eq!(enhancements[1].value, Some(5700.0));
        assert_eq!(enhancements[1].raw_text, "COLOR_TEMPERATURE: cool by 800K");
    }

    #[test]
    fn test_trailing_purpose_clause_keeps_direction() {
        let parser = RecommendationParser::new();
        let cases = [
            ("BRIGHTNESS: increase by 20% to reduce the dark cast", 1.2),
            ("SATURATION: increase by 15% (to lower dullness)", 1.15),
            ("VIBRANCE: boost by 10% to reduce flatness", 1.1),
            ("CONTRAST: reduce harshness, then increase by 5%", 1.05),
            ("SHARPNESS: lower by 10% to boost smoothness", 0.9),
        ];
        for (text, expected) in cases {
            let pipeline = parser.parse(&entries(&[text]));
            let factor = pipeline.get(0).and_then(|f| f.factor()).unwrap();
            assert!((factor - expected).abs() < 1e-6, "{} gave {}", text, factor);
        }
    }

    #[test]
    fn test_huge_unsharp_radius_runs_clamped() {
        let pipeline = RecommendationParser::new().parse(&entries(&[
            "UNSHARP_MASK: radius=100000000000000000000px, strength=80%",
        ]));
        let unsharp = pipeline
            .get(0)
            .and_then(|f| f.downcast_ref::<UnsharpMaskFilter>())
            .unwrap();
        assert_eq!(unsharp.radius, 25.0);

        let image = image::RgbImage::from_pixel(4, 4, image::Rgb([90, 120, 150]));
        assert_eq!(pipeline.run_rgb(image).unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn test_custom_settings() {
        let parser = RecommendationParser::with_settings(ParserSettings {
            kelvin_range: (3000.0, 9000.0),
            ..ParserSettings::default()
        });
        let pipeline = parser.parse(&entries(&["TEMPERATURE: cool by 5000K"]));
        let temp = pipeline
            .get(0)
            .and_then(|f| f.downcast_ref::<ColorTemperatureFilter>())
            .unwrap();
        assert_eq!(temp.kelvin, 3000.0);
    }
}
