//! Model of the external image-analysis result
//!
//! Only the parts this crate consumes are modelled. The JSON produced by the
//! analysis step is loosely shaped, so most fields deserialize leniently: a
//! value of the wrong type is treated as absent rather than failing the whole
//! document.

use crate::recommendations::RecommendationEntry;
use crate::types::{deserialize_confidence, Result, SlideProfileDetection, FALLBACK_PROFILE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Top-level analysis document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "lenient")]
    pub enhancement: EnhancementAnalysis,
    /// Typed best-guess slide profile
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub slide_profile: Option<SlideProfileDetection>,
    /// Legacy ranked profile suggestions
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub slide_profiles: Vec<ProfileSuggestion>,
}

impl AnalysisResult {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn recommendations(&self) -> &[RecommendationEntry] {
        &self.enhancement.recommended_enhancements
    }

    pub fn color_analysis(&self) -> Option<&LooseRecord> {
        self.enhancement.color_analysis.as_ref()
    }
}

/// The `enhancement` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementAnalysis {
    #[serde(deserialize_with = "deserialize_recommendations")]
    pub recommended_enhancements: Vec<RecommendationEntry>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color_analysis: Option<LooseRecord>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub contrast_level: Option<LooseRecord>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sharpness_clarity: Option<LooseRecord>,
}

/// A free-form JSON object read through string accessors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LooseRecord(pub Map<String, Value>);

impl LooseRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Lower-cased text of a field; lists are joined with spaces, missing
    /// fields give an empty string
    pub fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(value) => flatten_text(value).to_lowercase(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for LooseRecord {
    fn from(fields: [(&str, &str); N]) -> Self {
        Self(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        )
    }
}

fn flatten_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(flatten_text).collect::<Vec<_>>().join(" "),
        other => other.to_string(),
    }
}

/// One entry of the legacy `slide_profiles` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSuggestion {
    #[serde(default = "fallback_profile_name")]
    pub profile: String,
    #[serde(default, deserialize_with = "deserialize_confidence")]
    pub confidence: u8,
}

fn fallback_profile_name() -> String {
    FALLBACK_PROFILE.to_string()
}

/// Deserialize `T`, substituting its default when the value has another shape
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Accept a list, a single record, or one newline-separated string
fn deserialize_recommendations<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<RecommendationEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(entry_from_value).collect(),
        Value::String(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(RecommendationEntry::from)
            .collect(),
        Value::Object(map) => vec![RecommendationEntry::Record(map)],
        _ => Vec::new(),
    };
    Ok(entries)
}

fn entry_from_value(value: Value) -> RecommendationEntry {
    match value {
        Value::String(text) => RecommendationEntry::Text(text),
        Value::Object(map) => RecommendationEntry::Record(map),
        other => RecommendationEntry::Other(other),
    }
}
