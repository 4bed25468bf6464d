//! Keyword classification table
//!
//! Rules are checked top to bottom and the first one whose keywords appear
//! in the text claims the recommendation. The order is part of the parsing
//! contract: "brightness" is checked before "contrast", which is checked
//! before "temperature", and so on down to "sharpness".

use super::extract;
use super::operation::Operation;
use super::ParserSettings;
use crate::types::{Category, Channel, COLOR_TEMP_BASELINE};

type Extractor = fn(&str, &ParserSettings) -> Option<Operation>;

pub(crate) struct Rule {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub extract: Extractor,
}

impl Rule {
    pub fn matches(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k))
    }
}

const CHANNEL_KEYWORDS: [(&str, Channel); 6] = [
    ("red_channel", Channel::Red),
    ("green_channel", Channel::Green),
    ("blue_channel", Channel::Blue),
    ("red channel", Channel::Red),
    ("green channel", Channel::Green),
    ("blue channel", Channel::Blue),
];

pub(crate) static RULES: [Rule; 10] = [
    Rule {
        category: Category::Brightness,
        keywords: &["brightness"],
        extract: brightness,
    },
    Rule {
        category: Category::Contrast,
        keywords: &["contrast"],
        extract: contrast,
    },
    Rule {
        category: Category::ColorTemperature,
        keywords: &["color_temperature", "temperature"],
        extract: color_temperature,
    },
    Rule {
        category: Category::ColorChannel,
        keywords: &[
            "red_channel",
            "green_channel",
            "blue_channel",
            "red channel",
            "green channel",
            "blue channel",
        ],
        extract: color_channel,
    },
    Rule {
        category: Category::UnsharpMask,
        keywords: &["unsharp_mask", "unsharp mask"],
        extract: unsharp_mask,
    },
    Rule {
        category: Category::ShadowsHighlights,
        keywords: &["shadow", "highlight"],
        extract: shadows_highlights,
    },
    Rule {
        category: Category::Vibrance,
        keywords: &["vibrance"],
        extract: vibrance,
    },
    Rule {
        category: Category::Clarity,
        keywords: &["clarity"],
        extract: clarity,
    },
    Rule {
        category: Category::Saturation,
        keywords: &["saturation", "saturate"],
        extract: saturation,
    },
    Rule {
        category: Category::Sharpness,
        keywords: &["sharpness", "sharpen"],
        extract: sharpness,
    },
];

/// First rule whose keywords appear in `lower`
pub(crate) fn classify(lower: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.matches(lower))
}

/// Categories after `rule` whose keywords also appear in `lower`
pub(crate) fn shadowed_categories(rule: &Rule, lower: &str) -> Vec<Category> {
    RULES
        .iter()
        .skip_while(|r| r.category != rule.category)
        .skip(1)
        .filter(|r| r.matches(lower))
        .map(|r| r.category)
        .collect()
}

fn brightness(lower: &str, _: &ParserSettings) -> Option<Operation> {
    extract::verb_percent(lower).map(|percent| Operation::Brightness { percent })
}

fn contrast(lower: &str, _: &ParserSettings) -> Option<Operation> {
    extract::verb_percent(lower).map(|percent| Operation::Contrast { percent })
}

fn saturation(lower: &str, _: &ParserSettings) -> Option<Operation> {
    extract::verb_percent(lower).map(|percent| Operation::Saturation { percent })
}

fn sharpness(lower: &str, _: &ParserSettings) -> Option<Operation> {
    extract::verb_percent(lower).map(|percent| Operation::Sharpness { percent })
}

fn vibrance(lower: &str, _: &ParserSettings) -> Option<Operation> {
    extract::verb_percent(lower).map(|percent| Operation::Vibrance { percent })
}

fn clarity(lower: &str, _: &ParserSettings) -> Option<Operation> {
    extract::verb_percent(lower).map(|strength| Operation::Clarity { strength })
}

fn color_temperature(lower: &str, settings: &ParserSettings) -> Option<Operation> {
    let shift = extract::kelvin_shift(lower)?;
    let (min, max) = settings.kelvin_range;
    Some(Operation::ColorTemperature {
        shift,
        kelvin: (COLOR_TEMP_BASELINE + shift).clamp(min, max),
    })
}

fn color_channel(lower: &str, settings: &ParserSettings) -> Option<Operation> {
    let channel = CHANNEL_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, channel)| channel)?;
    let percent = extract::any_percent(lower)?;
    let (min, max) = settings.channel_factor_range;
    Some(Operation::ColorChannel {
        channel,
        percent,
        factor: (1.0 + percent / 100.0).clamp(min, max),
    })
}

fn unsharp_mask(lower: &str, settings: &ParserSettings) -> Option<Operation> {
    let defaults = &settings.unsharp_defaults;
    let (min_radius, max_radius) = settings.radius_range;
    Some(Operation::UnsharpMask {
        radius: extract::radius(lower)
            .map(|radius| radius.clamp(min_radius, max_radius))
            .unwrap_or(defaults.radius),
        percent: extract::strength(lower).unwrap_or(defaults.percent),
        threshold: extract::threshold(lower).unwrap_or(defaults.threshold),
    })
}

fn shadows_highlights(lower: &str, _: &ParserSettings) -> Option<Operation> {
    let (shadow, highlight) = extract::tonal_adjustments(lower);
    let shadow = shadow.unwrap_or(0.0);
    let highlight = highlight.unwrap_or(0.0);
    if shadow == 0.0 && highlight == 0.0 {
        return None;
    }
    Some(Operation::ShadowsHighlights { shadow, highlight })
}
