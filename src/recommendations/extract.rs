//! Numeric parameter extraction from lower-cased recommendation text

use regex::Regex;
use std::sync::LazyLock;

/// A percentage following an adjustment verb, e.g. "increase by 25%"
///
/// In a range such as "25-30%" the first bound is taken.
static PERCENT_AFTER_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:increase|decrease|boost|enhance|reduce|lower|raise|by).*?([+-]?\d+(?:\.\d+)?)(?:\s*(?:-|to)\s*\d+(?:\.\d+)?)?\s*%",
    )
    .unwrap()
});

/// Any percentage in the text
static PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([+-]?\d+(?:\.\d+)?)(?:\s*(?:-|to)\s*\d+(?:\.\d+)?)?\s*%").unwrap()
});

/// A Kelvin shift, e.g. "800k", "-300 kelvin" or "300 kelvins"
static KELVIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-]?\d+)\s*k(?:elvins?)?\b").unwrap());

static RADIUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"radius\s*=\s*(\d+(?:\.\d+)?)").unwrap());

static STRENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:strength|amount)\s*=\s*(\d+(?:\.\d+)?)").unwrap());

static UNSIGNED_PERCENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*%").unwrap());

static THRESHOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"threshold\s*=\s*(\d+)").unwrap());

/// Direction verbs; the last one before a number decides its sign
static DIRECTION_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(increase|boost|enhance|raise|brighten|lift|decrease|reduce|lower|darken)")
        .unwrap()
});

/// Tonal verb followed by a percentage: lift/brighten/boost/raise or darken/reduce/lower
static TONAL_ADJUST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(brighten|lift|boost|raise|darken|reduce|lower)\w*\b.*?([+-]?\d+(?:\.\d+)?)(?:\s*(?:-|to)\s*\d+(?:\.\d+)?)?\s*%")
        .unwrap()
});

/// Leading "CATEGORY_NAME:" label
static LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[a-z_ ]+:\s*").unwrap());

static CLAUSE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]|\band\b").unwrap());

/// A parsed number and whether it carried an explicit sign
#[derive(Debug, Clone, Copy, PartialEq)]
struct Signed {
    value: f32,
    explicit: bool,
}

fn parse_signed(raw: &str) -> Option<Signed> {
    let value = raw.parse::<f32>().ok()?;
    Some(Signed {
        value,
        explicit: raw.starts_with('+') || raw.starts_with('-'),
    })
}

/// Apply the text's direction to an unsigned amount; an explicit sign wins
fn directed(signed: Signed, decreasing: bool) -> f32 {
    if !signed.explicit && decreasing {
        -signed.value
    } else {
        signed.value
    }
}

pub(crate) fn has_digit(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
}

fn is_decreasing_verb(verb: &str) -> bool {
    matches!(verb, "decrease" | "reduce" | "lower" | "darken")
}

/// Whether the verb closest before byte `end` asks for a decrease
fn decreasing_before(lower: &str, end: usize) -> bool {
    DIRECTION_VERB
        .find_iter(&lower[..end])
        .last()
        .is_some_and(|verb| is_decreasing_verb(verb.as_str()))
}

fn signed_percent(regex: &Regex, lower: &str) -> Option<f32> {
    let number = regex.captures(lower)?.get(1)?;
    let signed = parse_signed(number.as_str())?;
    Some(directed(signed, decreasing_before(lower, number.start())))
}

/// Signed percentage attached to an adjustment verb
pub(crate) fn verb_percent(lower: &str) -> Option<f32> {
    signed_percent(&PERCENT_AFTER_VERB, lower)
}

/// Signed percentage anywhere in the text
pub(crate) fn any_percent(lower: &str) -> Option<f32> {
    signed_percent(&PERCENT, lower)
}

/// Kelvin shift; "cool" forces it negative, "warm" positive
pub(crate) fn kelvin_shift(lower: &str) -> Option<f32> {
    let caps = KELVIN.captures(lower)?;
    let shift = caps.get(1)?.as_str().parse::<f32>().ok()?;
    Some(if lower.contains("cool") {
        -shift.abs()
    } else if lower.contains("warm") {
        shift.abs()
    } else {
        shift
    })
}

pub(crate) fn radius(lower: &str) -> Option<f32> {
    RADIUS.captures(lower)?.get(1)?.as_str().parse().ok()
}

/// Unsharp strength in percent, from `strength=`/`amount=` or a bare `N%`
pub(crate) fn strength(lower: &str) -> Option<i32> {
    if let Some(caps) = STRENGTH.captures(lower) {
        let value: f32 = caps.get(1)?.as_str().parse().ok()?;
        return Some(value as i32);
    }
    UNSIGNED_PERCENT.captures(lower)?.get(1)?.as_str().parse().ok()
}

pub(crate) fn threshold(lower: &str) -> Option<i32> {
    THRESHOLD.captures(lower)?.get(1)?.as_str().parse().ok()
}

/// Shadow and highlight adjustments, in percent
///
/// Each keyword takes its value from the first clause that mentions it and
/// holds a tonal verb with a percentage, falling back to the whole text.
pub(crate) fn tonal_adjustments(lower: &str) -> (Option<f32>, Option<f32>) {
    let body = LABEL.replace(lower, "");
    let clauses: Vec<&str> = CLAUSE_SPLIT.split(&body).collect();

    let find = |keyword: &str| -> Option<f32> {
        if !lower.contains(keyword) {
            return None;
        }
        clauses
            .iter()
            .filter(|clause| clause.contains(keyword))
            .find_map(|clause| tonal_value(clause))
            .or_else(|| tonal_value(lower))
    };

    (find("shadow"), find("highlight"))
}

fn tonal_value(text: &str) -> Option<f32> {
    let caps = TONAL_ADJUST.captures(text)?;
    let decreasing = is_decreasing_verb(caps.get(1)?.as_str());
    let signed = parse_signed(caps.get(2)?.as_str())?;
    Some(directed(signed, decreasing))
}
