use std::sync::LazyLock;

use regex::Regex;

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:no\s+bleed|not\s+bleeding|negative)")
        .expect("Invalid negative bleeding regex")
});

static POSITIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:bleed|positive)").expect("Invalid positive bleeding regex"));

/// Voice dialect: bleeding polarity from normalized text.
///
/// Negative cues are checked first, so "no bleeding positive" is `false`.
/// `None` means bleeding was not mentioned, which is not the same as `false`.
pub fn bleeding_polarity(normalized: &str) -> Option<bool> {
    if NEGATIVE.is_match(normalized) {
        Some(false)
    } else if POSITIVE.is_match(normalized) {
        Some(true)
    } else {
        None
    }
}

/// Command-line dialect: plain substring test for "bleeding".
///
/// No negation handling, so "no bleeding" still reads as bleeding.
pub fn mentions_bleeding(raw: &str) -> bool {
    raw.to_lowercase().contains("bleeding")
}
