//! Tooth-reference extraction for both dialects.
//!
//! Command line: one tooth, anchored by the word "tooth", range-checked.
//! Voice: every standalone 1-32 digit token, no anchor required.

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::InterpretError;
use crate::models::ToothId;

/// "tooth" + whitespace + digits, on raw text.
static TOOTH_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)tooth\s+([0-9]+)").expect("Invalid tooth anchor regex"));

/// Standalone 1-32 on normalized text. Alternation order matters only for
/// readability: the word boundaries reject partial matches like "1" in "12".
static TOOTH_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([1-9]|[12][0-9]|3[0-2])\b").expect("Invalid tooth mention regex")
});

/// Digits spoken right after "tooth"/"teeth" on normalized text.
static SPOKEN_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:tooth|teeth)\s+([0-9]+)\b").expect("Invalid spoken anchor regex")
});

/// Tooth found by the command-line anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchoredTooth {
    pub tooth: ToothId,
    /// Byte offset just past the tooth number. Measurements are read from
    /// here on so the tooth number is never taken as a depth.
    pub rest: usize,
}

/// Command-line dialect: locate "tooth N" in raw text.
pub fn find_anchored_tooth(raw: &str) -> Result<AnchoredTooth, InterpretError> {
    let caps = TOOTH_ANCHOR
        .captures(raw)
        .ok_or(InterpretError::NoToothReference)?;
    let whole = caps.get(0).ok_or(InterpretError::NoToothReference)?;
    let digits = caps.get(1).ok_or(InterpretError::NoToothReference)?;

    let tooth = ToothId::from_digits(digits.as_str())
        .map_err(|e| InterpretError::ToothOutOfRange(e.value))?;

    Ok(AnchoredTooth {
        tooth,
        rest: whole.end(),
    })
}

/// Voice dialect: every standalone tooth number, skipping tokens that
/// overlap a `claimed` span (a labeled depth owns its digits).
pub fn find_tooth_mentions(normalized: &str, claimed: &[Range<usize>]) -> BTreeSet<ToothId> {
    TOOTH_MENTION
        .find_iter(normalized)
        .filter(|m| !claimed.iter().any(|c| m.start() < c.end && c.start < m.end()))
        .filter_map(|m| ToothId::from_digits(m.as_str()).ok())
        .collect()
}

/// Spans of numbers that follow a spoken "tooth"/"teeth".
pub fn spoken_anchor_spans(normalized: &str) -> Vec<Range<usize>> {
    SPOKEN_ANCHOR
        .captures_iter(normalized)
        .filter_map(|caps| caps.get(1).map(|m| m.range()))
        .collect()
}
