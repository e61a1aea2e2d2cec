//! Probing-depth extraction.
//!
//! Two dialects share the digit-run primitive:
//! - command line: an ordered run of bare numbers, assigned to sites 1..6
//! - voice: one depth, either labeled ("pocket 4", "pd is 3", "depth 5")
//!   or, failing that, the first isolated single digit

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::SITES_PER_TOOTH;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid digit run regex"));

static LABELED_DEPTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:pocket|pd|depth)\s*(?:is\s*)?([0-9]{1,2})\b")
        .expect("Invalid labeled depth regex")
});

static BARE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]\b").expect("Invalid bare digit regex"));

/// A depth read from a voice utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenDepth {
    pub value: String,
    /// Where the digits sit in the normalized text.
    pub span: Range<usize>,
    /// True when a label ("pocket", "pd", "depth") introduced the value.
    pub labeled: bool,
}

/// Every run of ASCII digits, left to right.
pub fn digit_runs(text: &str) -> impl Iterator<Item = &str> {
    DIGIT_RUN.find_iter(text).map(|m| m.as_str())
}

/// Command-line dialect: up to six depths in site order. Anything past the
/// sixth number is dropped without error.
pub fn pocket_sequence(rest: &str) -> Vec<String> {
    digit_runs(rest)
        .take(SITES_PER_TOOTH)
        .map(str::to_string)
        .collect()
}

/// Voice dialect, tier one: a depth introduced by a label.
pub fn labeled_depth(normalized: &str) -> Option<SpokenDepth> {
    let caps = LABELED_DEPTH.captures(normalized)?;
    let digits = caps.get(1)?;
    Some(SpokenDepth {
        value: digits.as_str().to_string(),
        span: digits.range(),
        labeled: true,
    })
}

/// Voice dialect, tier two: first isolated single digit outside `skip`.
///
/// Ambiguous by nature: with no label, a lone digit may be a tooth number
/// rather than a depth. Only digits directly after a spoken "tooth" are
/// passed in `skip`; any other lone digit is taken as the depth.
pub fn bare_depth(normalized: &str, skip: &[Range<usize>]) -> Option<SpokenDepth> {
    BARE_DIGIT
        .find_iter(normalized)
        .find(|m| !skip.iter().any(|s| s.start == m.start()))
        .map(|m| SpokenDepth {
            value: m.as_str().to_string(),
            span: m.range(),
            labeled: false,
        })
}

/// Voice dialect: labeled form wins, bare digit is the fallback.
pub fn spoken_depth(normalized: &str, skip: &[Range<usize>]) -> Option<SpokenDepth> {
    labeled_depth(normalized).or_else(|| bare_depth(normalized, skip))
}
