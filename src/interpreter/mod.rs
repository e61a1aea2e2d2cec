//! Command-to-update interpreter.
//!
//! Turns a typed or transcribed command into the set of teeth it targets
//! and the patch to apply to each. Two grammars share the extractors:
//!
//! - [`CommandLineParser`]: `tooth <n> [depth ...] [bleeding]` on raw text
//! - [`VoiceParser`]: free utterance, normalized first, no anchor needed
//!
//! Interpretation is total: any input yields a [`ParsedUpdate`] or one of
//! the [`InterpretError`] outcomes, never a panic.

pub mod bleeding;
pub mod command_line;
pub mod measurement;
pub mod normalize;
pub mod synthesize;
pub mod tooth_ref;
pub mod voice;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Patch, ToothId};

pub use command_line::CommandLineParser;
pub use normalize::normalize;
pub use voice::VoiceParser;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    #[error("Please start with \"Tooth [number]\"")]
    NoToothReference,

    #[error("Tooth number must be between 1 and 32 (got {0})")]
    ToothOutOfRange(String),

    #[error("No tooth detected")]
    NoToothDetected,
}

/// Which grammar a command is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    CommandLine,
    Voice,
}

/// Teeth a command targets and the patch to apply to each of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedUpdate {
    pub dialect: Dialect,
    pub teeth: BTreeSet<ToothId>,
    pub patch: Patch,
}

pub type ParseResult = Result<ParsedUpdate, InterpretError>;

/// One command grammar.
pub trait Grammar {
    fn dialect(&self) -> Dialect;

    fn parse(&self, text: &str) -> ParseResult;
}

/// Parse `text` with the grammar for `dialect`.
pub fn parse(dialect: Dialect, text: &str) -> ParseResult {
    let result = match dialect {
        Dialect::CommandLine => CommandLineParser.parse(text),
        Dialect::Voice => VoiceParser.parse(text),
    };
    match &result {
        Ok(update) => tracing::debug!(
            ?dialect,
            teeth = ?update.teeth,
            patch = ?update.patch,
            "Command interpreted"
        ),
        Err(e) => tracing::debug!(?dialect, reason = %e, "Command not applied"),
    }
    result
}
