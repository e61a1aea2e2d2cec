use std::collections::BTreeSet;

use super::bleeding::mentions_bleeding;
use super::measurement::pocket_sequence;
use super::synthesize::command_line_patch;
use super::tooth_ref::find_anchored_tooth;
use super::{Dialect, Grammar, ParseResult, ParsedUpdate};

/// Typed quick-entry grammar:
///
/// ```text
/// "tooth" <ws>+ <int:1-32> [anything] (<int>){0,6} [bleeding]
/// ```
///
/// e.g. `Tooth 12, 3, 3, 4, 3, 4, 5, bleeding`. Depths fill sites in order
/// (MB, B, DB, ML, L, DL); the bleeding flag is set from the presence of
/// the word "bleeding" and cleared otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLineParser;

impl Grammar for CommandLineParser {
    fn dialect(&self) -> Dialect {
        Dialect::CommandLine
    }

    fn parse(&self, text: &str) -> ParseResult {
        let anchor = find_anchored_tooth(text)?;
        let pockets = pocket_sequence(&text[anchor.rest..]);
        let patch = command_line_patch(pockets, mentions_bleeding(text));

        Ok(ParsedUpdate {
            dialect: self.dialect(),
            teeth: BTreeSet::from([anchor.tooth]),
            patch,
        })
    }
}
