use super::bleeding::bleeding_polarity;
use super::measurement::spoken_depth;
use super::normalize::normalize;
use super::synthesize::voice_patch;
use super::tooth_ref::{find_tooth_mentions, spoken_anchor_spans};
use super::{Dialect, Grammar, InterpretError, ParseResult, ParsedUpdate};

/// Spoken-command grammar over normalized transcripts.
///
/// Any standalone 1-32 number is a candidate tooth. A labeled depth
/// ("pocket 4") owns its digits; without a label the first lone digit not
/// spoken right after "tooth" is read as the depth, and it may also count
/// as a tooth. One depth at most, broadcast to every matched tooth.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceParser;

impl Grammar for VoiceParser {
    fn dialect(&self) -> Dialect {
        Dialect::Voice
    }

    fn parse(&self, text: &str) -> ParseResult {
        let normalized = normalize(text);

        let anchored = spoken_anchor_spans(&normalized);
        let depth = spoken_depth(&normalized, &anchored);
        let claimed: Vec<_> = depth
            .iter()
            .filter(|d| d.labeled)
            .map(|d| d.span.clone())
            .collect();

        let teeth = find_tooth_mentions(&normalized, &claimed);
        if teeth.is_empty() {
            return Err(InterpretError::NoToothDetected);
        }

        let bleeding = bleeding_polarity(&normalized);
        let patch = voice_patch(depth.map(|d| d.value), bleeding, true);

        Ok(ParsedUpdate {
            dialect: self.dialect(),
            teeth,
            patch,
        })
    }
}
