//! Line-oriented front end.
//!
//! Reads one line at a time from stdin. Lines that are not a console
//! keyword go to the quick-entry command, so `Tooth 12, 3, 3, 4` works
//! as typed. `say <words>` stands in for the microphone: the words are
//! handed to the speech feed as a finalized transcript.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{chart, voice};
use crate::core_state::{CoreError, CoreState, VoiceOutcome};
use crate::models::{Site, ToothId, ToothRecord};
use crate::speech::TranscriptFeed;

pub const HELP: &str = "\
Quick entry:  Tooth <n>, <MB>, <B>, <DB>, <ML>, <L>, <DL>[, bleeding]
Voice:        listen | say <utterance> | stop | status
Chart:        show [n] | select <n> | site <n> <1-6> <mm|-> | note <n> <text>
              toggle <n> | clear <n> | export [path] | import <path>
Other:        help | quit";

/// What the loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    Silent,
    Quit,
}

/// Interpret one console line.
pub fn handle_line(line: &str, state: &Arc<CoreState>, feed: Option<&TranscriptFeed>) -> Reply {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((k, r)) => (k, r.trim()),
        None => (line, ""),
    };

    let result = match keyword.to_lowercase().as_str() {
        "" => return Reply::Silent,
        "quit" | "exit" => return Reply::Quit,
        "help" => Ok(HELP.to_string()),
        "listen" => {
            voice::start_listening(state).map(|s| format!("Listening (session {})", s.id))
        }
        "stop" => Ok(match voice::stop_listening(state) {
            Some(_) => "Stopped listening".to_string(),
            None => "Not listening".to_string(),
        }),
        "status" => voice::get_voice_panel(state).map(|panel| {
            format!("Status: {}\nTranscript: {}", panel.status, panel.transcript)
        }),
        "say" => match feed {
            Some(feed) => feed.deliver(rest).map(|()| String::new()).map_err(|e| e.to_string()),
            None => Err("Speech recognition is not supported on this system".to_string()),
        },
        "show" if rest.is_empty() => chart::get_chart(state).map(|c| {
            let charted: Vec<String> = c
                .charted_teeth()
                .into_iter()
                .map(|id| format_record(id, c.get(id)))
                .collect();
            if charted.is_empty() {
                "Chart is empty".to_string()
            } else {
                charted.join("\n")
            }
        }),
        "show" => chart::get_tooth(rest, state).map(|(id, r)| format_record(id, &r)),
        "select" => chart::select_tooth(rest, state).map(|id| format!("Selected: {id}")),
        "site" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            match args.as_slice() {
                [tooth, position, depth] => {
                    with_record(tooth, chart::set_site_depth(tooth, position, depth, state))
                }
                _ => Err("Usage: site <tooth> <1-6> <mm|->".to_string()),
            }
        }
        "note" => match rest.split_once(char::is_whitespace) {
            Some((tooth, text)) => {
                with_record(tooth, chart::set_tooth_comment(tooth, text.trim(), state))
            }
            None => with_record(rest, chart::set_tooth_comment(rest, "", state)),
        },
        "toggle" => with_record(rest, chart::toggle_tooth_bleeding(rest, state)),
        "clear" => with_record(rest, chart::clear_tooth(rest, state)),
        "export" if rest.is_empty() => chart::export_chart(state),
        "export" => chart::export_chart_to_file(Path::new(rest), state)
            .map(|()| format!("Exported to {rest}")),
        "import" => chart::import_chart_from_file(Path::new(rest), state)
            .map(|()| format!("Imported {rest}")),
        _ => chart::submit_command(line, state).map(|outcome| match outcome {
            Some(o) => format_record(o.tooth, &o.record),
            None => String::new(),
        }),
    };

    match result {
        Ok(text) if text.is_empty() => Reply::Silent,
        Ok(text) => Reply::Print(text),
        Err(message) => Reply::Print(message),
    }
}

fn with_record(tooth: &str, result: Result<ToothRecord, String>) -> Result<String, String> {
    let record = result?;
    let id = tooth.trim().parse::<ToothId>().map_err(|e| e.to_string())?;
    Ok(format_record(id, &record))
}

/// One-line summary of a tooth, sites in chart order.
pub fn format_record(id: ToothId, record: &ToothRecord) -> String {
    let sites: Vec<String> = Site::ALL
        .iter()
        .map(|&site| {
            format!("{} {}", site.abbreviation(), record.pocket_at(site).unwrap_or("-"))
        })
        .collect();
    let mut line = format!(
        "Tooth {id}: {} | bleeding: {}",
        sites.join(" "),
        if record.bleeding { "yes" } else { "no" }
    );
    if let Some(ref depth) = record.pocket {
        line.push_str(&format!(" | pocket: {depth}"));
    }
    if !record.comment.is_empty() {
        line.push_str(&format!(" | note: {}", record.comment));
    }
    line
}

/// Message for a processed utterance.
pub fn format_voice_outcome(outcome: &Result<VoiceOutcome, CoreError>) -> String {
    match outcome {
        Ok(VoiceOutcome::Applied { teeth, patch }) => {
            let ids: Vec<String> = teeth.iter().map(ToString::to_string).collect();
            let mut parts = Vec::new();
            if let Some(ref depth) = patch.pocket {
                parts.push(format!("pocket {depth}"));
            }
            if let Some(bleeding) = patch.bleeding {
                parts.push(if bleeding { "bleeding" } else { "no bleeding" }.to_string());
            }
            format!("Updated tooth {}: {}", ids.join(", "), parts.join(", "))
        }
        Ok(VoiceOutcome::NoToothDetected { transcript }) => {
            format!("{transcript} (no tooth detected)")
        }
        Err(e) => e.to_string(),
    }
}

/// Run the console until `quit` or end of input.
pub async fn run_console(
    state: Arc<CoreState>,
    feed: Option<TranscriptFeed>,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!(
        "{} {}. Type 'help' for commands.",
        crate::config::APP_NAME,
        crate::config::APP_VERSION
    );

    while let Some(line) = lines.next_line().await? {
        match handle_line(&line, &state, feed.as_ref()) {
            Reply::Print(text) => println!("{text}"),
            Reply::Silent => {}
            Reply::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech;

    fn state() -> Arc<CoreState> {
        Arc::new(CoreState::in_memory())
    }

    fn printed(reply: Reply) -> String {
        match reply {
            Reply::Print(text) => text,
            other => panic!("expected output, got {other:?}"),
        }
    }

    #[test]
    fn quick_entry_passthrough() {
        let state = state();
        let out = printed(handle_line("Tooth 12, 3, 3, 4, 3, 4, 5, bleeding", &state, None));
        assert_eq!(out, "Tooth 12: MB 3 B 3 DB 4 ML 3 L 4 DL 5 | bleeding: yes");
    }

    #[test]
    fn rejected_entry_prints_prompt() {
        let state = state();
        let out = printed(handle_line("3, 3, 4", &state, None));
        assert_eq!(out, "Please start with \"Tooth [number]\"");
    }

    #[test]
    fn quit_and_blank() {
        let state = state();
        assert_eq!(handle_line("quit", &state, None), Reply::Quit);
        assert_eq!(handle_line("   ", &state, None), Reply::Silent);
    }

    #[test]
    fn show_empty_and_single() {
        let state = state();
        assert_eq!(printed(handle_line("show", &state, None)), "Chart is empty");
        handle_line("note 4 watch distal", &state, None);
        assert_eq!(
            printed(handle_line("show 4", &state, None)),
            "Tooth 4: MB - B - DB - ML - L - DL - | bleeding: no | note: watch distal"
        );
    }

    #[test]
    fn site_usage_message() {
        let state = state();
        assert_eq!(
            printed(handle_line("site 4 1", &state, None)),
            "Usage: site <tooth> <1-6> <mm|->"
        );
        let out = printed(handle_line("site 4 1 5", &state, None));
        assert!(out.starts_with("Tooth 4: MB 5"));
    }

    #[test]
    fn say_requires_listening() {
        let (source, feed, _rx) = speech::channel(1);
        let state = Arc::new(CoreState::new(None, Box::new(source)));
        assert_eq!(printed(handle_line("say tooth 3", &state, Some(&feed))), "Not listening");
        assert!(printed(handle_line("listen", &state, Some(&feed))).starts_with("Listening"));
        assert_eq!(handle_line("say tooth 3", &state, Some(&feed)), Reply::Silent);
        assert_eq!(printed(handle_line("stop", &state, Some(&feed))), "Stopped listening");
    }

    #[test]
    fn status_is_prose() {
        let (source, feed, _rx) = speech::channel(1);
        let state = Arc::new(CoreState::new(None, Box::new(source)));
        handle_line("listen", &state, Some(&feed));
        assert_eq!(
            printed(handle_line("status", &state, Some(&feed))),
            "Status: Listening\nTranscript: "
        );
        feed.fail("aborted");
        assert_eq!(
            printed(handle_line("status", &state, Some(&feed))),
            "Status: Recognition error: aborted\nTranscript: "
        );
    }

    #[test]
    fn say_without_feed() {
        let state = state();
        assert_eq!(
            printed(handle_line("say tooth 3", &state, None)),
            "Speech recognition is not supported on this system"
        );
    }

    #[test]
    fn voice_outcome_messages() {
        let applied: Result<VoiceOutcome, CoreError> = Ok(VoiceOutcome::Applied {
            teeth: vec![ToothId::new(8).unwrap()],
            patch: crate::models::Patch {
                pocket: Some("4".into()),
                bleeding: Some(true),
                ..Default::default()
            },
        });
        assert_eq!(format_voice_outcome(&applied), "Updated tooth 8: pocket 4, bleeding");

        let ignored: Result<VoiceOutcome, CoreError> = Ok(VoiceOutcome::NoToothDetected {
            transcript: "pocket four".into(),
        });
        assert_eq!(format_voice_outcome(&ignored), "pocket four (no tooth detected)");
    }
}
