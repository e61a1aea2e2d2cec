//! Voice assistant commands.

use std::sync::Arc;

use serde::Serialize;

use crate::core_state::CoreState;
use crate::speech::{RecognitionSession, RecognitionStatus};

/// Recognizer status plus the transcript line shown under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoicePanel {
    pub status: RecognitionStatus,
    pub transcript: String,
}

pub fn start_listening(state: &Arc<CoreState>) -> Result<RecognitionSession, String> {
    state.start_listening().map_err(|e| e.to_string())
}

/// Stops listening. Stopping an idle recognizer is not an error.
pub fn stop_listening(state: &Arc<CoreState>) -> Option<RecognitionSession> {
    state.stop_listening()
}

pub fn get_voice_panel(state: &Arc<CoreState>) -> Result<VoicePanel, String> {
    let transcript = state.transcript().map_err(|e| e.to_string())?;
    Ok(VoicePanel {
        status: state.voice_status(),
        transcript: transcript.map(|t| t.display()).unwrap_or_default(),
    })
}

pub fn clear_transcript(state: &Arc<CoreState>) -> Result<(), String> {
    state.clear_transcript().map_err(|e| e.to_string())
}
