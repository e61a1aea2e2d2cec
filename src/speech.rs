//! Speech capture boundary.
//!
//! The recognizer itself is external. It is modelled as a [`SpeechSource`]
//! the session starts and stops, plus a channel of finalized transcripts.
//! [`channel`] builds the in-process implementation: the capture side
//! holds a [`TranscriptFeed`] and the session drains the receiver, one
//! utterance at a time, with [`pump_utterances`].

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::core_state::{CoreError, CoreState, VoiceOutcome};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech recognition is not supported on this system")]
    Unsupported,

    #[error("Already listening")]
    AlreadyListening,

    #[error("Not listening")]
    NotListening,

    #[error("Still processing the previous utterance")]
    Busy,

    #[error("Transcript channel closed")]
    ChannelClosed,

    #[error("Internal lock error")]
    LockPoisoned,
}

/// Recognizer state shown next to the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum RecognitionStatus {
    Idle,
    Listening,
    Unsupported,
    Error(String),
}

impl fmt::Display for RecognitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionStatus::Idle => f.write_str("Not listening"),
            RecognitionStatus::Listening => f.write_str("Listening"),
            RecognitionStatus::Unsupported => f.write_str("Speech recognition unavailable"),
            RecognitionStatus::Error(reason) => write!(f, "Recognition error: {reason}"),
        }
    }
}

/// One start..stop span of listening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognitionSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl RecognitionSession {
    fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

/// A finalized transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub session_id: Uuid,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

/// External speech recognizer, injected into the session.
pub trait SpeechSource: Send {
    fn start(&mut self) -> Result<RecognitionSession, SpeechError>;

    /// Stop listening. Returns the session that was active, if any.
    fn stop(&mut self) -> Option<RecognitionSession>;

    fn status(&self) -> RecognitionStatus;

    fn is_listening(&self) -> bool {
        self.status() == RecognitionStatus::Listening
    }
}

#[derive(Debug, Default)]
struct SourceState {
    session: Option<RecognitionSession>,
    error: Option<String>,
}

type SharedState = Arc<Mutex<SourceState>>;

/// Channel-backed recognizer.
#[derive(Debug)]
pub struct ChannelSpeechSource {
    state: SharedState,
}

/// Capture side of a [`ChannelSpeechSource`].
#[derive(Debug, Clone)]
pub struct TranscriptFeed {
    state: SharedState,
    tx: mpsc::Sender<Utterance>,
}

/// Build a recognizer, its feed, and the transcript receiver.
///
/// `capacity` bounds how many finalized transcripts may wait; a feed that
/// outruns the session gets [`SpeechError::Busy`] instead of queueing.
pub fn channel(
    capacity: usize,
) -> (ChannelSpeechSource, TranscriptFeed, mpsc::Receiver<Utterance>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let state = SharedState::default();
    (
        ChannelSpeechSource {
            state: state.clone(),
        },
        TranscriptFeed { state, tx },
        rx,
    )
}

impl SpeechSource for ChannelSpeechSource {
    fn start(&mut self) -> Result<RecognitionSession, SpeechError> {
        let mut state = self.state.lock().map_err(|_| SpeechError::LockPoisoned)?;
        if state.session.is_some() {
            return Err(SpeechError::AlreadyListening);
        }
        let session = RecognitionSession::begin();
        state.session = Some(session.clone());
        state.error = None;
        tracing::info!(session_id = %session.id, "Speech recognition started");
        Ok(session)
    }

    fn stop(&mut self) -> Option<RecognitionSession> {
        let session = self.state.lock().ok()?.session.take();
        if let Some(ref s) = session {
            tracing::info!(session_id = %s.id, "Speech recognition stopped");
        }
        session
    }

    fn status(&self) -> RecognitionStatus {
        match self.state.lock() {
            Ok(state) => match (&state.session, &state.error) {
                (Some(_), _) => RecognitionStatus::Listening,
                (None, Some(reason)) => RecognitionStatus::Error(reason.clone()),
                (None, None) => RecognitionStatus::Idle,
            },
            Err(_) => RecognitionStatus::Error(SpeechError::LockPoisoned.to_string()),
        }
    }
}

impl TranscriptFeed {
    /// Hand over one finalized transcript. Dropped unless listening.
    pub fn deliver(&self, text: impl Into<String>) -> Result<(), SpeechError> {
        let session_id = {
            let state = self.state.lock().map_err(|_| SpeechError::LockPoisoned)?;
            state
                .session
                .as_ref()
                .map(|s| s.id)
                .ok_or(SpeechError::NotListening)?
        };
        let utterance = Utterance {
            session_id,
            text: text.into(),
            received_at: Utc::now(),
        };
        self.tx.try_send(utterance).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SpeechError::Busy,
            mpsc::error::TrySendError::Closed(_) => SpeechError::ChannelClosed,
        })
    }

    /// Report a recognizer failure. Ends the current session.
    pub fn fail(&self, reason: impl Into<String>) {
        let reason = reason.into();
        if let Ok(mut state) = self.state.lock() {
            state.session = None;
            state.error = Some(reason.clone());
        }
        tracing::warn!(%reason, "Speech recognition error");
    }
}

/// Recognizer for systems without speech support.
#[derive(Debug, Default)]
pub struct UnsupportedSpeechSource;

impl SpeechSource for UnsupportedSpeechSource {
    fn start(&mut self) -> Result<RecognitionSession, SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn stop(&mut self) -> Option<RecognitionSession> {
        None
    }

    fn status(&self) -> RecognitionStatus {
        RecognitionStatus::Unsupported
    }
}

/// Drain transcripts into the session until the feed side is dropped.
///
/// Each utterance is interpreted to completion before the next is read.
pub async fn pump_utterances<F>(
    state: Arc<CoreState>,
    mut rx: mpsc::Receiver<Utterance>,
    mut on_outcome: F,
) where
    F: FnMut(Result<VoiceOutcome, CoreError>),
{
    while let Some(utterance) = rx.recv().await {
        tracing::debug!(session_id = %utterance.session_id, "Utterance received");
        on_outcome(state.handle_utterance(&utterance.text));
    }
    tracing::debug!("Transcript channel closed");
}
