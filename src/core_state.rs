//! Charting session state.
//!
//! `CoreState` owns the chart store and everything the views share:
//! selected tooth, highlighted teeth, the last voice transcript and the
//! injected speech source. It is wrapped in `Arc` at startup so the input
//! loop, the voice pump and highlight timers share one instance. Locks are
//! never held across an `.await`.
//!
//! Chart saves run while the store lock is held, so the file on disk
//! always reflects the latest applied change, whichever writer made it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chart_store::ChartStore;
use crate::config::HIGHLIGHT_DURATION;
use crate::interpreter::{self, Dialect, InterpretError};
use crate::models::{Chart, Patch, Site, ToothId, ToothRecord};
use crate::speech::{
    RecognitionSession, RecognitionStatus, SpeechError, SpeechSource, UnsupportedSpeechSource,
};
use crate::storage::{self, StorageError};

/// Annotation shown when an utterance names no tooth.
pub const NO_TOOTH_ANNOTATION: &str = "no tooth detected";

// ═══════════════════════════════════════════════════════════
// Outcomes
// ═══════════════════════════════════════════════════════════

/// Result of a quick-entry command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub tooth: ToothId,
    pub patch: Patch,
    pub record: ToothRecord,
}

/// Result of one spoken utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoiceOutcome {
    Applied {
        teeth: Vec<ToothId>,
        patch: Patch,
    },
    /// Nothing was changed; the transcript carries the annotation.
    NoToothDetected { transcript: String },
}

/// Last transcript received from the speech source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub text: String,
    pub annotation: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl Transcript {
    /// Text as displayed: `"<text> (<annotation>)"` when annotated.
    pub fn display(&self) -> String {
        match self.annotation {
            Some(ref note) => format!("{} ({note})", self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct ViewState {
    selected: Option<ToothId>,
    highlighted: BTreeSet<ToothId>,
    /// Bumped on every highlight so a stale timer cannot clear a newer one.
    highlight_generation: u64,
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    store: Mutex<ChartStore>,
    /// Where the chart is saved after each change. `None` keeps it in memory.
    chart_path: Option<PathBuf>,
    view: Mutex<ViewState>,
    transcript: Mutex<Option<Transcript>>,
    speech: Mutex<Box<dyn SpeechSource>>,
}

impl CoreState {
    /// Create the session, loading the stored chart from `chart_path` when
    /// present. A missing or unreadable file starts an empty chart.
    pub fn new(chart_path: Option<PathBuf>, speech: Box<dyn SpeechSource>) -> Self {
        let chart = chart_path
            .as_deref()
            .map(load_or_empty)
            .unwrap_or_default();
        Self {
            store: Mutex::new(ChartStore::from_chart(chart)),
            chart_path,
            view: Mutex::new(ViewState::default()),
            transcript: Mutex::new(None),
            speech: Mutex::new(speech),
        }
    }

    /// Session with no persistence and no speech support.
    pub fn in_memory() -> Self {
        Self::new(None, Box::new(UnsupportedSpeechSource))
    }

    fn store(&self) -> Result<MutexGuard<'_, ChartStore>, CoreError> {
        self.store.lock().map_err(|_| CoreError::LockPoisoned)
    }

    fn view(&self) -> Result<MutexGuard<'_, ViewState>, CoreError> {
        self.view.lock().map_err(|_| CoreError::LockPoisoned)
    }

    fn transcript_slot(&self) -> Result<MutexGuard<'_, Option<Transcript>>, CoreError> {
        self.transcript.lock().map_err(|_| CoreError::LockPoisoned)
    }

    // ── Reads ───────────────────────────────────────────────

    pub fn tooth(&self, id: ToothId) -> Result<ToothRecord, CoreError> {
        Ok(self.store()?.get(id).clone())
    }

    pub fn chart(&self) -> Result<Chart, CoreError> {
        Ok(self.store()?.get_all().clone())
    }

    pub fn selected(&self) -> Result<Option<ToothId>, CoreError> {
        Ok(self.view()?.selected)
    }

    pub fn highlighted(&self) -> Result<BTreeSet<ToothId>, CoreError> {
        Ok(self.view()?.highlighted.clone())
    }

    pub fn transcript(&self) -> Result<Option<Transcript>, CoreError> {
        Ok(self.transcript_slot()?.clone())
    }

    pub fn chart_path(&self) -> Option<&Path> {
        self.chart_path.as_deref()
    }

    // ── Command channels ────────────────────────────────────

    /// Apply a typed quick-entry command. Blank input is ignored.
    pub fn submit_command(
        self: &Arc<Self>,
        text: &str,
    ) -> Result<Option<CommandOutcome>, CoreError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let update = interpreter::parse(Dialect::CommandLine, text).inspect_err(|e| {
            tracing::warn!(reason = %e, "Command rejected");
        })?;
        let Some(&tooth) = update.teeth.first() else {
            return Err(InterpretError::NoToothReference.into());
        };

        let record = {
            let mut store = self.store()?;
            let record = store.apply(tooth, &update.patch);
            self.persist(&store);
            record
        };

        tracing::info!(%tooth, patch = ?update.patch, "Command applied");
        self.select(tooth)?;
        self.highlight([tooth])?;

        Ok(Some(CommandOutcome {
            tooth,
            patch: update.patch,
            record,
        }))
    }

    /// Apply one finalized voice transcript.
    ///
    /// An utterance naming no tooth changes nothing; it is kept as the
    /// transcript with a "no tooth detected" annotation.
    pub fn handle_utterance(self: &Arc<Self>, text: &str) -> Result<VoiceOutcome, CoreError> {
        let update = match interpreter::parse(Dialect::Voice, text) {
            Ok(update) => update,
            Err(InterpretError::NoToothDetected) => {
                self.set_transcript(text, Some(NO_TOOTH_ANNOTATION))?;
                tracing::info!("Utterance ignored: no tooth detected");
                return Ok(VoiceOutcome::NoToothDetected {
                    transcript: text.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        self.set_transcript(text, None)?;

        {
            let mut store = self.store()?;
            for &tooth in &update.teeth {
                store.apply(tooth, &update.patch);
            }
            self.persist(&store);
        }

        let teeth: Vec<ToothId> = update.teeth.iter().copied().collect();
        tracing::info!(teeth = ?teeth, patch = ?update.patch, "Voice update applied");
        if let [only] = teeth.as_slice() {
            self.select(*only)?;
        }
        self.highlight(teeth.iter().copied())?;

        Ok(VoiceOutcome::Applied {
            teeth,
            patch: update.patch,
        })
    }

    // ── Direct form edits ───────────────────────────────────

    pub fn set_site(
        &self,
        id: ToothId,
        site: Site,
        depth: Option<u32>,
    ) -> Result<ToothRecord, CoreError> {
        self.edit(|store| store.set_pocket(id, site, depth))
    }

    pub fn set_comment(&self, id: ToothId, comment: &str) -> Result<ToothRecord, CoreError> {
        self.edit(|store| store.set_comment(id, comment))
    }

    pub fn toggle_bleeding(&self, id: ToothId) -> Result<ToothRecord, CoreError> {
        self.edit(|store| store.toggle_bleeding(id))
    }

    pub fn clear_tooth(&self, id: ToothId) -> Result<ToothRecord, CoreError> {
        self.edit(|store| store.clear_tooth(id))
    }

    fn edit<F>(&self, f: F) -> Result<ToothRecord, CoreError>
    where
        F: FnOnce(&mut ChartStore) -> ToothRecord,
    {
        let mut store = self.store()?;
        let record = f(&mut store);
        self.persist(&store);
        Ok(record)
    }

    // ── Import / export ─────────────────────────────────────

    /// Replace the chart from exchange-format JSON. Validation happens
    /// before the swap, so a rejected import leaves the chart untouched.
    pub fn import_chart(&self, json: &str) -> Result<(), CoreError> {
        let chart = storage::import_json(json).inspect_err(|e| {
            tracing::warn!(reason = %e, "Import rejected");
        })?;
        let charted = chart.charted_teeth().len();
        let mut store = self.store()?;
        store.replace_all(chart);
        self.persist(&store);
        tracing::info!(charted, "Chart imported");
        Ok(())
    }

    pub fn export_chart(&self) -> Result<String, CoreError> {
        let chart = self.chart()?;
        Ok(storage::export_json(&chart)?)
    }

    // ── Selection & highlight ───────────────────────────────

    pub fn select(&self, id: ToothId) -> Result<(), CoreError> {
        self.view()?.selected = Some(id);
        Ok(())
    }

    /// Highlight `teeth`, replacing any previous highlight, and schedule
    /// the clear when running inside a tokio runtime. Returns the
    /// generation to pass to [`CoreState::clear_highlight`].
    pub fn highlight(
        self: &Arc<Self>,
        teeth: impl IntoIterator<Item = ToothId>,
    ) -> Result<u64, CoreError> {
        let generation = {
            let mut view = self.view()?;
            view.highlight_generation += 1;
            view.highlighted = teeth.into_iter().collect();
            view.highlight_generation
        };

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let state = Arc::clone(self);
            handle.spawn(async move {
                tokio::time::sleep(HIGHLIGHT_DURATION).await;
                if let Err(e) = state.clear_highlight(generation) {
                    tracing::warn!(error = %e, "Failed to clear highlight");
                }
            });
        }
        Ok(generation)
    }

    /// Clear the highlight set by `generation`. A newer highlight is left
    /// in place. Returns whether anything was cleared.
    pub fn clear_highlight(&self, generation: u64) -> Result<bool, CoreError> {
        let mut view = self.view()?;
        if view.highlight_generation != generation {
            return Ok(false);
        }
        view.highlighted.clear();
        Ok(true)
    }

    // ── Voice ───────────────────────────────────────────────

    pub fn start_listening(&self) -> Result<RecognitionSession, CoreError> {
        let mut speech = self.speech.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(speech.start()?)
    }

    pub fn stop_listening(&self) -> Option<RecognitionSession> {
        self.speech.lock().ok().and_then(|mut speech| speech.stop())
    }

    pub fn voice_status(&self) -> RecognitionStatus {
        self.speech
            .lock()
            .map(|speech| speech.status())
            .unwrap_or_else(|_| RecognitionStatus::Error(CoreError::LockPoisoned.to_string()))
    }

    pub fn clear_transcript(&self) -> Result<(), CoreError> {
        *self.transcript_slot()? = None;
        Ok(())
    }

    fn set_transcript(&self, text: &str, annotation: Option<&str>) -> Result<(), CoreError> {
        *self.transcript_slot()? = Some(Transcript {
            text: text.to_string(),
            annotation: annotation.map(str::to_string),
            received_at: Utc::now(),
        });
        Ok(())
    }

    // ── Persistence ─────────────────────────────────────────

    /// Save after a change. Takes the store guard so saves happen in the
    /// same order as the changes they record. A failed save keeps the
    /// in-memory change.
    fn persist(&self, store: &ChartStore) {
        if let Some(ref path) = self.chart_path {
            if let Err(e) = storage::save_chart(path, store.get_all()) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save chart");
            }
        }
    }
}

fn load_or_empty(path: &Path) -> Chart {
    match storage::load_chart(path) {
        Ok(Some(chart)) => {
            tracing::info!(path = %path.display(), "Chart loaded");
            chart
        }
        Ok(None) => Chart::empty(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Stored chart unreadable, starting empty"
            );
            Chart::empty()
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Error types
// ═══════════════════════════════════════════════════════════

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error(transparent)]
    Interpret(#[from] InterpretError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Speech(#[from] SpeechError),
}
