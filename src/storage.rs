//! Chart persistence and JSON import/export.
//!
//! The stored file and the export use the same format: an object keyed
//! "1".."32", each value `{ pockets, bleeding, comment }`. Imports are
//! validated in full before anything is replaced.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::models::Chart;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid JSON: {0}")]
    MalformedImport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serialize a chart in the exchange format.
pub fn export_json(chart: &Chart) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(chart)?)
}

/// Parse and validate an exchange-format chart.
pub fn import_json(json: &str) -> Result<Chart, StorageError> {
    serde_json::from_str(json).map_err(|e| StorageError::MalformedImport(e.to_string()))
}

/// Load the stored chart. `Ok(None)` when nothing has been saved yet.
pub fn load_chart(path: &Path) -> Result<Option<Chart>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)?;
    import_json(&json).map(Some)
}

/// Write the chart atomically: temp file in the same directory, then rename.
pub fn save_chart(path: &Path, chart: &Chart) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let json = export_json(chart)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), "Chart saved");
    Ok(())
}
