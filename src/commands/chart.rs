//! Chart commands.
//!
//! - `submit_command`: typed quick-entry ("Tooth 12, 3, 3, 4, 3, 4, 5, bleeding")
//! - `get_tooth` / `get_chart` / `select_tooth`: reads and selection
//! - `set_site_depth`, `set_tooth_comment`, `toggle_tooth_bleeding`,
//!   `clear_tooth`: direct form edits
//! - `export_chart` / `import_chart` and their file variants

use std::path::Path;
use std::sync::Arc;

use crate::core_state::{CommandOutcome, CoreState};
use crate::models::{Chart, Site, ToothId, ToothRecord};

use super::parse_tooth;

/// Applies a quick-entry command. `Ok(None)` for blank input.
pub fn submit_command(
    text: &str,
    state: &Arc<CoreState>,
) -> Result<Option<CommandOutcome>, String> {
    state.submit_command(text).map_err(|e| e.to_string())
}

pub fn get_tooth(tooth: &str, state: &Arc<CoreState>) -> Result<(ToothId, ToothRecord), String> {
    let id = parse_tooth(tooth)?;
    let record = state.tooth(id).map_err(|e| e.to_string())?;
    Ok((id, record))
}

pub fn get_chart(state: &Arc<CoreState>) -> Result<Chart, String> {
    state.chart().map_err(|e| e.to_string())
}

pub fn select_tooth(tooth: &str, state: &Arc<CoreState>) -> Result<ToothId, String> {
    let id = parse_tooth(tooth)?;
    state.select(id).map_err(|e| e.to_string())?;
    Ok(id)
}

/// Sets one site's depth. `position` counts sites 1-6 (MB, B, DB, ML, L, DL);
/// a blank or "-" depth clears the site.
pub fn set_site_depth(
    tooth: &str,
    position: &str,
    depth: &str,
    state: &Arc<CoreState>,
) -> Result<ToothRecord, String> {
    let id = parse_tooth(tooth)?;
    let site = position
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(Site::from_position)
        .ok_or_else(|| format!("Site must be between 1 and 6 (got {position})"))?;

    let depth = match depth.trim() {
        "" | "-" => None,
        value => Some(
            value.parse::<u32>().map_err(|_| {
                format!("Pocket depth must be a whole number of millimeters (got {value})")
            })?,
        ),
    };

    state.set_site(id, site, depth).map_err(|e| e.to_string())
}

pub fn set_tooth_comment(
    tooth: &str,
    comment: &str,
    state: &Arc<CoreState>,
) -> Result<ToothRecord, String> {
    let id = parse_tooth(tooth)?;
    state.set_comment(id, comment).map_err(|e| e.to_string())
}

pub fn toggle_tooth_bleeding(tooth: &str, state: &Arc<CoreState>) -> Result<ToothRecord, String> {
    let id = parse_tooth(tooth)?;
    state.toggle_bleeding(id).map_err(|e| e.to_string())
}

pub fn clear_tooth(tooth: &str, state: &Arc<CoreState>) -> Result<ToothRecord, String> {
    let id = parse_tooth(tooth)?;
    state.clear_tooth(id).map_err(|e| e.to_string())
}

pub fn export_chart(state: &Arc<CoreState>) -> Result<String, String> {
    state.export_chart().map_err(|e| e.to_string())
}

pub fn import_chart(json: &str, state: &Arc<CoreState>) -> Result<(), String> {
    state.import_chart(json).map_err(|e| e.to_string())
}

pub fn export_chart_to_file(path: &Path, state: &Arc<CoreState>) -> Result<(), String> {
    let json = export_chart(state)?;
    std::fs::write(path, json).map_err(|e| format!("Could not write {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), "Chart exported");
    Ok(())
}

pub fn import_chart_from_file(path: &Path, state: &Arc<CoreState>) -> Result<(), String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Could not read {}: {e}", path.display()))?;
    import_chart(&json, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<CoreState> {
        Arc::new(CoreState::in_memory())
    }

    #[test]
    fn submit_reports_user_messages() {
        let state = state();
        assert_eq!(
            submit_command("3, 3, 4", &state).unwrap_err(),
            "Please start with \"Tooth [number]\""
        );
        assert_eq!(
            submit_command("Tooth 0, 2", &state).unwrap_err(),
            "Tooth number must be between 1 and 32 (got 0)"
        );
        assert!(submit_command("", &state).unwrap().is_none());
    }

    #[test]
    fn site_depth_validation() {
        let state = state();
        let record = set_site_depth("7", "2", "5", &state).unwrap();
        assert_eq!(record.pocket_at(Site::Buccal), Some("5"));

        let record = set_site_depth("7", "2", "-", &state).unwrap();
        assert_eq!(record.pocket_at(Site::Buccal), None);

        assert!(set_site_depth("7", "7", "5", &state).unwrap_err().contains("Site must be"));
        assert!(set_site_depth("7", "1", "deep", &state)
            .unwrap_err()
            .contains("whole number"));
        assert!(set_site_depth("33", "1", "5", &state).is_err());
    }

    #[test]
    fn comment_toggle_clear() {
        let state = state();
        set_tooth_comment("3", "crown margin", &state).unwrap();
        assert!(toggle_tooth_bleeding("3", &state).unwrap().bleeding);
        let (_, record) = get_tooth("3", &state).unwrap();
        assert_eq!(record.comment, "crown margin");
        assert!(clear_tooth("3", &state).unwrap().is_blank());
    }

    #[test]
    fn select_sets_selection() {
        let state = state();
        let id = select_tooth("30", &state).unwrap();
        assert_eq!(state.selected().unwrap(), Some(id));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let source = state();
        submit_command("Tooth 19, 4, 5, 6, bleeding", &source).unwrap();
        export_chart_to_file(&path, &source).unwrap();

        let target = state();
        import_chart_from_file(&path, &target).unwrap();
        assert_eq!(get_chart(&target).unwrap(), get_chart(&source).unwrap());
    }

    #[test]
    fn import_missing_file_message() {
        let state = state();
        let err = import_chart_from_file(Path::new("/nonexistent/chart.json"), &state).unwrap_err();
        assert!(err.starts_with("Could not read"));
    }
}
