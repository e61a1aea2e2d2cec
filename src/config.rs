use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "PerioChart";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the stored chart. Versioned so a future format change
/// can live next to the old file instead of overwriting it.
pub const CHART_FILE_NAME: &str = "periodontal-chart-v1.json";

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "periodontal-chart.json";

/// Highest tooth number in the Universal Numbering System (adult dentition).
pub const MAX_TOOTH_ID: u8 = 32;

/// How long recently updated teeth stay highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(3);

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PERIOCHART_DATA_DIR";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "periochart=info,periochart_lib=info"
}

/// Get the application data directory
/// ~/PerioChart/ on all platforms, or `$PERIOCHART_DATA_DIR` when set.
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the persisted chart file.
pub fn chart_path() -> PathBuf {
    app_data_dir().join(CHART_FILE_NAME)
}
