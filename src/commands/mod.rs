//! User-facing operations.
//!
//! Each command takes the shared `CoreState` and returns `Result<T, String>`
//! where the error is the message shown to the user. Tooth numbers arrive
//! as text from the input surface and are validated here.

pub mod chart;
pub mod voice;

use crate::models::ToothId;

/// Parse a tooth number typed by the user.
pub(crate) fn parse_tooth(input: &str) -> Result<ToothId, String> {
    input.trim().parse::<ToothId>().map_err(|e| e.to_string())
}
