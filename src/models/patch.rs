use serde::{Deserialize, Serialize};

use super::tooth::{ToothRecord, SITES_PER_TOOTH};

/// Partial update derived from a parsed command.
///
/// `pockets` replaces slots positionally from the first site; slots past
/// its length keep their value. `pocket` is the single voice-dictated depth
/// and lands in its own field. Comments are never patched from text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pockets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bleeding: Option<bool>,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.pockets.is_none() && self.pocket.is_none() && self.bleeding.is_none()
    }

    /// Merge into `record`. Fields absent from the patch are left alone.
    pub fn apply_to(&self, record: &mut ToothRecord) {
        if let Some(ref values) = self.pockets {
            let values = values.iter().take(SITES_PER_TOOTH);
            for (slot, value) in record.pockets.iter_mut().zip(values) {
                slot.clone_from(value);
            }
        }
        if let Some(ref value) = self.pocket {
            record.pocket = Some(value.clone());
        }
        if let Some(bleeding) = self.bleeding {
            record.bleeding = bleeding;
        }
    }
}
