use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tooth::{ToothId, ToothRecord};
use crate::config::MAX_TOOTH_ID;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartFormatError {
    #[error("Chart must contain all {expected} teeth, found {found}")]
    MissingTeeth { expected: usize, found: usize },

    #[error("Tooth {tooth}, site {site}: pocket depth must be digits or empty (got {value:?})")]
    InvalidPocket {
        tooth: ToothId,
        site: usize,
        value: String,
    },

    #[error("Tooth {tooth}: voice pocket depth must be digits (got {value:?})")]
    InvalidVoicePocket { tooth: ToothId, value: String },
}

/// The full 32-tooth chart.
///
/// Records are held in chart order, so every tooth id always resolves to
/// a record. On the wire the chart is an object keyed "1".."32".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<ToothId, ToothRecord>",
    into = "BTreeMap<ToothId, ToothRecord>"
)]
pub struct Chart {
    records: [ToothRecord; MAX_TOOTH_ID as usize],
}

impl Chart {
    pub fn empty() -> Self {
        Self {
            records: Default::default(),
        }
    }

    pub fn get(&self, id: ToothId) -> &ToothRecord {
        &self.records[id.index()]
    }

    pub fn get_mut(&mut self, id: ToothId) -> &mut ToothRecord {
        &mut self.records[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ToothId, &ToothRecord)> {
        ToothId::all().zip(self.records.iter())
    }

    /// Teeth with any charted value.
    pub fn charted_teeth(&self) -> Vec<ToothId> {
        self.iter()
            .filter(|(_, record)| !record.is_blank())
            .map(|(id, _)| id)
            .collect()
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::empty()
    }
}

fn is_depth(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

impl TryFrom<BTreeMap<ToothId, ToothRecord>> for Chart {
    type Error = ChartFormatError;

    fn try_from(mut map: BTreeMap<ToothId, ToothRecord>) -> Result<Self, Self::Error> {
        // Keys already parsed as ToothId, so 32 distinct keys means all of them.
        if map.len() != usize::from(MAX_TOOTH_ID) {
            return Err(ChartFormatError::MissingTeeth {
                expected: usize::from(MAX_TOOTH_ID),
                found: map.len(),
            });
        }

        let mut chart = Chart::empty();
        for id in ToothId::all() {
            let record = map.remove(&id).unwrap_or_default();
            for (site, value) in record.pockets.iter().enumerate() {
                if !value.is_empty() && !is_depth(value) {
                    return Err(ChartFormatError::InvalidPocket {
                        tooth: id,
                        site: site + 1,
                        value: value.clone(),
                    });
                }
            }
            if let Some(ref value) = record.pocket {
                if !is_depth(value) {
                    return Err(ChartFormatError::InvalidVoicePocket {
                        tooth: id,
                        value: value.clone(),
                    });
                }
            }
            *chart.get_mut(id) = record;
        }
        Ok(chart)
    }
}

impl From<Chart> for BTreeMap<ToothId, ToothRecord> {
    fn from(chart: Chart) -> Self {
        ToothId::all().zip(chart.records).collect()
    }
}
