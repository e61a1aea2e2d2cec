use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_TOOTH_ID;

/// Number of probing sites charted per tooth.
pub const SITES_PER_TOOTH: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Tooth number must be between 1 and {max} (got {value})", max = MAX_TOOTH_ID)]
pub struct InvalidToothId {
    pub value: String,
}

/// Tooth position under the Universal Numbering System (1-32).
///
/// Upper arch is 1-16 (right to left from the patient's perspective),
/// lower arch is 17-32 (left to right). Serialized as its decimal string
/// ("1".."32"), which is also the key format of the persisted chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToothId(u8);

impl ToothId {
    pub fn new(n: u32) -> Option<Self> {
        if (1..=u32::from(MAX_TOOTH_ID)).contains(&n) {
            Some(Self(n as u8))
        } else {
            None
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based position in chart order.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All tooth ids in chart order.
    pub fn all() -> impl Iterator<Item = ToothId> {
        (1..=MAX_TOOTH_ID).map(ToothId)
    }

    /// Parse a run of ASCII digits. Runs too long for any integer type
    /// are out of range, never a parse failure.
    pub fn from_digits(digits: &str) -> Result<Self, InvalidToothId> {
        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidToothId {
                value: digits.to_string(),
            })
    }
}

impl fmt::Display for ToothId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strict parse: canonical decimal only ("7", not "07" or "+7").
impl FromStr for ToothId {
    type Err = InvalidToothId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && !s.starts_with('0');
        if !canonical {
            return Err(InvalidToothId {
                value: s.to_string(),
            });
        }
        Self::from_digits(s)
    }
}

impl TryFrom<String> for ToothId {
    type Error = InvalidToothId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToothId> for String {
    fn from(id: ToothId) -> Self {
        id.to_string()
    }
}

/// One of the six fixed probing positions, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    MesioBuccal,
    Buccal,
    DistoBuccal,
    MesioLingual,
    Lingual,
    DistoLingual,
}

impl Site {
    pub const ALL: [Site; SITES_PER_TOOTH] = [
        Site::MesioBuccal,
        Site::Buccal,
        Site::DistoBuccal,
        Site::MesioLingual,
        Site::Lingual,
        Site::DistoLingual,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Site for a 1-based position as clinicians count them (1 = MB).
    pub fn from_position(position: usize) -> Option<Self> {
        position
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(self) -> &'static str {
        match self {
            Site::MesioBuccal => "Mesio-Buccal",
            Site::Buccal => "Buccal",
            Site::DistoBuccal => "Disto-Buccal",
            Site::MesioLingual => "Mesio-Lingual",
            Site::Lingual => "Lingual",
            Site::DistoLingual => "Disto-Lingual",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Site::MesioBuccal => "MB",
            Site::Buccal => "B",
            Site::DistoBuccal => "DB",
            Site::MesioLingual => "ML",
            Site::Lingual => "L",
            Site::DistoLingual => "DL",
        }
    }
}

/// Charted state of a single tooth.
///
/// Pocket slots hold probing depths as digit strings, empty when unset.
/// That is the persisted representation too, so a record round-trips
/// through JSON unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToothRecord {
    pub pockets: [String; SITES_PER_TOOTH],
    pub bleeding: bool,
    #[serde(default)]
    pub comment: String,
    /// Depth dictated by voice. Kept apart from the six slots because a
    /// spoken depth is not tied to a site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket: Option<String>,
}

impl ToothRecord {
    pub fn pocket_at(&self, site: Site) -> Option<&str> {
        let value = self.pockets[site.index()].as_str();
        (!value.is_empty()).then_some(value)
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooth_id_bounds() {
        assert!(ToothId::new(0).is_none());
        assert_eq!(ToothId::new(1).map(ToothId::number), Some(1));
        assert_eq!(ToothId::new(32).map(ToothId::number), Some(32));
        assert!(ToothId::new(33).is_none());
    }

    #[test]
    fn all_yields_thirty_two_in_order() {
        let ids: Vec<u8> = ToothId::all().map(ToothId::number).collect();
        assert_eq!(ids.len(), 32);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&32));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn from_digits_treats_overflow_as_out_of_range() {
        let err = ToothId::from_digits("99999999999999999999").unwrap_err();
        assert_eq!(err.value, "99999999999999999999");
        assert_eq!(ToothId::from_digits("05").unwrap().number(), 5);
    }

    #[test]
    fn from_str_is_canonical_only() {
        assert_eq!("12".parse::<ToothId>().unwrap().number(), 12);
        assert!("012".parse::<ToothId>().is_err());
        assert!("+5".parse::<ToothId>().is_err());
        assert!("".parse::<ToothId>().is_err());
        assert!("33".parse::<ToothId>().is_err());
    }

    #[test]
    fn tooth_id_serializes_as_string() {
        let id = ToothId::new(8).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"8\"");
        let back: ToothId = serde_json::from_str("\"8\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ToothId>("\"40\"").is_err());
    }

    #[test]
    fn invalid_id_message_names_range() {
        let err = ToothId::from_digits("40").unwrap_err();
        assert_eq!(err.to_string(), "Tooth number must be between 1 and 32 (got 40)");
    }

    #[test]
    fn site_order_matches_slots() {
        assert_eq!(Site::MesioBuccal.index(), 0);
        assert_eq!(Site::DistoLingual.index(), 5);
        assert_eq!(Site::from_position(1), Some(Site::MesioBuccal));
        assert_eq!(Site::from_position(6), Some(Site::DistoLingual));
        assert_eq!(Site::from_position(0), None);
        assert_eq!(Site::from_position(7), None);
    }

    #[test]
    fn record_json_omits_unset_voice_depth() {
        let json = serde_json::to_string(&ToothRecord::default()).unwrap();
        assert_eq!(
            json,
            r#"{"pockets":["","","","","",""],"bleeding":false,"comment":""}"#
        );
    }

    #[test]
    fn pocket_at_hides_empty_slots() {
        let mut record = ToothRecord::default();
        record.pockets[1] = "4".into();
        assert_eq!(record.pocket_at(Site::Buccal), Some("4"));
        assert_eq!(record.pocket_at(Site::MesioBuccal), None);
        assert!(!record.is_blank());
    }
}
