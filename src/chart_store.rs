//! Chart store: the only place chart records are mutated.
//!
//! Interpreted commands arrive as patches through [`ChartStore::apply`];
//! direct form edits (one site, the comment, the bleeding toggle, clearing
//! a tooth) have their own operations. Every tooth id is valid by type,
//! so none of these can fail.

use crate::models::{Chart, Patch, Site, ToothId, ToothRecord};

#[derive(Debug, Clone, Default)]
pub struct ChartStore {
    chart: Chart,
}

impl ChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chart(chart: Chart) -> Self {
        Self { chart }
    }

    pub fn get(&self, id: ToothId) -> &ToothRecord {
        self.chart.get(id)
    }

    pub fn get_all(&self) -> &Chart {
        &self.chart
    }

    /// Merge `patch` into the tooth's record and return the result.
    pub fn apply(&mut self, id: ToothId, patch: &Patch) -> ToothRecord {
        let record = self.chart.get_mut(id);
        patch.apply_to(record);
        record.clone()
    }

    /// Replace the whole chart (import).
    pub fn replace_all(&mut self, chart: Chart) {
        self.chart = chart;
    }

    /// Set or clear one site's depth.
    pub fn set_pocket(&mut self, id: ToothId, site: Site, depth: Option<u32>) -> ToothRecord {
        let record = self.chart.get_mut(id);
        record.pockets[site.index()] = depth.map(|d| d.to_string()).unwrap_or_default();
        record.clone()
    }

    pub fn set_comment(&mut self, id: ToothId, comment: impl Into<String>) -> ToothRecord {
        let record = self.chart.get_mut(id);
        record.comment = comment.into();
        record.clone()
    }

    pub fn toggle_bleeding(&mut self, id: ToothId) -> ToothRecord {
        let record = self.chart.get_mut(id);
        record.bleeding = !record.bleeding;
        record.clone()
    }

    /// Reset a tooth to its blank state.
    pub fn clear_tooth(&mut self, id: ToothId) -> ToothRecord {
        let record = self.chart.get_mut(id);
        *record = ToothRecord::default();
        record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ToothId {
        ToothId::new(n).unwrap()
    }

    fn pockets(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn new_store_is_blank() {
        let store = ChartStore::new();
        assert!(ToothId::all().all(|t| store.get(t).is_blank()));
    }

    #[test]
    fn apply_merges_instead_of_replacing() {
        let mut store = ChartStore::new();
        store.set_comment(id(12), "furcation");
        store.apply(
            id(12),
            &Patch {
                pockets: pockets(&["1", "2", "3", "4", "5", "6"]),
                bleeding: Some(false),
                ..Default::default()
            },
        );
        let record = store.apply(
            id(12),
            &Patch {
                pockets: pockets(&["3", "4", "5"]),
                bleeding: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(record.pockets, ["3", "4", "5", "4", "5", "6"].map(String::from));
        assert!(record.bleeding);
        assert_eq!(record.comment, "furcation");
        assert_eq!(store.get(id(12)), &record);
    }

    #[test]
    fn apply_leaves_other_teeth_alone() {
        let mut store = ChartStore::new();
        store.apply(
            id(3),
            &Patch {
                bleeding: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(store.get_all().charted_teeth(), vec![id(3)]);
    }

    #[test]
    fn apply_is_idempotent() {
        let patch = Patch {
            pockets: pockets(&["2", "3"]),
            bleeding: Some(true),
            ..Default::default()
        };
        let mut once = ChartStore::new();
        once.apply(id(9), &patch);
        let mut twice = ChartStore::new();
        twice.apply(id(9), &patch);
        twice.apply(id(9), &patch);
        assert_eq!(once.get_all(), twice.get_all());
    }

    #[test]
    fn form_edits() {
        let mut store = ChartStore::new();
        store.set_pocket(id(30), Site::Lingual, Some(6));
        assert_eq!(store.get(id(30)).pocket_at(Site::Lingual), Some("6"));
        store.set_pocket(id(30), Site::Lingual, None);
        assert_eq!(store.get(id(30)).pocket_at(Site::Lingual), None);

        assert!(store.toggle_bleeding(id(30)).bleeding);
        assert!(!store.toggle_bleeding(id(30)).bleeding);
    }

    #[test]
    fn clear_tooth_resets_everything() {
        let mut store = ChartStore::new();
        store.apply(
            id(1),
            &Patch {
                pockets: pockets(&["5"]),
                pocket: Some("4".into()),
                bleeding: Some(true),
            },
        );
        store.set_comment(id(1), "mobile");
        let record = store.clear_tooth(id(1));
        assert!(record.is_blank());
    }

    #[test]
    fn replace_all_swaps_chart() {
        let mut other = Chart::empty();
        other.get_mut(id(20)).comment = "implant".into();
        let mut store = ChartStore::new();
        store.replace_all(other.clone());
        assert_eq!(store.get_all(), &other);
    }
}
