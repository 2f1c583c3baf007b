use crate::models::{PaneMap, Side};

/// Sentinel id meaning "no tract filter".
pub const TOTAL: &str = "total";

/// Label shown when a pane has no tract selected.
pub const ALL_COUNTIES_LABEL: &str = "All Lancaster and Chester Counties";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeoSelection {
    #[default]
    Total,
    Tract(String),
}

impl GeoSelection {
    /// Interpret a raw geography id; `"total"` is the sentinel, anything else a tract.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        if id == TOTAL {
            GeoSelection::Total
        } else {
            GeoSelection::Tract(id)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GeoSelection::Total => TOTAL,
            GeoSelection::Tract(id) => id,
        }
    }

    pub fn is_total(&self) -> bool {
        matches!(self, GeoSelection::Total)
    }

    /// The tract id as a number, when it is one.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            GeoSelection::Total => None,
            GeoSelection::Tract(id) => {
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }
}

impl std::fmt::Display for GeoSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected geography per pane.
#[derive(Debug, Clone, Default)]
pub struct GeoSelectionStore {
    selection: PaneMap<GeoSelection>,
}

impl GeoSelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the pane's selection. The id is not validated.
    pub fn set_selection(&mut self, geo_id: &str, side: Side) {
        tracing::debug!(%side, geo_id, "geo selection changed");
        self.selection[side] = GeoSelection::from_id(geo_id);
    }

    pub fn selection(&self, side: Side) -> &GeoSelection {
        &self.selection[side]
    }

    pub fn reset(&mut self) {
        self.selection = PaneMap::default();
    }

    pub fn reset_side(&mut self, side: Side) {
        self.selection[side] = GeoSelection::Total;
    }

    pub fn label(&self, side: Side) -> String {
        let selection = &self.selection[side];
        match selection.numeric() {
            Some(_) => format!("Census Tract: {}", selection.as_str()),
            None => ALL_COUNTIES_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_total() {
        let store = GeoSelectionStore::new();
        assert!(store.selection(Side::Left).is_total());
        assert!(store.selection(Side::Right).is_total());
    }

    #[test]
    fn test_set_selection_is_per_side() {
        let mut store = GeoSelectionStore::new();
        store.set_selection("1402", Side::Left);
        store.set_selection("2001", Side::Right);
        assert_eq!(store.selection(Side::Left).as_str(), "1402");
        assert_eq!(store.selection(Side::Right).as_str(), "2001");

        store.set_selection("1500", Side::Right);
        assert_eq!(store.selection(Side::Left).as_str(), "1402");
    }

    #[test]
    fn test_set_selection_total_sentinel() {
        let mut store = GeoSelectionStore::new();
        store.set_selection("1402", Side::Left);
        store.set_selection(TOTAL, Side::Left);
        assert_eq!(store.selection(Side::Left), &GeoSelection::Total);
    }

    #[test]
    fn test_set_selection_does_not_validate() {
        let mut store = GeoSelectionStore::new();
        store.set_selection("not-a-tract", Side::Left);
        assert_eq!(store.selection(Side::Left).as_str(), "not-a-tract");
    }

    #[test]
    fn test_reset_clears_both_sides() {
        let mut store = GeoSelectionStore::new();
        store.set_selection("1402", Side::Left);
        store.set_selection("77", Side::Right);
        store.reset();
        assert_eq!(store.selection(Side::Left).as_str(), TOTAL);
        assert_eq!(store.selection(Side::Right).as_str(), TOTAL);
    }

    #[test]
    fn test_label_for_tract() {
        let mut store = GeoSelectionStore::new();
        store.set_selection("1402", Side::Left);
        assert_eq!(store.label(Side::Left), "Census Tract: 1402");
    }

    #[test]
    fn test_label_for_decimal_tract() {
        let mut store = GeoSelectionStore::new();
        store.set_selection("105.02", Side::Right);
        assert_eq!(store.label(Side::Right), "Census Tract: 105.02");
    }

    #[test]
    fn test_label_for_total_and_non_numeric() {
        let mut store = GeoSelectionStore::new();
        assert_eq!(store.label(Side::Left), ALL_COUNTIES_LABEL);
        store.set_selection("abc", Side::Left);
        assert_eq!(store.label(Side::Left), ALL_COUNTIES_LABEL);
    }

    #[test]
    fn test_label_rejects_blank_and_hex_ids() {
        let mut store = GeoSelectionStore::new();
        store.set_selection("", Side::Left);
        assert_eq!(store.label(Side::Left), ALL_COUNTIES_LABEL);
        store.set_selection("0x1A", Side::Left);
        assert_eq!(store.label(Side::Left), ALL_COUNTIES_LABEL);
        assert_eq!(store.selection(Side::Left).numeric(), None);
    }
}
