use std::cell::RefCell;
use std::rc::Rc;

use crate::catalog::CategoryStore;
use crate::geo::GeoSelectionStore;
use crate::models::{Indicator, PaneMap, Side};

/// Application state shared by the view layer and the map handlers.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub geo: GeoSelectionStore,
    pub catalog: CategoryStore,
}

pub type SharedState = Rc<RefCell<DashboardState>>;

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedState {
        Rc::new(RefCell::new(self))
    }

    /// Switch category. A match resets both panes' geography and indicators.
    pub fn select_category(&mut self, query_str: &str) -> bool {
        if self.catalog.select_by_query_str(query_str).is_none() {
            return false;
        }
        self.geo.reset();
        self.catalog.set_selected_indicators(PaneMap::default());
        true
    }

    pub fn choose_indicator(&mut self, side: Side, indicator: Option<Indicator>) {
        self.catalog.set_selected_indicator(side, indicator);
        self.geo.reset_side(side);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryConfig, GeoLevel, LayerIds, LayerKind};

    fn loaded() -> DashboardState {
        let mut state = DashboardState::new();
        let config = CategoryConfig::from_json(
            r#"{"categories":[{"title":"Education","query_str":"education","description":""}]}"#,
        )
        .unwrap();
        state.catalog.finish_load(Ok(config), "");
        state
    }

    fn indicator() -> Indicator {
        Indicator {
            id: "edu".into(),
            title: "Education".into(),
            layers: LayerIds { main: "edu-fill".into(), outline: Some("edu-line".into()) },
            geolevel: GeoLevel::Tract,
            kind: LayerKind::Choropleth,
            years: vec![2000, 2010],
        }
    }

    #[test]
    fn test_select_category_resets_geo_and_indicators() {
        let mut state = loaded();
        state.catalog.set_selected_indicator(Side::Left, Some(indicator()));
        state.geo.set_selection("1402", Side::Left);
        state.geo.set_selection("99", Side::Right);

        assert!(state.select_category("education"));
        assert!(state.geo.selection(Side::Left).is_total());
        assert!(state.geo.selection(Side::Right).is_total());
        assert!(state.catalog.selected_indicator(Side::Left).is_none());
    }

    #[test]
    fn test_select_unknown_category_keeps_state() {
        let mut state = loaded();
        state.geo.set_selection("1402", Side::Left);
        assert!(!state.select_category("nope"));
        assert_eq!(state.geo.selection(Side::Left).as_str(), "1402");
    }

    #[test]
    fn test_choose_indicator_resets_only_that_side() {
        let mut state = loaded();
        state.geo.set_selection("1402", Side::Left);
        state.geo.set_selection("99", Side::Right);
        state.choose_indicator(Side::Left, Some(indicator()));
        assert!(state.geo.selection(Side::Left).is_total());
        assert_eq!(state.geo.selection(Side::Right).as_str(), "99");
        assert_eq!(state.catalog.selected_indicator(Side::Left).unwrap().id, "edu");
    }
}
