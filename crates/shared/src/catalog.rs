use crate::models::{Category, CategoryConfig, ConfigError, Indicator, PaneMap, Side};
use crate::table::{self, CsvTable};

pub const DEFAULT_LEFT_YEAR: i32 = 1990;
pub const DEFAULT_RIGHT_YEAR: i32 = 2010;

/// Category catalog plus the per-pane indicator and year choices.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    categories: Vec<Category>,
    selected: Option<Category>,
    loading: bool,
    main_data: String,
    selected_indicators: PaneMap<Option<Indicator>>,
    selected_years: PaneMap<i32>,
    available_indicators: Vec<Indicator>,
}

impl Default for CategoryStore {
    fn default() -> Self {
        CategoryStore {
            categories: Vec::new(),
            selected: None,
            loading: false,
            main_data: String::new(),
            selected_indicators: PaneMap::default(),
            selected_years: PaneMap::new(DEFAULT_LEFT_YEAR, DEFAULT_RIGHT_YEAR),
            available_indicators: Vec::new(),
        }
    }
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply the outcome of a config fetch.
    ///
    /// On success the category list is replaced and the category matching
    /// `query_str` (the page query string) is selected. On failure the error
    /// is logged and the existing list is left alone.
    pub fn finish_load(&mut self, result: Result<CategoryConfig, ConfigError>, query_str: &str) {
        self.loading = false;
        match result {
            Ok(config) => {
                for dup in config.duplicate_query_strs() {
                    tracing::warn!(query_str = dup, "query string shared by several enabled categories");
                }
                tracing::debug!(count = config.categories.len(), "loaded categories");
                self.categories = config.categories;
                self.select_by_query_str(query_str);
            }
            Err(e) => {
                tracing::error!(error = %e, "error loading categories");
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected.as_ref()
    }

    /// Select the first category whose query string equals `query_str`.
    pub fn select_by_query_str(&mut self, query_str: &str) -> Option<&Category> {
        let found = self
            .categories
            .iter()
            .find(|c| c.matches_query(query_str))
            .cloned()?;
        self.selected = Some(found);
        self.selected.as_ref()
    }

    pub fn get_by_query_str(&self, query_str: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches_query(query_str))
    }

    pub fn enabled_categories(&self) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.is_enabled()).collect()
    }

    pub fn set_selected_year(&mut self, year: i32, side: Side) {
        self.selected_years[side] = year;
    }

    pub fn selected_year(&self, side: Side) -> i32 {
        self.selected_years[side]
    }

    pub fn set_selected_indicators(&mut self, indicators: PaneMap<Option<Indicator>>) {
        self.selected_indicators = indicators;
    }

    pub fn set_selected_indicator(&mut self, side: Side, indicator: Option<Indicator>) {
        self.selected_indicators[side] = indicator;
    }

    pub fn selected_indicator(&self, side: Side) -> Option<&Indicator> {
        self.selected_indicators[side].as_ref()
    }

    pub fn set_available_indicators(&mut self, indicators: Vec<Indicator>) {
        self.available_indicators = indicators;
    }

    pub fn available_indicators(&self) -> &[Indicator] {
        &self.available_indicators
    }

    pub fn set_main_data(&mut self, text: String) {
        self.main_data = text;
    }

    pub fn main_data(&self) -> &str {
        &self.main_data
    }

    pub fn parse_csv(&self) -> CsvTable {
        table::parse_csv(&self.main_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoLevel, LayerIds, LayerKind};
    use crate::table::Cell;

    fn config() -> CategoryConfig {
        CategoryConfig::from_json(
            r#"{"categories":[
                {"title":"Education","query_str":"education","description":"Attainment"},
                {"title":"Childcare","query_str":"childcare","description":"Providers","enabled":true},
                {"title":"Housing","query_str":"housing","description":"Soon","enabled":false}
            ]}"#,
        )
        .unwrap()
    }

    fn indicator(id: &str) -> Indicator {
        Indicator {
            id: id.to_string(),
            title: id.to_string(),
            layers: LayerIds { main: format!("{id}-fill"), outline: None },
            geolevel: GeoLevel::Tract,
            kind: LayerKind::Choropleth,
            years: vec![],
        }
    }

    #[test]
    fn test_default_years() {
        let store = CategoryStore::new();
        assert_eq!(store.selected_year(Side::Left), 1990);
        assert_eq!(store.selected_year(Side::Right), 2010);
    }

    #[test]
    fn test_finish_load_selects_by_query() {
        let mut store = CategoryStore::new();
        store.begin_load();
        assert!(store.is_loading());
        store.finish_load(Ok(config()), "childcare");
        assert!(!store.is_loading());
        assert_eq!(store.categories().len(), 3);
        assert_eq!(store.selected_category().unwrap().title, "Childcare");
    }

    #[test]
    fn test_finish_load_empty_query_selects_nothing() {
        let mut store = CategoryStore::new();
        store.finish_load(Ok(config()), "");
        assert!(store.selected_category().is_none());
    }

    #[test]
    fn test_finish_load_error_keeps_list() {
        let mut store = CategoryStore::new();
        store.begin_load();
        let err = ConfigError::Fetch { url: "/config/main.json".into(), reason: "offline".into() };
        store.finish_load(Err(err), "education");
        assert!(!store.is_loading());
        assert!(store.categories().is_empty());

        store.finish_load(Ok(config()), "");
        let err = ConfigError::Fetch { url: "/config/main.json".into(), reason: "offline".into() };
        store.finish_load(Err(err), "");
        assert_eq!(store.categories().len(), 3);
    }

    #[test]
    fn test_select_by_query_str_miss_keeps_selection() {
        let mut store = CategoryStore::new();
        store.finish_load(Ok(config()), "education");
        assert!(store.select_by_query_str("nope").is_none());
        assert_eq!(store.selected_category().unwrap().title, "Education");
    }

    #[test]
    fn test_disabled_category_selectable_by_query() {
        let mut store = CategoryStore::new();
        store.finish_load(Ok(config()), "");
        assert_eq!(store.select_by_query_str("housing").unwrap().title, "Housing");
        assert!(store.get_by_query_str("housing").is_some());
    }

    #[test]
    fn test_enabled_categories_filters_explicit_false() {
        let mut store = CategoryStore::new();
        store.finish_load(Ok(config()), "");
        let titles: Vec<&str> = store.enabled_categories().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Education", "Childcare"]);
    }

    #[test]
    fn test_get_by_query_str_has_no_side_effect() {
        let mut store = CategoryStore::new();
        store.finish_load(Ok(config()), "");
        assert_eq!(store.get_by_query_str("education").unwrap().title, "Education");
        assert!(store.selected_category().is_none());
    }

    #[test]
    fn test_indicator_setters() {
        let mut store = CategoryStore::new();
        store.set_selected_indicators(PaneMap::new(Some(indicator("edu")), None));
        assert_eq!(store.selected_indicator(Side::Left).unwrap().id, "edu");
        assert!(store.selected_indicator(Side::Right).is_none());

        store.set_selected_indicator(Side::Right, Some(indicator("pov")));
        assert_eq!(store.selected_indicator(Side::Right).unwrap().id, "pov");

        store.set_available_indicators(vec![indicator("a"), indicator("b")]);
        assert_eq!(store.available_indicators().len(), 2);
    }

    #[test]
    fn test_set_selected_year() {
        let mut store = CategoryStore::new();
        store.set_selected_year(2022, Side::Left);
        assert_eq!(store.selected_year(Side::Left), 2022);
        assert_eq!(store.selected_year(Side::Right), 2010);
    }

    #[test]
    fn test_parse_csv_uses_main_data() {
        let mut store = CategoryStore::new();
        store.set_main_data("a,b\n1,x\n2,3\n".to_string());
        let table = store.parse_csv();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0], vec![Cell::Number(1.0), Cell::Text("x".into())]);
        assert_eq!(table.rows[1], vec![Cell::Number(2.0), Cell::Number(3.0)]);
    }
}
