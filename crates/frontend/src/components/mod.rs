pub mod indicator_selector;
pub mod map_pane;
pub mod year_selector;
