pub mod bus;
pub mod catalog;
pub mod geo;
pub mod layers;
pub mod map;
pub mod models;
pub mod popup;
pub mod state;
pub mod style;
pub mod table;
