//! Paint and layout expressions for highlighting features.
//!
//! Expressions use the MapLibre JSON expression form.

use serde_json::{json, Value};

use crate::geo::GeoSelection;

pub const SELECTED_COLOR: &str = "#2563eb";
pub const HOVER_COLOR: &str = "#000f";
pub const NEUTRAL_COLOR: &str = "#0000";
pub const ICON_NEUTRAL_COLOR: &str = "#888";

pub const ICON_SIZE_EMPHASIS: f64 = 1.0;
pub const ICON_SIZE_NEUTRAL: f64 = 0.75;

pub const LINE_COLOR: &str = "line-color";
pub const FILL_OUTLINE_COLOR: &str = "fill-outline-color";
pub const ICON_SIZE: &str = "icon-size";
pub const ICON_COLOR: &str = "icon-color";
pub const VISIBILITY: &str = "visibility";

fn geoid_equals(id: &str) -> Value {
    json!(["==", ["get", "geoid"], id])
}

fn numeric_geoid_equals(id: Value) -> Value {
    json!(["==", ["to-number", ["get", "geoid"]], ["to-number", id]])
}

pub fn neutral() -> Value {
    json!(NEUTRAL_COLOR)
}

/// Outline only the selected tract.
pub fn selected_outline(geoid: &str) -> Value {
    json!(["case", geoid_equals(geoid), ["literal", SELECTED_COLOR], NEUTRAL_COLOR])
}

/// Outline the persisted selection first, then the hovered tract.
pub fn selection_and_hover_outline(selection: &GeoSelection, hovered: &str) -> Value {
    json!([
        "case",
        geoid_equals(selection.as_str()),
        ["literal", SELECTED_COLOR],
        geoid_equals(hovered),
        ["literal", HOVER_COLOR],
        NEUTRAL_COLOR
    ])
}

pub fn hover_fill_outline(hovered: &str) -> Value {
    json!(["case", geoid_equals(hovered), ["literal", HOVER_COLOR], NEUTRAL_COLOR])
}

/// Branches matching the features a point layer should emphasize.
fn emphasized_point_conditions(hovered: &str, selection: Option<&GeoSelection>) -> Vec<Value> {
    let mut conditions = vec![numeric_geoid_equals(json!(hovered))];
    if let Some(selection) = selection {
        let selected = selection.numeric().unwrap_or(-1.0);
        conditions.push(numeric_geoid_equals(json!(selected)));
    }
    conditions
}

pub fn point_icon_size(hovered: &str, selection: Option<&GeoSelection>) -> Value {
    let mut expr = vec![json!("case")];
    for condition in emphasized_point_conditions(hovered, selection) {
        expr.push(condition);
        expr.push(json!(ICON_SIZE_EMPHASIS));
    }
    expr.push(json!(ICON_SIZE_NEUTRAL));
    Value::Array(expr)
}

pub fn point_icon_color(hovered: &str, selection: Option<&GeoSelection>) -> Value {
    let mut expr = vec![json!("case")];
    for condition in emphasized_point_conditions(hovered, selection) {
        expr.push(condition);
        expr.push(json!(["literal", SELECTED_COLOR]));
    }
    expr.push(json!(["literal", ICON_NEUTRAL_COLOR]));
    Value::Array(expr)
}

pub fn visibility(visible: bool) -> Value {
    json!(if visible { "visible" } else { "none" })
}
