use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two comparison panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn other(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(format!("unknown pane side: {other}")),
        }
    }
}

/// A value held once per pane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaneMap<T> {
    pub left: T,
    pub right: T,
}

impl<T> PaneMap<T> {
    pub fn new(left: T, right: T) -> Self {
        PaneMap { left, right }
    }
}

impl<T> Index<Side> for PaneMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Side> for PaneMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoLevel {
    Tract,
    #[default]
    #[serde(other)]
    Other,
}

/// Which layer event module drives an indicator's map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[default]
    Choropleth,
    Point,
    Childcare,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerIds {
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
}

impl LayerIds {
    /// Every map layer id this indicator owns, main layer first.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.main.as_str()).chain(self.outline.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    pub title: String,
    pub layers: LayerIds,
    #[serde(default)]
    pub geolevel: GeoLevel,
    #[serde(default)]
    pub kind: LayerKind,
    #[serde(default)]
    pub years: Vec<i32>,
}

impl Indicator {
    pub fn is_tract_level(&self) -> bool {
        match self.geolevel {
            GeoLevel::Tract => true,
            GeoLevel::Other => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub title: String,
    #[serde(default, rename = "query_str", skip_serializing_if = "Option::is_none")]
    pub query_str: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_data: Option<String>,
}

impl Category {
    /// Absence of the flag means enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }

    pub fn matches_query(&self, query: &str) -> bool {
        !query.is_empty() && self.query_str.as_deref() == Some(query)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CategoryConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Query strings shared by more than one enabled category.
    pub fn duplicate_query_strs(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let mut dupes: Vec<&str> = Vec::new();
        for q in self
            .categories
            .iter()
            .filter(|c| c.is_enabled())
            .filter_map(|c| c.query_str.as_deref())
        {
            if seen.contains(&q) {
                if !dupes.contains(&q) {
                    dupes.push(q);
                }
            } else {
                seen.push(q);
            }
        }
        dupes
    }
}

/// Per-category document listing the indicators a comparison page offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorConfig {
    pub map_style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
}

impl IndicatorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn find(&self, id: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.id == id)
    }
}
