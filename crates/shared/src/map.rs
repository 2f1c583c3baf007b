use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pixel position relative to the map container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Geographic position, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Click,
    MouseMove,
    MouseLeave,
}

impl PointerKind {
    pub const ALL: [PointerKind; 3] = [PointerKind::Click, PointerKind::MouseMove, PointerKind::MouseLeave];

    /// Event name understood by the map library.
    pub fn event_name(&self) -> &'static str {
        match self {
            PointerKind::Click => "click",
            PointerKind::MouseMove => "mousemove",
            PointerKind::MouseLeave => "mouseleave",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub point: ScreenPoint,
}

pub type PointerHandler = Box<dyn Fn(&PointerEvent)>;

/// A rendered feature returned by a point query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<Value>,
}

impl Feature {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).filter(|v| !v.is_null())
    }

    /// The feature's geography id. Numeric ids are rendered as strings.
    pub fn geoid(&self) -> Option<String> {
        match self.property("geoid")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Coordinates of a `Point` geometry.
    pub fn point_coordinates(&self) -> Option<LngLat> {
        let geometry = self.geometry.as_ref()?;
        if geometry.get("type")?.as_str()? != "Point" {
            return None;
        }
        let coords = geometry.get("coordinates")?.as_array()?;
        match coords.as_slice() {
            [lng, lat, ..] => Some(LngLat {
                lng: lng.as_f64()?,
                lat: lat.as_f64()?,
            }),
            _ => None,
        }
    }
}

pub trait Popup {
    fn remove(&self);
}

/// The slice of a rendered map that layer handlers need.
pub trait MapSurface {
    type Listener;
    type Popup: Popup;

    /// Features rendered at `point` on the given layer, topmost first.
    fn query_rendered_features(&self, point: ScreenPoint, layer: &str) -> Vec<Feature>;

    fn set_paint_property(&self, layer: &str, name: &str, value: Value);

    fn set_layout_property(&self, layer: &str, name: &str, value: Value);

    /// Show an HTML popup anchored at `at` with no close button that stays open on click.
    fn open_popup(&self, at: LngLat, html: &str) -> Self::Popup;

    fn on(&self, kind: PointerKind, handler: PointerHandler) -> Self::Listener;

    fn off(&self, kind: PointerKind, listener: Self::Listener);
}
