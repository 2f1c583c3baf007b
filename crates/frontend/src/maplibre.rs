//! MapLibre GL JS bindings and the [`MapSurface`] implementation over them.
//!
//! The library is loaded as a page script and reached through the global
//! `maplibregl` namespace. Style expressions and options cross the boundary
//! as JSON.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::{json, Value};
use tract_shared::map::{self as surface, Feature, LngLat, MapSurface, PointerEvent, PointerHandler, PointerKind, ScreenPoint};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl)]
    type Map;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, catch)]
    fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = queryRenderedFeatures, catch)]
    fn query_rendered_features(this: &Map, point: &JsValue, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = setPaintProperty, catch)]
    fn set_paint_property(this: &Map, layer: &str, name: &str, value: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = setLayoutProperty, catch)]
    fn set_layout_property(this: &Map, layer: &str, name: &str, value: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &Map, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn off(this: &Map, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = getCenter)]
    fn get_center(this: &Map) -> JsValue;

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = getBearing)]
    fn get_bearing(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = getPitch)]
    fn get_pitch(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = jumpTo)]
    fn jump_to(this: &Map, options: &JsValue);

    #[wasm_bindgen(method)]
    fn remove(this: &Map);

    #[wasm_bindgen(js_namespace = maplibregl)]
    type Popup;

    #[wasm_bindgen(constructor, js_namespace = maplibregl)]
    fn new(options: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Popup, at: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    fn set_html(this: &Popup, html: &str) -> Popup;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Popup, map: &Map) -> Popup;

    #[wasm_bindgen(method)]
    fn remove(this: &Popup);
}

pub type MapListener = Closure<dyn Fn(JsValue)>;

fn to_js(value: &Value) -> JsValue {
    serde_json::to_string(value)
        .ok()
        .and_then(|s| js_sys::JSON::parse(&s).ok())
        .unwrap_or(JsValue::NULL)
}

fn from_js<T: serde::de::DeserializeOwned>(value: &JsValue) -> Option<T> {
    let text = js_sys::JSON::stringify(value).ok()?.as_string()?;
    serde_json::from_str(&text).ok()
}

fn number_field(obj: &JsValue, key: &str) -> Option<f64> {
    js_sys::Reflect::get(obj, &JsValue::from_str(key)).ok()?.as_f64()
}

/// Screen point carried by a MapLibre mouse event.
fn event_point(event: &JsValue) -> ScreenPoint {
    let point = js_sys::Reflect::get(event, &JsValue::from_str("point")).unwrap_or(JsValue::UNDEFINED);
    ScreenPoint {
        x: number_field(&point, "x").unwrap_or_default(),
        y: number_field(&point, "y").unwrap_or_default(),
    }
}

pub struct MapPopup(Popup);

impl surface::Popup for MapPopup {
    fn remove(&self) {
        self.0.remove();
    }
}

/// One MapLibre map instance bound to a container element.
pub struct MaplibreMap {
    inner: Map,
}

impl MaplibreMap {
    pub fn new(container: &str, style: &str, center: Option<[f64; 2]>, zoom: Option<f64>) -> Result<Self, String> {
        let mut options = json!({ "container": container, "style": style });
        if let Some(center) = center {
            options["center"] = json!(center);
        }
        if let Some(zoom) = zoom {
            options["zoom"] = json!(zoom);
        }
        let inner = Map::new(&to_js(&options)).map_err(|e| format!("{e:?}"))?;
        tracing::debug!(container, "map created");
        Ok(MaplibreMap { inner })
    }

    /// Subscribe to a map-level event that carries nothing the caller needs.
    pub fn on_event(&self, event: &str, handler: impl Fn() + 'static) -> MapListener {
        let closure: MapListener = Closure::new(move |_event: JsValue| handler());
        self.inner.on(event, closure.as_ref().unchecked_ref());
        closure
    }

    pub fn off_event(&self, event: &str, listener: MapListener) {
        self.inner.off(event, listener.as_ref().unchecked_ref());
    }

    fn camera(&self) -> JsValue {
        let camera = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&camera, &"center".into(), &self.inner.get_center());
        let _ = js_sys::Reflect::set(&camera, &"zoom".into(), &self.inner.get_zoom().into());
        let _ = js_sys::Reflect::set(&camera, &"bearing".into(), &self.inner.get_bearing().into());
        let _ = js_sys::Reflect::set(&camera, &"pitch".into(), &self.inner.get_pitch().into());
        camera.into()
    }

    /// Move this map's camera to match `other`.
    pub fn follow(&self, other: &MaplibreMap) {
        self.inner.jump_to(&other.camera());
    }

    /// Tear down the underlying map and its canvas.
    pub fn remove(&self) {
        self.inner.remove();
    }
}

impl MapSurface for MaplibreMap {
    type Listener = MapListener;
    type Popup = MapPopup;

    fn query_rendered_features(&self, point: ScreenPoint, layer: &str) -> Vec<Feature> {
        let options = to_js(&json!({ "layers": [layer] }));
        match self.inner.query_rendered_features(&to_js(&json!([point.x, point.y])), &options) {
            Ok(found) => from_js(&found).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(layer, error = ?e, "feature query failed");
                Vec::new()
            }
        }
    }

    fn set_paint_property(&self, layer: &str, name: &str, value: Value) {
        if let Err(e) = self.inner.set_paint_property(layer, name, &to_js(&value)) {
            tracing::warn!(layer, name, error = ?e, "setPaintProperty failed");
        }
    }

    fn set_layout_property(&self, layer: &str, name: &str, value: Value) {
        if let Err(e) = self.inner.set_layout_property(layer, name, &to_js(&value)) {
            tracing::warn!(layer, name, error = ?e, "setLayoutProperty failed");
        }
    }

    fn open_popup(&self, at: LngLat, html: &str) -> MapPopup {
        let popup = Popup::new(&to_js(&json!({ "closeButton": false, "closeOnClick": false })));
        popup
            .set_lng_lat(&to_js(&json!([at.lng, at.lat])))
            .set_html(html)
            .add_to(&self.inner);
        MapPopup(popup)
    }

    fn on(&self, kind: PointerKind, handler: PointerHandler) -> MapListener {
        let closure: MapListener = Closure::new(move |event: JsValue| {
            handler(&PointerEvent { kind, point: event_point(&event) });
        });
        self.inner.on(kind.event_name(), closure.as_ref().unchecked_ref());
        closure
    }

    fn off(&self, kind: PointerKind, listener: MapListener) {
        self.inner.off(kind.event_name(), listener.as_ref().unchecked_ref());
    }
}

/// Guard that stops a camera update from bouncing back to its source.
#[derive(Debug, Default, Clone)]
pub struct SyncGuard(Rc<Cell<bool>>);

impl SyncGuard {
    /// Run `f` unless a guarded run is already in progress.
    pub fn run(&self, f: impl FnOnce()) -> bool {
        if self.0.get() {
            return false;
        }
        self.0.set(true);
        f();
        self.0.set(false);
        true
    }
}

/// Keeps two maps' cameras in step while alive.
pub struct CameraSync {
    maps: [Rc<MaplibreMap>; 2],
    listeners: Vec<MapListener>,
}

impl CameraSync {
    pub fn new(left: Rc<MaplibreMap>, right: Rc<MaplibreMap>) -> Self {
        let guard = SyncGuard::default();
        let mut listeners = Vec::with_capacity(2);
        for (source, target) in [(&left, &right), (&right, &left)] {
            let (from, to) = (Rc::downgrade(source), Rc::downgrade(target));
            let guard = guard.clone();
            listeners.push(source.on_event("move", move || {
                if let (Some(from), Some(to)) = (from.upgrade(), to.upgrade()) {
                    guard.run(|| to.follow(&from));
                }
            }));
        }
        CameraSync { maps: [left, right], listeners }
    }
}

impl Drop for CameraSync {
    fn drop(&mut self) {
        for (map, listener) in self.maps.iter().zip(self.listeners.drain(..)) {
            map.off_event("move", listener);
        }
    }
}
