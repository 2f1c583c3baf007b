//! Pointer handlers that highlight features and publish hover events.
//!
//! A [`LayerBindings`] handle is owned by whoever creates the map pane. The
//! layer modules install their click/mousemove/mouseleave handlers through
//! it, and installing again first removes whatever the handle held, so a
//! pane never ends up with duplicate bindings.

pub mod choropleth;
pub mod point;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::bus::EventBus;
use crate::map::{Feature, MapSurface, PointerEvent, PointerKind, Popup, ScreenPoint};
use crate::models::{GeoLevel, Indicator, LayerKind, Side};
use crate::state::{DashboardState, SharedState};
use crate::style;

pub type PopupSlot<P> = Rc<RefCell<Option<P>>>;

/// Listener handle for one map pane.
pub struct LayerBindings<M: MapSurface + 'static> {
    map: Weak<M>,
    side: Side,
    listeners: Vec<(PointerKind, M::Listener)>,
    popup: PopupSlot<M::Popup>,
}

impl<M: MapSurface + 'static> LayerBindings<M> {
    pub fn new(map: &Rc<M>, side: Side) -> Self {
        LayerBindings {
            map: Rc::downgrade(map),
            side,
            listeners: Vec::new(),
            popup: Rc::new(RefCell::new(None)),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub(crate) fn popup_slot(&self) -> PopupSlot<M::Popup> {
        self.popup.clone()
    }

    /// Replace any installed handlers with `handler`, registered for every pointer kind.
    pub(crate) fn install<F>(&mut self, handler: F)
    where
        F: Fn(&M, &PointerEvent) + 'static,
    {
        self.detach();
        let Some(map) = self.map.upgrade() else {
            return;
        };
        let handler = Rc::new(handler);
        for kind in PointerKind::ALL {
            let weak = self.map.clone();
            let handler = handler.clone();
            let listener = map.on(
                kind,
                Box::new(move |event: &PointerEvent| {
                    if let Some(map) = weak.upgrade() {
                        handler(&*map, event);
                    }
                }),
            );
            self.listeners.push((kind, listener));
        }
        tracing::debug!(side = %self.side, "layer handlers attached");
    }

    /// Remove installed handlers and close the pane's popup. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if let Some(popup) = self.popup.borrow_mut().take() {
            popup.remove();
        }
        if self.listeners.is_empty() {
            return;
        }
        match self.map.upgrade() {
            Some(map) => {
                for (kind, listener) in self.listeners.drain(..) {
                    map.off(kind, listener);
                }
            }
            None => self.listeners.clear(),
        }
        tracing::debug!(side = %self.side, "layer handlers detached");
    }
}

impl<M: MapSurface + 'static> Drop for LayerBindings<M> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Attach the layer module matching `kind`.
pub fn attach_for_kind<M: MapSurface + 'static>(
    bindings: &mut LayerBindings<M>,
    kind: LayerKind,
    state: SharedState,
    bus: Rc<dyn EventBus>,
) {
    match kind {
        LayerKind::Choropleth => choropleth::attach(bindings, state, bus),
        LayerKind::Point => point::attach(bindings, point::PointStyle::POINT, state, bus),
        LayerKind::Childcare => point::attach(bindings, point::PointStyle::CHILDCARE, state, bus),
    }
}

/// Show or hide every layer an indicator owns.
pub fn set_indicator_visibility<M: MapSurface + ?Sized>(map: &M, indicator: &Indicator, visible: bool) {
    for layer in indicator.layers.all() {
        map.set_layout_property(layer, style::VISIBILITY, style::visibility(visible));
    }
}

fn pane_indicator(state: &RefCell<DashboardState>, side: Side) -> Option<Indicator> {
    state.borrow().catalog.selected_indicator(side).cloned()
}

/// Outline layer of a tract-level indicator.
fn tract_outline(indicator: &Indicator) -> Option<&str> {
    match indicator.geolevel {
        GeoLevel::Tract => indicator.layers.outline.as_deref(),
        GeoLevel::Other => None,
    }
}

/// Topmost feature under `point` on `layer`, with its geography id.
fn feature_under<M: MapSurface + ?Sized>(map: &M, point: ScreenPoint, layer: &str) -> Option<(Feature, String)> {
    let feature = map.query_rendered_features(point, layer).into_iter().next()?;
    let geoid = feature.geoid()?;
    Some((feature, geoid))
}
