use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use super::{feature_under, pane_indicator, tract_outline, LayerBindings};
use crate::bus::{hovered_event, EventBus};
use crate::map::{MapSurface, PointerKind, ScreenPoint};
use crate::models::Side;
use crate::state::{DashboardState, SharedState};
use crate::style;

pub fn attach<M: MapSurface + 'static>(bindings: &mut LayerBindings<M>, state: SharedState, bus: Rc<dyn EventBus>) {
    let side = bindings.side();
    bindings.install(move |map: &M, event| match event.kind {
        PointerKind::Click => on_click(map, side, event.point, &state, &*bus),
        PointerKind::MouseMove => on_mouse_move(map, side, event.point, &state, &*bus),
        PointerKind::MouseLeave => on_mouse_leave(map, side, &state, &*bus),
    });
}

pub fn detach<M: MapSurface + 'static>(bindings: &mut LayerBindings<M>) {
    bindings.detach();
}

/// Select the tract under the pointer, or clear the pane when clicking empty space
/// or the tract that is already selected.
pub fn on_click<M: MapSurface + ?Sized>(
    map: &M,
    side: Side,
    point: ScreenPoint,
    state: &RefCell<DashboardState>,
    bus: &dyn EventBus,
) {
    let Some(indicator) = pane_indicator(state, side) else {
        return;
    };
    let hit = feature_under(map, point, &indicator.layers.main);
    let current = state.borrow().geo.selection(side).clone();
    tracing::trace!(%side, hit = ?hit.as_ref().map(|(_, id)| id), "choropleth click");

    match hit {
        Some((_, geoid)) if geoid.as_str() != current.as_str() => {
            state.borrow_mut().geo.set_selection(&geoid, side);
            if let Some(outline) = tract_outline(&indicator) {
                map.set_paint_property(outline, style::LINE_COLOR, style::selected_outline(&geoid));
            }
        }
        _ => {
            state.borrow_mut().geo.reset_side(side);
            if let Some(outline) = tract_outline(&indicator) {
                map.set_paint_property(outline, style::LINE_COLOR, style::neutral());
            }
            bus.emit(&hovered_event(side), None);
        }
    }
}

pub fn on_mouse_move<M: MapSurface + ?Sized>(
    map: &M,
    side: Side,
    point: ScreenPoint,
    state: &RefCell<DashboardState>,
    bus: &dyn EventBus,
) {
    let Some(indicator) = pane_indicator(state, side) else {
        return;
    };
    let hit = feature_under(map, point, &indicator.layers.main);
    let main = indicator.layers.main.as_str();
    let tract_level = indicator.is_tract_level();

    if let (Some(outline), Some((_, hovered))) = (tract_outline(&indicator), hit.as_ref()) {
        let selection = state.borrow().geo.selection(side).clone();
        map.set_paint_property(
            outline,
            style::LINE_COLOR,
            style::selection_and_hover_outline(&selection, hovered),
        );
    }

    match hit {
        None => {
            if tract_level {
                map.set_paint_property(main, style::FILL_OUTLINE_COLOR, style::neutral());
            }
            bus.emit(&hovered_event(side), None);
        }
        Some((_, hovered)) => {
            if tract_level {
                map.set_paint_property(main, style::FILL_OUTLINE_COLOR, style::hover_fill_outline(&hovered));
            }
            bus.emit(&hovered_event(side), Some(&hovered));
        }
    }
}

pub fn on_mouse_leave<M: MapSurface + ?Sized>(map: &M, side: Side, state: &RefCell<DashboardState>, bus: &dyn EventBus) {
    let Some(indicator) = pane_indicator(state, side) else {
        return;
    };
    map.set_paint_property(&indicator.layers.main, style::FILL_OUTLINE_COLOR, Value::Null);
    if let Some(outline) = indicator.layers.outline.as_deref() {
        map.set_paint_property(outline, style::LINE_COLOR, style::neutral());
    }
    bus.emit(&hovered_event(side), None);
}
