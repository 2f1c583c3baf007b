use std::cell::RefCell;
use std::rc::Rc;

use super::{feature_under, pane_indicator, LayerBindings, PopupSlot};
use crate::bus::{hovered_event, EventBus};
use crate::map::{MapSurface, PointerKind, Popup, ScreenPoint};
use crate::models::Side;
use crate::popup::{popup_html, PopupKind};
use crate::state::{DashboardState, SharedState};
use crate::style;

/// How a point layer renders its popup and highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointStyle {
    pub popup: PopupKind,
    /// Keep the pane's selected feature emphasized while hovering others.
    pub emphasize_selection: bool,
}

impl PointStyle {
    pub const POINT: PointStyle = PointStyle {
        popup: PopupKind::Basic,
        emphasize_selection: true,
    };

    pub const CHILDCARE: PointStyle = PointStyle {
        popup: PopupKind::Childcare,
        emphasize_selection: false,
    };
}

pub fn attach<M: MapSurface + 'static>(
    bindings: &mut LayerBindings<M>,
    point_style: PointStyle,
    state: SharedState,
    bus: Rc<dyn EventBus>,
) {
    let side = bindings.side();
    let popup = bindings.popup_slot();
    bindings.install(move |map: &M, event| match event.kind {
        PointerKind::Click => on_click(map, side, event.point, &state, &*bus),
        PointerKind::MouseMove => on_mouse_move(map, side, event.point, point_style, &state, &popup, &*bus),
        PointerKind::MouseLeave => {}
    });
}

pub fn detach<M: MapSurface + 'static>(bindings: &mut LayerBindings<M>) {
    bindings.detach();
}

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
    let main = indicator.layers.main.as_str();
    let hit = feature_under(map, point, main);
    let current = state.borrow().geo.selection(side).clone();
    tracing::trace!(%side, hit = ?hit.as_ref().map(|(_, id)| id), "point click");

    match hit {
        Some((_, geoid)) if geoid.as_str() != current.as_str() => {
            state.borrow_mut().geo.set_selection(&geoid, side);
        }
        _ => {
            state.borrow_mut().geo.reset_side(side);
            map.set_layout_property(main, style::ICON_SIZE, serde_json::json!(style::ICON_SIZE_EMPHASIS));
            map.set_paint_property(main, style::ICON_COLOR, serde_json::json!(style::ICON_NEUTRAL_COLOR));
            bus.emit(&hovered_event(side), None);
        }
    }
}

pub fn on_mouse_move<M: MapSurface + ?Sized>(
    map: &M,
    side: Side,
    point: ScreenPoint,
    point_style: PointStyle,
    state: &RefCell<DashboardState>,
    popup: &PopupSlot<M::Popup>,
    bus: &dyn EventBus,
) {
    let Some(indicator) = pane_indicator(state, side) else {
        return;
    };
    if let Some(open) = popup.borrow_mut().take() {
        open.remove();
    }

    let main = indicator.layers.main.as_str();
    // Providers need not carry a tract id; any rendered feature gets a popup.
    let Some(feature) = map.query_rendered_features(point, main).into_iter().next() else {
        set_neutral_icons(map, main);
        bus.emit(&hovered_event(side), None);
        return;
    };

    if let Some(at) = feature.point_coordinates() {
        let html = popup_html(point_style.popup, &feature.properties);
        *popup.borrow_mut() = Some(map.open_popup(at, &html));
    }

    let Some(hovered) = feature.geoid() else {
        set_neutral_icons(map, main);
        return;
    };
    let selection = point_style
        .emphasize_selection
        .then(|| state.borrow().geo.selection(side).clone());
    map.set_layout_property(main, style::ICON_SIZE, style::point_icon_size(&hovered, selection.as_ref()));
    map.set_paint_property(main, style::ICON_COLOR, style::point_icon_color(&hovered, selection.as_ref()));
}

fn set_neutral_icons<M: MapSurface + ?Sized>(map: &M, layer: &str) {
    map.set_layout_property(layer, style::ICON_SIZE, serde_json::json!(style::ICON_SIZE_NEUTRAL));
    map.set_paint_property(layer, style::ICON_COLOR, serde_json::json!(style::ICON_NEUTRAL_COLOR));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoSelection;
    use crate::layers::testing::*;
    use crate::map::{Feature, LngLat};
    use crate::models::{GeoLevel, Indicator, LayerIds, LayerKind};
    use serde_json::json;

    fn provider(geoid: &str) -> Feature {
        Feature {
            properties: json!({"geoid": geoid, "Provider_Name": "Sunny Days", "Capacity": 40})
                .as_object()
                .cloned()
                .unwrap(),
            geometry: Some(json!({"type": "Point", "coordinates": [-80.8, 34.7]})),
        }
    }

    fn childcare_indicator(kind: LayerKind) -> Indicator {
        Indicator {
            id: "care".into(),
            title: "Child care".into(),
            layers: LayerIds { main: "care-points".into(), outline: None },
            geolevel: GeoLevel::Other,
            kind,
            years: vec![],
        }
    }

    fn setup(
        point_style: PointStyle,
    ) -> (Rc<FakeMap>, SharedState, Rc<RecordingBus>, LayerBindings<FakeMap>) {
        let map = FakeMap::new();
        let state = state_with(Side::Left, childcare_indicator(LayerKind::Childcare));
        let bus = RecordingBus::new();
        let mut bindings = LayerBindings::new(&map, Side::Left);
        attach(&mut bindings, point_style, state.clone(), bus.clone());
        (map, state, bus, bindings)
    }

    // --- click ---

    #[test]
    fn test_click_selects_and_toggles() {
        let (map, state, bus, _bindings) = setup(PointStyle::POINT);
        map.hover(vec![provider("12")]);

        map.fire(PointerKind::Click);
        assert_eq!(state.borrow().geo.selection(Side::Left).as_str(), "12");
        assert_eq!(bus.count(), 0);

        map.fire(PointerKind::Click);
        assert!(state.borrow().geo.selection(Side::Left).is_total());
        assert_eq!(map.last_layout("care-points", style::ICON_SIZE), Some(json!(1.0)));
        assert_eq!(map.last_paint("care-points", style::ICON_COLOR), Some(json!("#888")));
        assert_eq!(bus.last(), Some(("tract-left-hovered".to_string(), None)));
    }

    #[test]
    fn test_click_empty_resets() {
        let (map, state, bus, _bindings) = setup(PointStyle::CHILDCARE);
        state.borrow_mut().geo.set_selection("12", Side::Left);
        map.hover(vec![]);
        map.fire(PointerKind::Click);
        assert_eq!(state.borrow().geo.selection(Side::Left), &GeoSelection::Total);
        assert_eq!(bus.count(), 1);
    }

    // --- hover ---

    #[test]
    fn test_hover_opens_popup_and_emphasizes() {
        let (map, _state, bus, _bindings) = setup(PointStyle::CHILDCARE);
        map.hover(vec![provider("12")]);
        map.fire(PointerKind::MouseMove);

        let popups = map.popups.borrow();
        assert_eq!(popups.len(), 1);
        assert_eq!(popups[0].at, LngLat { lng: -80.8, lat: 34.7 });
        assert!(popups[0].html.contains("Sunny Days"));
        assert!(popups[0].html.contains("<td>Capacity</td><td>40</td>"));
        assert_eq!(
            map.last_layout("care-points", style::ICON_SIZE),
            Some(style::point_icon_size("12", None))
        );
        assert_eq!(
            map.last_paint("care-points", style::ICON_COLOR),
            Some(style::point_icon_color("12", None))
        );
        assert_eq!(bus.count(), 0, "point hovers do not publish");
    }

    #[test]
    fn test_hover_keeps_selection_emphasized_for_point_style() {
        let (map, state, _bus, _bindings) = setup(PointStyle::POINT);
        state.borrow_mut().geo.set_selection("7", Side::Left);
        map.hover(vec![provider("12")]);
        map.fire(PointerKind::MouseMove);

        let selection = GeoSelection::Tract("7".into());
        assert_eq!(
            map.last_layout("care-points", style::ICON_SIZE),
            Some(style::point_icon_size("12", Some(&selection)))
        );
        assert!(map.popups.borrow()[0].html.starts_with("<h3>"));
    }

    #[test]
    fn test_next_hover_replaces_popup() {
        let (map, _state, _bus, _bindings) = setup(PointStyle::CHILDCARE);
        map.hover(vec![provider("12")]);
        map.fire(PointerKind::MouseMove);
        map.hover(vec![provider("13")]);
        map.fire(PointerKind::MouseMove);

        let popups = map.popups.borrow();
        assert_eq!(popups.len(), 2);
        assert!(popups[0].removed.get());
        assert!(!popups[1].removed.get());
    }

    #[test]
    fn test_hover_nothing_restores_neutral_icons() {
        let (map, _state, bus, _bindings) = setup(PointStyle::CHILDCARE);
        map.hover(vec![provider("12")]);
        map.fire(PointerKind::MouseMove);
        assert_eq!(bus.count(), 0);
        map.hover(vec![]);
        map.fire(PointerKind::MouseMove);

        assert!(map.popups.borrow()[0].removed.get());
        assert_eq!(map.last_layout("care-points", style::ICON_SIZE), Some(json!(0.75)));
        assert_eq!(map.last_paint("care-points", style::ICON_COLOR), Some(json!("#888")));
        assert_eq!(bus.last(), Some(("tract-left-hovered".to_string(), None)));
    }

    #[test]
    fn test_hover_provider_without_geoid_still_opens_popup() {
        let (map, _state, bus, _bindings) = setup(PointStyle::CHILDCARE);
        let mut feature = provider("12");
        feature.properties.remove("geoid");
        map.hover(vec![feature]);
        map.fire(PointerKind::MouseMove);

        let popups = map.popups.borrow();
        assert_eq!(popups.len(), 1);
        assert!(popups[0].html.contains("Sunny Days"));
        assert_eq!(map.last_layout("care-points", style::ICON_SIZE), Some(json!(0.75)));
        assert_eq!(map.last_paint("care-points", style::ICON_COLOR), Some(json!("#888")));
        assert_eq!(bus.count(), 0);
    }

    #[test]
    fn test_mouse_leave_does_nothing() {
        let (map, _state, bus, _bindings) = setup(PointStyle::POINT);
        map.fire(PointerKind::MouseLeave);
        assert!(map.paint.borrow().is_empty());
        assert!(map.layout.borrow().is_empty());
        assert_eq!(bus.count(), 0);
    }

    #[test]
    fn test_detach_closes_open_popup() {
        let (map, _state, _bus, mut bindings) = setup(PointStyle::CHILDCARE);
        map.hover(vec![provider("12")]);
        map.fire(PointerKind::MouseMove);
        detach(&mut bindings);
        assert!(map.popups.borrow()[0].removed.get());
    }
}
