use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use tract_shared::bus::hovered_event;
use tract_shared::layers::{attach_for_kind, set_indicator_visibility, LayerBindings};
use tract_shared::models::{Indicator, Side};

use crate::components::indicator_selector::IndicatorSelector;
use crate::components::year_selector::YearSelector;
use crate::context::AppContext;
use crate::maplibre::{MapListener, MaplibreMap};

fn container_id(side: Side) -> String {
    format!("map-{side}")
}

/// The map, its layer bindings and raw listeners owned by one pane.
#[derive(Default)]
struct PaneMapHandles {
    map: RefCell<Option<Rc<MaplibreMap>>>,
    bindings: RefCell<Option<LayerBindings<MaplibreMap>>>,
    listeners: RefCell<Vec<(&'static str, MapListener)>>,
}

impl PaneMapHandles {
    fn map(&self) -> Option<Rc<MaplibreMap>> {
        self.map.borrow().clone()
    }

    /// Show the pane's indicator, hide the rest and attach the matching layer module.
    fn show_selected(&self, ctx: &AppContext, side: Side) {
        let Some(map) = self.map() else {
            return;
        };
        let (selected, available) = ctx.read(|s| {
            (
                s.catalog.selected_indicator(side).cloned(),
                s.catalog.available_indicators().to_vec(),
            )
        });
        let selected_id = selected.as_ref().map(|i| i.id.clone());
        for other in available.iter().filter(|i| Some(&i.id) != selected_id.as_ref()) {
            set_indicator_visibility(&*map, other, false);
        }

        let mut bindings = self.bindings.borrow_mut();
        let Some(bindings) = bindings.as_mut() else {
            return;
        };
        match selected {
            Some(indicator) => {
                set_indicator_visibility(&*map, &indicator, true);
                attach_for_kind(bindings, indicator.kind, ctx.state.clone(), ctx.event_bus());
            }
            None => bindings.detach(),
        }
    }

    fn teardown(&self) {
        if let Some(mut bindings) = self.bindings.borrow_mut().take() {
            bindings.detach();
        }
        let listeners: Vec<_> = self.listeners.borrow_mut().drain(..).collect();
        if let Some(map) = self.map.borrow_mut().take() {
            for (event, listener) in listeners {
                map.off_event(event, listener);
            }
            map.remove();
        }
    }
}

#[component]
pub fn MapPane(
    side: Side,
    map_style: String,
    center: Option<[f64; 2]>,
    zoom: Option<f64>,
    on_ready: EventHandler<Rc<MaplibreMap>>,
) -> Element {
    let ctx = use_context::<AppContext>();
    ctx.track();
    let mut hovered = use_signal(|| None::<String>);
    let handles = use_hook(|| Rc::new(PaneMapHandles::default()));

    use_hook({
        let ctx = ctx.clone();
        move || {
            ctx.bus.on(&hovered_event(side), move |geoid| {
                let mut hovered = hovered;
                let _ = hovered.try_write().map(|mut h| *h = geoid.map(str::to_string));
            });
        }
    });

    use_effect({
        let ctx = ctx.clone();
        let handles = handles.clone();
        move || {
            if handles.map().is_some() {
                return;
            }
            let map = match MaplibreMap::new(&container_id(side), &map_style, center, zoom) {
                Ok(map) => Rc::new(map),
                Err(e) => {
                    tracing::error!(%side, error = %e, "failed to create map");
                    return;
                }
            };
            *handles.bindings.borrow_mut() = Some(LayerBindings::new(&map, side));
            *handles.map.borrow_mut() = Some(map.clone());

            let on_load = {
                let ctx = ctx.clone();
                let handles = Rc::downgrade(&handles);
                map.on_event("load", move || {
                    if let Some(handles) = handles.upgrade() {
                        handles.show_selected(&ctx, side);
                    }
                })
            };
            // Clicks change the pane selection without publishing anything.
            let on_click = {
                let ctx = ctx.clone();
                map.on_event("click", move || ctx.bump())
            };
            handles.listeners.borrow_mut().extend([("load", on_load), ("click", on_click)]);
            on_ready.call(map);
        }
    });

    use_drop({
        let ctx = ctx.clone();
        let handles = handles.clone();
        move || {
            ctx.bus.clear(&hovered_event(side));
            handles.teardown();
        }
    });

    let on_indicator = {
        let ctx = ctx.clone();
        let handles = handles.clone();
        move |indicator: Option<Indicator>| {
            tracing::debug!(%side, indicator = ?indicator.as_ref().map(|i| &i.id), "indicator changed");
            ctx.update(|s| s.choose_indicator(side, indicator));
            hovered.set(None);
            handles.show_selected(&ctx, side);
        }
    };

    let on_year = {
        let ctx = ctx.clone();
        move |year: i32| ctx.update(|s| s.catalog.set_selected_year(year, side))
    };

    let (indicators, selected, year, label, value) = ctx.read(|s| {
        let year = s.catalog.selected_year(side);
        let value = s
            .catalog
            .parse_csv()
            .lookup(s.geo.selection(side).as_str(), &year.to_string())
            .map(|cell| cell.to_string());
        (
            s.catalog.available_indicators().to_vec(),
            s.catalog.selected_indicator(side).cloned(),
            year,
            s.geo.label(side),
            value,
        )
    });
    let years = selected.as_ref().map(|i| i.years.clone()).unwrap_or_default();
    let selected_id = selected.map(|i| i.id);
    let container = container_id(side);

    rsx! {
        div { class: "pane",
            div { class: "pane-controls",
                IndicatorSelector {
                    indicators: indicators,
                    selected: selected_id,
                    on_change: on_indicator,
                }
                YearSelector {
                    years: years,
                    selected: year,
                    on_change: on_year,
                }
            }
            div { class: "pane-readout",
                span { "{label}" }
                if let Some(value) = value {
                    span { " | {year}: {value}" }
                }
                if let Some(geoid) = hovered() {
                    span { class: "hovered", " | Hovering tract {geoid}" }
                }
            }
            div { id: "{container}", class: "map-container" }
        }
    }
}
