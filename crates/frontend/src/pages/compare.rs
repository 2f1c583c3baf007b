use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use tract_shared::models::{IndicatorConfig, PaneMap, Side};

use crate::api;
use crate::components::map_pane::MapPane;
use crate::context::AppContext;
use crate::maplibre::{CameraSync, MaplibreMap};

#[derive(Default)]
struct LinkedMaps {
    maps: PaneMap<Option<Rc<MaplibreMap>>>,
    sync: Option<CameraSync>,
}

fn link_map(linked: &RefCell<LinkedMaps>, side: Side, map: Rc<MaplibreMap>) {
    let mut linked = linked.borrow_mut();
    linked.maps[side] = Some(map);
    if let (Some(left), Some(right)) = (linked.maps.left.clone(), linked.maps.right.clone()) {
        linked.sync = Some(CameraSync::new(left, right));
    }
}

/// Load categories, pick the one named by the query string, then its
/// indicator config and main data. Both panes start on the first indicator.
async fn load_comparison(ctx: AppContext) -> Result<IndicatorConfig, String> {
    ctx.update(|s| s.catalog.begin_load());
    let result = api::fetch_category_config().await;
    let query = api::current_query_str();
    let found = ctx.update(|s| {
        s.catalog.finish_load(result, &query);
        s.select_category(&query)
    });
    if !found {
        return Err(format!("No category matches \"{query}\"."));
    }

    let category = ctx
        .read(|s| s.catalog.selected_category().cloned())
        .ok_or_else(|| "No category selected.".to_string())?;
    let config_path = category
        .config
        .clone()
        .ok_or_else(|| format!("{} has no map configuration yet.", category.title))?;
    let config = api::fetch_indicator_config(&config_path).await.map_err(|e| {
        tracing::error!(error = %e, "error loading indicator config");
        e.to_string()
    })?;

    if let Some(path) = category.main_data.as_deref() {
        match api::fetch_text(path).await {
            Ok(text) => ctx.update(|s| s.catalog.set_main_data(text)),
            Err(e) => tracing::error!(error = %e, "error loading main data"),
        }
    }

    ctx.update(|s| {
        s.catalog.set_available_indicators(config.indicators.clone());
        let first = config.indicators.first().cloned();
        for side in Side::BOTH {
            s.choose_indicator(side, first.clone());
        }
    });
    Ok(config)
}

#[component]
pub fn ComparePage() -> Element {
    let ctx = use_context::<AppContext>();
    ctx.track();
    let linked = use_hook(|| Rc::new(RefCell::new(LinkedMaps::default())));

    let config = use_resource({
        let ctx = ctx.clone();
        move || load_comparison(ctx.clone())
    });

    use_drop({
        let linked = linked.clone();
        move || {
            linked.borrow_mut().sync.take();
        }
    });

    let title = ctx
        .read(|s| s.catalog.selected_category().map(|c| c.title.clone()))
        .unwrap_or_default();
    let loaded = config.read().clone();
    let home = api::app_href("/");

    match loaded {
        None => rsx! {
            div { class: "status", "Loading map configuration..." }
        },
        Some(Err(message)) => rsx! {
            div { class: "status",
                p { "{message}" }
                a { href: "{home}", "Back to categories" }
            }
        },
        Some(Ok(config)) => {
            let on_left = {
                let linked = linked.clone();
                move |map: Rc<MaplibreMap>| link_map(&linked, Side::Left, map)
            };
            let on_right = {
                let linked = linked.clone();
                move |map: Rc<MaplibreMap>| link_map(&linked, Side::Right, map)
            };
            rsx! {
                div { class: "compare",
                    div { class: "compare-header",
                        a { href: "{home}", "All categories" }
                        h2 { "{title}" }
                    }
                    div { class: "panes",
                        MapPane {
                            side: Side::Left,
                            map_style: config.map_style.clone(),
                            center: config.center,
                            zoom: config.zoom,
                            on_ready: on_left,
                        }
                        MapPane {
                            side: Side::Right,
                            map_style: config.map_style.clone(),
                            center: config.center,
                            zoom: config.zoom,
                            on_ready: on_right,
                        }
                    }
                }
            }
        }
    }
}
