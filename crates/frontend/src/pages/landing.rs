use dioxus::prelude::*;
use tract_shared::models::Category;

use crate::api;
use crate::context::AppContext;

/// Comparison page link for a category that has a query string and a map config.
fn explore_href(category: &Category) -> Option<String> {
    let query = category.query_str.as_deref().filter(|q| !q.is_empty())?;
    category.config.as_ref()?;
    Some(api::app_href(&format!("map?{query}")))
}

#[component]
pub fn LandingPage() -> Element {
    let ctx = use_context::<AppContext>();
    ctx.track();

    let _loader = use_resource({
        let ctx = ctx.clone();
        move || {
            let ctx = ctx.clone();
            async move {
                ctx.update(|s| s.catalog.begin_load());
                let result = api::fetch_category_config().await;
                let query = api::current_query_str();
                ctx.update(|s| s.catalog.finish_load(result, &query));
            }
        }
    });

    let (loading, categories) = ctx.read(|s| {
        let enabled: Vec<Category> = s.catalog.enabled_categories().into_iter().cloned().collect();
        (s.catalog.is_loading(), enabled)
    });

    rsx! {
        div { class: "landing",
            h1 { "Community Indicators" }
            p { "Pick a focus area to compare census tracts across Lancaster and Chester Counties." }
            if loading && categories.is_empty() {
                div { class: "status", "Loading categories..." }
            }
            div { class: "category-grid",
                for category in categories {
                    div { class: "category-card",
                        h3 { "{category.title}" }
                        p { "{category.description}" }
                        if let Some(href) = explore_href(&category) {
                            a { href: "{href}", "Explore the map" }
                        } else {
                            span { class: "status", "Coming soon" }
                        }
                    }
                }
            }
        }
    }
}
