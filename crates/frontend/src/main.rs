mod api;
mod components;
mod context;
mod maplibre;
mod pages;

use dioxus::prelude::*;

use context::AppContext;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Landing {},
    #[route("/map")]
    Compare {},
}

#[component]
fn Landing() -> Element {
    rsx! {
        pages::landing::LandingPage {}
    }
}

#[component]
fn Compare() -> Element {
    rsx! {
        pages::compare::ComparePage {}
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    use_context_provider(AppContext::new);
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
