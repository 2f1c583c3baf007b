use dioxus::prelude::*;
use tract_shared::models::Indicator;

#[component]
pub fn IndicatorSelector(
    indicators: Vec<Indicator>,
    selected: Option<String>,
    on_change: EventHandler<Option<Indicator>>,
) -> Element {
    let current = selected.unwrap_or_default();
    let options = indicators.clone();

    rsx! {
        select {
            "aria-label": "Select indicator",
            value: "{current}",
            onchange: move |evt: Event<FormData>| {
                let id = evt.value();
                on_change.call(options.iter().find(|i| i.id == id).cloned());
            },
            option { value: "", "-- Select Indicator --" }
            for indicator in indicators {
                option {
                    value: "{indicator.id}",
                    selected: current == indicator.id,
                    "{indicator.title}"
                }
            }
        }
    }
}
