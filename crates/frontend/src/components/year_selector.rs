use dioxus::prelude::*;

#[component]
pub fn YearSelector(years: Vec<i32>, selected: i32, on_change: EventHandler<i32>) -> Element {
    // Keep the current year selectable even when the indicator does not list it.
    let mut choices = years;
    if !choices.contains(&selected) {
        choices.push(selected);
        choices.sort_unstable();
    }

    rsx! {
        select {
            "aria-label": "Select year",
            value: "{selected}",
            onchange: move |evt: Event<FormData>| {
                match evt.value().parse::<i32>() {
                    Ok(year) => on_change.call(year),
                    Err(e) => tracing::warn!(error = %e, "ignoring unparseable year"),
                }
            },
            for year in choices {
                option {
                    value: "{year}",
                    selected: year == selected,
                    "{year}"
                }
            }
        }
    }
}
