use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Which attribute set a point layer's popup shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    Basic,
    Childcare,
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Property rendered as display text; missing and null render empty.
fn text(props: &Map<String, Value>, key: &str) -> String {
    let raw = match props.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    escape_html(&raw)
}

fn truthy(props: &Map<String, Value>, key: &str) -> bool {
    match props.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

fn yes_no(props: &Map<String, Value>, key: &str) -> &'static str {
    match props.get(key) {
        Some(Value::String(s)) if s == "FALSE" => "No",
        _ => "Yes",
    }
}

/// Format an inspection date as e.g. `Mar 5, 2024`; unparseable input is returned as given.
pub fn format_inspection_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()).ok())
        .or_else(|| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()).ok())
        .or_else(|| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok());
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn basic_popup_html(props: &Map<String, Value>) -> String {
    format!(
        "<h3>{name}</h3>\
         <p>Operator: {operator}<br/>\
         {street}<br/>\
         {city}, {state} {zip}\
         </p>",
        name = text(props, "Provider_Name"),
        operator = text(props, "Operator"),
        street = text(props, "Street_Address"),
        city = text(props, "City"),
        state = text(props, "State"),
        zip = text(props, "Zip_Code"),
    )
}

const AMENITY_ROWS: [(&str, &str); 4] = [
    ("Breastfeeding_Friendly", "Breastfeeding Friendly"),
    ("Early_Head_Start", "Early Head Start"),
    ("Head_Start", "Head Start"),
    ("First_Steps", "First Steps"),
];

pub fn childcare_popup_html(props: &Map<String, Value>) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div class="popup-content"><div class="blur-background"></div>"#);
    html.push_str(&format!(
        "<h3>{name}</h3>\
         <p>Operator: {operator}<br/>\
         Provider: {name}<br/>\
         {street}<br/>\
         {city}, {state} {zip}<br/>\
         {phone}\
         </p>",
        name = text(props, "Provider_Name"),
        operator = text(props, "Operator"),
        street = text(props, "Street_Address"),
        city = text(props, "City"),
        state = text(props, "State"),
        zip = text(props, "Zip_Code"),
        phone = text(props, "Phone_Number"),
    ));

    html.push_str("<table>");
    html.push_str(&format!("<tr><td>Capacity</td><td>{}</td></tr>", text(props, "Capacity")));
    if truthy(props, "ABC_Level") {
        let inspected = match props.get("Last_ABC_Inspection_Date") {
            Some(Value::String(s)) if !s.is_empty() => escape_html(&format_inspection_date(s)),
            _ => String::new(),
        };
        html.push_str(&format!(
            "<tr><td>ABC Level</td><td>{}<br/>(Last Inspection:<br/>{})</td></tr>",
            text(props, "ABC_Level"),
            inspected
        ));
    }
    for (key, label) in AMENITY_ROWS {
        if truthy(props, key) {
            html.push_str(&format!("<tr><td>{label}</td><td>{}</td></tr>", yes_no(props, key)));
        }
    }
    html.push_str("</table></div>");
    html
}

pub fn popup_html(kind: PopupKind, props: &Map<String, Value>) -> String {
    match kind {
        PopupKind::Basic => basic_popup_html(props),
        PopupKind::Childcare => childcare_popup_html(props),
    }
}
