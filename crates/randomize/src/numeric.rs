//! Number parsing and formatting that keeps a value's textual shape.

use serde_json::{Number, Value};

/// Read a property as a number. Strings may carry thousands separators.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.replace(',', "").parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Round half up, matching how the data files were originally rounded.
fn round_half_up(num: f64) -> f64 {
    (num + 0.5).floor()
}

fn round_to(num: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (num * scale).round() / scale
}

fn is_integer_text(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Number of digits after the point for `ddd.ddd` text.
fn decimal_places(s: &str) -> Option<usize> {
    let (whole, frac) = s.split_once('.')?;
    (is_integer_text(whole) && is_integer_text(frac)).then_some(frac.len())
}

fn json_number(num: f64) -> Value {
    Number::from_f64(num).map_or(Value::Null, Value::Number)
}

fn json_integer(num: f64) -> Value {
    Value::Number(Number::from(round_half_up(num) as i64))
}

/// Render `num` in the same form as `original`.
///
/// Integer strings stay integer strings, `d.dd` strings keep their decimal
/// count, integer JSON numbers stay integers and other numbers round to two
/// places.
pub fn format_like(original: &Value, num: f64) -> Value {
    match original {
        Value::String(s) => {
            let trimmed = s.trim();
            if is_integer_text(trimmed) {
                Value::String(format!("{}", round_half_up(num)))
            } else if let Some(places) = decimal_places(trimmed) {
                Value::String(format!("{num:.places$}"))
            } else {
                Value::String(num.to_string())
            }
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => json_integer(num),
        Value::Number(n) if n.as_f64().is_some_and(|f| f.fract() == 0.0) => json_integer(num),
        Value::Number(_) => json_number(round_to(num, 2)),
        _ if num.fract() == 0.0 => json_integer(num),
        _ => json_number(round_to(num, 2)),
    }
}

/// Percent fields are bounded to `[0, 100]`.
pub fn clamp_percent(field: &str, value: f64) -> f64 {
    if field.to_ascii_lowercase().contains("percent") && value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        value
    }
}
