use std::fs;
use std::path::Path;

use rand::Rng;
use serde_json::{Map, Value};

use crate::error::RandomizeError;
use crate::numeric::{clamp_percent, format_like, median, parse_number};

pub const DEFAULT_TARGET_FILES: [&str; 2] = [
    "public/ChestLanTracts2000.geojson",
    "public/ChestLanTracts2010.geojson",
];

/// Property keys that get randomized. Everything else is left untouched.
pub const DEFAULT_FIELDS: [&str; 16] = [
    "Population 25 Years and Over whose Highest Education Completed is Less Than High School",
    "Percent of Population 25 Years and Over whose Highest Education Completed is Less Than High School",
    "Population 25 Years and Over whose Highest Education Completed is High School (includes equivalency)",
    "Percent of Population 25 Years and Over whose Highest Education Completed is High School (includes equivalency)",
    "Percent of Population 25 Years and Over whose Highest Education Completed is Associate's Degree",
    "Population 25 Years and Over whose Highest Education Completed is Bachelor's Degree or Higher",
    "Percent of Population 25 Years and Over whose Highest Education Completed is Bachelor's Degree or Higher",
    "age 3 to 4 years",
    "age 3 to 4 years_MoE",
    "age 3 to 4 years_enrolled in school",
    "MoE_age 3 to 4 years_enrolled in school",
    "Child Population (under 18 years) whose income in the past 12 months is below poverty level",
    "Percent of Children (under 18 years) whose income in the past 12 months is below poverty level",
    "Total Disconnected Youth (not in school & not in labor force)",
    "Percent of Total Youth who are Disconnected (not in school & not in labor force)",
    "Total Population 25 Years and Over",
];

pub const DEFAULT_MAX_PCT: f64 = 0.15;

fn properties_mut(feature: &mut Value) -> Option<&mut Map<String, Value>> {
    feature.get_mut("properties")?.as_object_mut()
}

fn properties(feature: &Value) -> Option<&Map<String, Value>> {
    feature.get("properties")?.as_object()
}

/// Fill null, missing and non-numeric values with the field's median.
///
/// The imputed value is formatted like the first parseable value of the
/// same field so string columns stay strings.
pub fn impute_nulls(features: &mut [Value], fields: &[String]) -> usize {
    let mut imputed = 0;
    for field in fields {
        let present: Vec<&Value> = features
            .iter()
            .filter_map(|f| properties(f)?.get(field))
            .filter(|v| parse_number(v).is_some())
            .collect();
        let values: Vec<f64> = present.iter().filter_map(|v| parse_number(v)).collect();
        let Some(fill) = median(&values) else {
            continue;
        };
        let template = present.first().map(|v| (*v).clone()).unwrap_or(Value::Null);

        for feature in features.iter_mut() {
            let Some(props) = properties_mut(feature) else {
                continue;
            };
            if props.get(field).and_then(parse_number).is_none() {
                props.insert(field.clone(), format_like(&template, fill));
                imputed += 1;
            }
        }
    }
    imputed
}

/// Multiplier drawn uniformly from `[1 - max_pct, 1 + max_pct)`.
pub fn random_factor<R: Rng + ?Sized>(rng: &mut R, max_pct: f64) -> f64 {
    1.0 + (rng.gen::<f64>() * 2.0 * max_pct - max_pct)
}

/// Scale one field of one feature by `factor`. Returns false when the field
/// is absent or not numeric.
pub fn perturb_field(props: &mut Map<String, Value>, field: &str, factor: f64) -> bool {
    let Some(original) = props.get(field) else {
        return false;
    };
    let Some(num) = parse_number(original) else {
        return false;
    };
    let scaled = clamp_percent(field, num * factor);
    let formatted = format_like(original, scaled);
    props.insert(field.to_string(), formatted);
    true
}

/// Impute then randomize every target field of a FeatureCollection in place.
pub fn randomize_document<R: Rng + ?Sized>(
    doc: &mut Value,
    fields: &[String],
    max_pct: f64,
    rng: &mut R,
) -> Result<(), RandomizeError> {
    if doc.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(RandomizeError::UnsupportedGeoJson);
    }
    let features = doc
        .get_mut("features")
        .and_then(Value::as_array_mut)
        .ok_or(RandomizeError::UnsupportedGeoJson)?;

    let imputed = impute_nulls(features, fields);
    tracing::debug!(imputed, "imputed missing values");

    for feature in features.iter_mut() {
        let Some(props) = properties_mut(feature) else {
            continue;
        };
        for field in fields {
            perturb_field(props, field, random_factor(rng, max_pct));
        }
    }
    Ok(())
}

pub fn process_file<R: Rng + ?Sized>(
    path: &Path,
    fields: &[String],
    max_pct: f64,
    rng: &mut R,
) -> Result<(), RandomizeError> {
    let raw = fs::read_to_string(path).map_err(|e| RandomizeError::io(path, e))?;
    let mut doc: Value = serde_json::from_str(&raw).map_err(|source| RandomizeError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    randomize_document(&mut doc, fields, max_pct, rng)?;

    let mut out = serde_json::to_string(&doc).map_err(|source| RandomizeError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    out.push('\n');
    fs::write(path, out).map_err(|e| RandomizeError::io(path, e))?;
    tracing::info!(path = %path.display(), "updated");
    Ok(())
}
