use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RandomizeError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported GeoJSON format, expected a FeatureCollection")]
    UnsupportedGeoJson,
    #[error("column '{0}' not found in CSV header")]
    MissingColumn(String),
    #[error("CSV input has no header row")]
    EmptyCsv,
}

impl RandomizeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RandomizeError::Io { path: path.into(), source }
    }
}
