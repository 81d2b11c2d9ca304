//! Persisted training artifacts
//!
//! Training produces two durable files: the fitted pipeline (feature
//! transformer plus classifier) and the category vocabulary used to build
//! selection lists. Both are JSON documents.

mod fitted;
mod vocabulary;

pub use fitted::{FittedPipeline, TrainingSummary, FORMAT_VERSION};
pub use vocabulary::{CategoryVocabulary, OTHER_OPTION};

use crate::error::{AirQualityError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Serialize `value` as pretty JSON, creating parent directories
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

/// Read and decode a JSON artifact; every failure is an artifact load error
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path).map_err(|e| AirQualityError::artifact(path, e))?;
    serde_json::from_str(&json).map_err(|e| AirQualityError::artifact(path, e))
}
