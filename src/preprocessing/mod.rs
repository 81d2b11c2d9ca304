//! Feature preprocessing
//!
//! Provides the column-group feature transformer used by the classifier:
//! - Feature schema (which columns are numeric vs categorical)
//! - Standard scaling of numeric columns with fit-time statistics
//! - One-hot encoding of categorical columns that ignores unseen values
//! - A composed pipeline producing one dense feature matrix

mod config;
mod scaler;
mod encoder;
mod pipeline;

pub use config::{FeatureSchema, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
pub use scaler::{ScalerParams, StandardScaler};
pub use encoder::OneHotEncoder;
pub use pipeline::FeaturePipeline;

use crate::error::{AirQualityError, Result};
use polars::prelude::*;

/// Read a column as nullable `f64` values, casting integer columns.
///
/// Values that cannot be represented as numbers come back as `None`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| AirQualityError::FeatureNotFound(name.to_string()))?;
    let casted = column.cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    Ok(ca.into_iter().collect())
}

/// Read a column as nullable strings, casting non-string columns
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| AirQualityError::FeatureNotFound(name.to_string()))?;
    let casted = column.cast(&DataType::String)?;
    let ca = casted.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}
