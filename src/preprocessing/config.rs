//! Feature schema configuration

use crate::error::{AirQualityError, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Numeric feature columns, standardized
pub const NUMERIC_COLUMNS: [&str; 9] = [
    "PM2.5",
    "PM10",
    "NO2",
    "SO2",
    "CO",
    "O3",
    "Temperature",
    "Humidity",
    "Wind Speed",
];

/// Categorical feature columns, one-hot encoded
pub const CATEGORICAL_COLUMNS: [&str; 3] = ["City", "Country", "Date"];

/// Which columns feed the model and how each group is transformed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Columns scaled to zero mean and unit variance
    pub numeric: Vec<String>,

    /// Columns one-hot encoded over the fit-time vocabulary
    pub categorical: Vec<String>,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::standard()
    }
}

impl FeatureSchema {
    /// The air quality schema: nine readings plus City, Country and Date
    pub fn standard() -> Self {
        Self::new(&NUMERIC_COLUMNS, &CATEGORICAL_COLUMNS)
    }

    /// Create a schema from explicit column groups
    pub fn new(numeric: &[&str], categorical: &[&str]) -> Self {
        Self {
            numeric: numeric.iter().map(|s| s.to_string()).collect(),
            categorical: categorical.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// All feature columns, numeric first
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.numeric.iter().chain(self.categorical.iter()).map(|s| s.as_str())
    }

    /// Whether a column is a feature
    pub fn contains(&self, name: &str) -> bool {
        self.columns().any(|c| c == name)
    }

    /// Check that every feature column exists in the frame.
    ///
    /// Columns are looked up by name, so order does not matter and extra
    /// columns are ignored.
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        for name in self.columns() {
            if df.column(name).is_err() {
                return Err(AirQualityError::schema(name, "required column is missing"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_standard_schema() {
        let schema = FeatureSchema::standard();
        assert_eq!(schema.numeric.len(), 9);
        assert_eq!(schema.categorical, vec!["City", "Country", "Date"]);
        assert!(schema.contains("Wind Speed"));
        assert!(!schema.contains("AQI"));
    }

    #[test]
    fn test_validate_reports_missing_column() {
        let schema = FeatureSchema::new(&["a", "b"], &["c"]);
        let df = df!("c" => &["x"], "a" => &[1.0]).unwrap();
        match schema.validate(&df) {
            Err(AirQualityError::SchemaMismatch { column, .. }) => assert_eq!(column, "b"),
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }
}
