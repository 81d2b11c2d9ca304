//! Target derivation: concentrations -> global index -> category label

use super::config::MissingIndexPolicy;
use crate::aqi::{AqiBreakdown, AqiStandard, Category, Pollutant};
use crate::error::{AirQualityError, Result};
use crate::preprocessing::{numeric_values, string_values, FeatureSchema};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Feature rows paired with their derived labels
#[derive(Debug, Clone)]
pub struct LabeledData {
    /// Only the schema's feature columns; no index or label columns
    pub features: DataFrame,
    /// One category per feature row
    pub labels: Vec<Category>,
    /// Rows with no defined global index
    pub dropped_undefined: usize,
    /// Rows with a null feature value
    pub dropped_incomplete: usize,
}

impl LabeledData {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of rows per category
    pub fn distribution(&self) -> BTreeMap<Category, usize> {
        label_distribution(&self.labels)
    }
}

/// Count labels per category
pub fn label_distribution(labels: &[Category]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// Sub-indices and global index for every row.
///
/// The contributing pollutant columns must exist; null or out-of-table
/// concentrations give a missing sub-index.
pub fn derive_breakdowns(df: &DataFrame, standard: &AqiStandard) -> Result<Vec<AqiBreakdown>> {
    let mut columns: Vec<(Pollutant, Vec<Option<f64>>)> = Vec::new();
    for pollutant in standard.pollutants() {
        let values = numeric_values(df, pollutant.column()).map_err(|e| match e {
            AirQualityError::FeatureNotFound(c) => AirQualityError::DataError(format!(
                "column '{}' is required to derive the air quality label",
                c
            )),
            other => other,
        })?;
        columns.push((pollutant, values));
    }

    Ok((0..df.height())
        .map(|row| {
            standard.evaluate(|p| {
                columns
                    .iter()
                    .find(|(q, _)| *q == p)
                    .and_then(|(_, values)| values[row])
            })
        })
        .collect())
}

/// Derive labels and project the frame onto the feature schema.
///
/// Rows whose global index is missing, and rows with a null feature, are a
/// data-quality defect: dropped under [`MissingIndexPolicy::DropRow`],
/// fatal under [`MissingIndexPolicy::FailBatch`]. They never receive a
/// default category.
pub fn label_frame(
    df: &DataFrame,
    standard: &AqiStandard,
    schema: &FeatureSchema,
    policy: MissingIndexPolicy,
) -> Result<LabeledData> {
    schema.validate(df)?;

    let breakdowns = derive_breakdowns(df, standard)?;
    let mut complete = vec![true; df.height()];
    for name in &schema.numeric {
        for (row, v) in numeric_values(df, name)?.iter().enumerate() {
            if !v.map_or(false, f64::is_finite) {
                complete[row] = false;
            }
        }
    }
    for name in &schema.categorical {
        for (row, v) in string_values(df, name)?.iter().enumerate() {
            if v.is_none() {
                complete[row] = false;
            }
        }
    }

    let mut kept: Vec<IdxSize> = Vec::with_capacity(df.height());
    let mut labels = Vec::with_capacity(df.height());
    let mut dropped_undefined = 0usize;
    let mut dropped_incomplete = 0usize;

    for (row, breakdown) in breakdowns.iter().enumerate() {
        match (breakdown.category(), complete[row]) {
            (None, _) => dropped_undefined += 1,
            (Some(_), false) => dropped_incomplete += 1,
            (Some(label), true) => {
                kept.push(row as IdxSize);
                labels.push(label);
            }
        }
    }

    let defective = dropped_undefined + dropped_incomplete;
    if defective > 0 {
        let detail = format!(
            "{} without a defined global index, {} with missing feature values",
            dropped_undefined, dropped_incomplete
        );
        match policy {
            MissingIndexPolicy::FailBatch => {
                return Err(AirQualityError::DataQuality { rows: defective, detail });
            }
            MissingIndexPolicy::DropRow => {
                warn!(
                    undefined = dropped_undefined,
                    incomplete = dropped_incomplete,
                    "Dropping rows that cannot be labeled"
                );
            }
        }
    }

    if labels.is_empty() {
        return Err(AirQualityError::DataQuality {
            rows: df.height(),
            detail: "no row has a defined global index".to_string(),
        });
    }

    let columns: Vec<&str> = schema.columns().collect();
    let features = df
        .select(columns)?
        .take(&IdxCa::from_vec("idx".into(), kept))?;

    info!(rows = labels.len(), dropped = defective, "Derived air quality labels");

    Ok(LabeledData {
        features,
        labels,
        dropped_undefined,
        dropped_incomplete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_schema() -> FeatureSchema {
        FeatureSchema::new(&["PM2.5", "PM10", "NO2"], &["City"])
    }

    fn frame() -> DataFrame {
        df!(
            "PM2.5" => &[10.0, 40.0, -1.0, 60.0],
            "PM10" => &[40.0, 20.0, -1.0, 10.0],
            "NO2" => &[30.0, 10.0, -1.0, 10.0],
            "City" => &["A", "B", "C", "D"],
            "AQI_Global" => &[1.0, 2.0, 3.0, 4.0]
        )
        .unwrap()
    }

    #[test]
    fn test_labels_and_no_leakage() {
        let labeled =
            label_frame(&frame(), &AqiStandard::default(), &small_schema(), MissingIndexPolicy::DropRow)
                .unwrap();

        assert_eq!(labeled.labels, vec![Category::Good, Category::Unhealthy, Category::VeryUnhealthy]);
        assert_eq!(labeled.dropped_undefined, 1);
        assert_eq!(labeled.features.height(), 3);
        assert!(labeled.features.column("AQI_Global").is_err());
        assert_eq!(labeled.features.width(), 4);
    }

    #[test]
    fn test_fail_batch_policy() {
        let err =
            label_frame(&frame(), &AqiStandard::default(), &small_schema(), MissingIndexPolicy::FailBatch)
                .unwrap_err();
        assert!(matches!(err, AirQualityError::DataQuality { rows: 1, .. }));
    }

    #[test]
    fn test_null_feature_row_is_dropped() {
        let df = df!(
            "PM2.5" => &[Some(10.0), Some(20.0)],
            "PM10" => &[Some(10.0), None],
            "NO2" => &[Some(10.0), Some(10.0)],
            "City" => &["A", "B"]
        )
        .unwrap();
        let labeled =
            label_frame(&df, &AqiStandard::default(), &small_schema(), MissingIndexPolicy::DropRow)
                .unwrap();
        assert_eq!(labeled.len(), 1);
        assert_eq!(labeled.dropped_incomplete, 1);
    }

    #[test]
    fn test_missing_pollutant_column() {
        let df = df!("PM2.5" => &[10.0], "City" => &["A"]).unwrap();
        let schema = FeatureSchema::new(&["PM2.5"], &["City"]);
        assert!(matches!(
            derive_breakdowns(&df, &AqiStandard::default()),
            Err(AirQualityError::DataError(_))
        ));
        assert!(label_frame(&df, &AqiStandard::default(), &schema, MissingIndexPolicy::DropRow).is_err());
    }
}
