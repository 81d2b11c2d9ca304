//! Column-group feature pipeline

use crate::error::{AirQualityError, Result};
use super::{config::FeatureSchema, encoder::OneHotEncoder, scaler::StandardScaler};
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Scales numeric columns and one-hot encodes categorical columns, then
/// concatenates both blocks (numeric first) into one feature matrix.
///
/// Fit once on training rows; transform reuses the fitted statistics and
/// vocabulary for every later input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePipeline {
    schema: FeatureSchema,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    is_fitted: bool,
    /// Seconds spent in the last fit call
    fit_time: Option<f64>,
}

impl FeaturePipeline {
    /// Create an unfitted pipeline for a schema
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(),
            is_fitted: false,
            fit_time: None,
        }
    }

    /// Fit the scaler and encoder on training rows
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        if df.height() == 0 {
            return Err(AirQualityError::PreprocessingError(
                "cannot fit feature pipeline on an empty frame".to_string(),
            ));
        }
        self.schema.validate(df)?;

        self.scaler.fit(df, &self.schema.numeric)?;
        self.encoder.fit(df, &self.schema.categorical)?;

        self.is_fitted = true;
        self.fit_time = Some(start.elapsed().as_secs_f64());
        debug!(
            rows = df.height(),
            numeric = self.schema.numeric.len(),
            encoded = self.encoder.n_output_features(),
            "Feature pipeline fitted"
        );
        Ok(self)
    }

    /// Transform rows into the fitted feature space
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(AirQualityError::ModelNotFitted);
        }
        self.schema.validate(df)?;

        let numeric = self.scaler.transform(df)?;
        let encoded = self.encoder.transform(df)?;
        Ok(concatenate(Axis(1), &[numeric.view(), encoded.view()])?)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Width of the transformed matrix
    pub fn n_output_features(&self) -> usize {
        self.schema.numeric.len() + self.encoder.n_output_features()
    }

    /// Names of the transformed columns in matrix order
    pub fn feature_names(&self) -> Vec<String> {
        self.schema
            .numeric
            .iter()
            .cloned()
            .chain(self.encoder.feature_names())
            .collect()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn fit_time(&self) -> Option<f64> {
        self.fit_time
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new(FeatureSchema::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_dataframe() -> DataFrame {
        df!(
            "age" => &[25.0, 30.0, 35.0, 40.0, 45.0],
            "income" => &[50000.0, 60000.0, 70000.0, 80000.0, 90000.0],
            "city" => &["NYC", "LA", "NYC", "SF", "LA"]
        )
        .unwrap()
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::new(&["age", "income"], &["city"])
    }

    #[test]
    fn test_pipeline_creation() {
        let pipeline = FeaturePipeline::new(schema());
        assert!(!pipeline.is_fitted());
        assert!(matches!(
            pipeline.transform(&create_test_dataframe()),
            Err(AirQualityError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_fit_transform_layout() {
        let df = create_test_dataframe();
        let mut pipeline = FeaturePipeline::new(schema());
        let x = pipeline.fit_transform(&df).unwrap();

        assert_eq!(x.dim(), (5, 5));
        assert_eq!(
            pipeline.feature_names(),
            vec!["age", "income", "city_LA", "city_NYC", "city_SF"]
        );
        // first row: NYC
        assert_eq!(x.row(0).slice(ndarray::s![2..]).to_vec(), vec![0.0, 1.0, 0.0]);
        assert!(pipeline.fit_time().is_some());
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let df = create_test_dataframe();
        let mut pipeline = FeaturePipeline::new(schema());
        let expected = pipeline.fit_transform(&df).unwrap();

        let reordered = df.select(["city", "income", "age"]).unwrap();
        let actual = pipeline.transform(&reordered).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_missing_feature_column() {
        let df = create_test_dataframe();
        let mut pipeline = FeaturePipeline::new(schema());
        pipeline.fit(&df).unwrap();

        let partial = df.drop("income").unwrap();
        assert!(matches!(
            pipeline.transform(&partial),
            Err(AirQualityError::SchemaMismatch { .. })
        ));
    }
}
