//! Serving-side prediction over loaded artifacts

use super::observation::Observation;
use crate::aqi::Category;
use crate::artifacts::{CategoryVocabulary, FittedPipeline};
use crate::config::ArtifactPaths;
use crate::error::{AirQualityError, Result};
use crate::preprocessing::numeric_values;
use polars::prelude::*;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Read-only prediction service over a fitted pipeline and its vocabulary.
///
/// Loaded once at startup and never mutated afterwards; clones share the
/// same artifacts, and every method takes `&self`, so one instance can
/// serve concurrent callers without locking.
#[derive(Debug, Clone)]
pub struct Predictor {
    pipeline: Arc<FittedPipeline>,
    vocabulary: Arc<CategoryVocabulary>,
}

impl Predictor {
    pub fn new(pipeline: FittedPipeline, vocabulary: CategoryVocabulary) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            vocabulary: Arc::new(vocabulary),
        }
    }

    /// Load both artifacts; any failure is fatal for the caller
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let pipeline = FittedPipeline::load(&paths.model_path)?;
        let vocabulary = CategoryVocabulary::load(&paths.vocabulary_path)?;
        info!(
            model = %paths.model_path.display(),
            vocabulary = %paths.vocabulary_path.display(),
            "Loaded artifacts"
        );
        Ok(Self::new(pipeline, vocabulary))
    }

    /// Category of a single observation
    pub fn predict_category(&self, observation: &Observation) -> Result<Category> {
        let df = observation.to_frame()?;
        let predictions = self.predict_frame(&df)?;
        debug!(city = %observation.city, "Predicted single observation");
        predictions
            .into_iter()
            .next()
            .ok_or_else(|| AirQualityError::InferenceError("no prediction produced".to_string()))
    }

    /// Category of every row in a frame.
    ///
    /// All schema columns must be present (by name; order and extra columns
    /// do not matter) and numeric columns must be non-null and finite.
    /// Unseen categorical values are accepted.
    pub fn predict_frame(&self, df: &DataFrame) -> Result<Vec<Category>> {
        let schema = self.pipeline.features().schema();
        schema.validate(df)?;
        for column in &schema.numeric {
            let values = numeric_values(df, column)?;
            if let Some(row) = values.iter().position(|v| !v.map_or(false, f64::is_finite)) {
                return Err(AirQualityError::schema(
                    column.as_str(),
                    format!("row {} has no numeric value", row),
                ));
            }
        }
        self.pipeline.predict(df)
    }

    /// Predict many observations in parallel, preserving order
    pub fn predict_batch(&self, observations: &[Observation]) -> Vec<Result<Category>> {
        observations
            .par_iter()
            .map(|obs| self.predict_category(obs))
            .collect()
    }

    pub fn pipeline(&self) -> &FittedPipeline {
        &self.pipeline
    }

    pub fn vocabulary(&self) -> &CategoryVocabulary {
        &self.vocabulary
    }
}
