//! The composed, frozen feature pipeline and classifier

use super::{read_json, write_json};
use crate::aqi::Category;
use crate::error::{AirQualityError, Result};
use crate::preprocessing::FeaturePipeline;
use crate::training::{ClassificationReport, DecisionTreeClassifier, TrainingConfig};
use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Artifact layout version written into every saved pipeline
pub const FORMAT_VERSION: u32 = 1;

/// Facts recorded about the training run that produced a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub trained_at: DateTime<Utc>,
    pub config: TrainingConfig,
    pub n_train: usize,
    pub n_test: usize,
    /// Rows dropped because no global index could be derived
    pub dropped_undefined: usize,
    /// Rows dropped because a feature value was missing
    pub dropped_incomplete: usize,
    /// Evaluation on the held-out split
    pub report: ClassificationReport,
    pub tree_depth: usize,
    pub tree_leaves: usize,
}

/// Fitted feature pipeline plus fitted classifier, applied as one unit.
///
/// Read-only after training: predicting takes `&self`, so one loaded
/// instance can be shared across threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPipeline {
    format_version: u32,
    features: FeaturePipeline,
    classifier: DecisionTreeClassifier,
    summary: TrainingSummary,
}

impl FittedPipeline {
    /// Compose a fitted feature pipeline and classifier
    pub fn new(
        features: FeaturePipeline,
        classifier: DecisionTreeClassifier,
        summary: TrainingSummary,
    ) -> Result<Self> {
        let pipeline = Self {
            format_version: FORMAT_VERSION,
            features,
            classifier,
            summary,
        };
        pipeline
            .check_consistency()
            .map_err(AirQualityError::TrainingError)?;
        Ok(pipeline)
    }

    fn check_consistency(&self) -> std::result::Result<(), String> {
        if !self.features.is_fitted() || !self.classifier.is_fitted() {
            return Err("pipeline components are not fitted".to_string());
        }
        let width = self.features.n_output_features();
        if self.classifier.n_features() != width {
            return Err(format!(
                "classifier expects {} features but the feature pipeline produces {}",
                self.classifier.n_features(),
                width
            ));
        }
        Ok(())
    }

    /// Transform rows and classify them
    pub fn predict(&self, df: &DataFrame) -> Result<Vec<Category>> {
        let x = self.features.transform(df)?;
        debug!(rows = x.nrows(), "Classifying rows");
        self.classifier.predict(&x)
    }

    pub fn features(&self) -> &FeaturePipeline {
        &self.features
    }

    pub fn classifier(&self) -> &DecisionTreeClassifier {
        &self.classifier
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    /// Write the pipeline as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_json(self, path)?;
        info!(path = %path.display(), "Saved fitted pipeline");
        Ok(())
    }

    /// Load a pipeline, rejecting unknown versions and inconsistent parts
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pipeline: Self = read_json(path)?;
        if pipeline.format_version != FORMAT_VERSION {
            return Err(AirQualityError::artifact(
                path,
                format!("unsupported format version {}", pipeline.format_version),
            ));
        }
        pipeline
            .check_consistency()
            .map_err(|reason| AirQualityError::artifact(path, reason))?;
        Ok(pipeline)
    }
}
