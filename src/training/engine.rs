//! Training orchestration: label, split, fit, evaluate, persist

use super::config::TrainingConfig;
use super::decision_tree::DecisionTreeClassifier;
use super::labels::label_frame;
use super::metrics::ClassificationReport;
use super::split::stratified_split;
use crate::aqi::{AqiStandard, Category};
use crate::artifacts::{CategoryVocabulary, FittedPipeline, TrainingSummary};
use crate::config::ArtifactPaths;
use crate::error::Result;
use crate::preprocessing::{FeaturePipeline, FeatureSchema};
use chrono::Utc;
use polars::prelude::*;
use std::time::Instant;
use tracing::info;

/// The two artifacts produced by one training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub pipeline: FittedPipeline,
    pub vocabulary: CategoryVocabulary,
}

impl TrainingOutcome {
    /// Persist both artifacts
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        self.pipeline.save(&paths.model_path)?;
        self.vocabulary.save(&paths.vocabulary_path)?;
        info!(path = %paths.vocabulary_path.display(), "Saved category vocabulary");
        Ok(())
    }
}

/// Builds a [`FittedPipeline`] from raw readings.
///
/// Labels come from the AQI standard, features from the schema; the two
/// never mix. Fitting sees the training split only.
#[derive(Debug, Clone, Default)]
pub struct TrainingOrchestrator {
    config: TrainingConfig,
    standard: AqiStandard,
    schema: FeatureSchema,
}

impl TrainingOrchestrator {
    /// Create an orchestrator with the standard tables and schema
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            standard: AqiStandard::default(),
            schema: FeatureSchema::standard(),
        }
    }

    /// Use different breakpoint tables for labeling
    pub fn with_standard(mut self, standard: AqiStandard) -> Self {
        self.standard = standard;
        self
    }

    /// Use a different feature schema
    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run the full training procedure on an in-memory frame
    pub fn train(&self, df: &DataFrame) -> Result<TrainingOutcome> {
        let start = Instant::now();
        self.config.validate()?;
        info!(rows = df.height(), columns = df.width(), "Starting training");

        let labeled = label_frame(
            df,
            &self.standard,
            &self.schema,
            self.config.missing_index_policy,
        )?;

        let split = stratified_split(
            &labeled.labels,
            self.config.test_size,
            self.config.random_state,
        )?;
        let train_df = take_rows(&labeled.features, &split.train_indices)?;
        let test_df = take_rows(&labeled.features, &split.test_indices)?;
        let y_train = select_labels(&labeled.labels, &split.train_indices);
        let y_test = select_labels(&labeled.labels, &split.test_indices);
        info!(train = y_train.len(), test = y_test.len(), "Split rows");

        let mut features = FeaturePipeline::new(self.schema.clone());
        let x_train = features.fit_transform(&train_df)?;
        info!(width = x_train.ncols(), "Fitted feature pipeline");

        let mut classifier = DecisionTreeClassifier::new()
            .with_max_depth(self.config.max_depth)
            .with_min_samples_split(self.config.min_samples_split)
            .with_min_samples_leaf(self.config.min_samples_leaf)
            .with_criterion(self.config.criterion);
        classifier.fit(&x_train, &y_train)?;

        let y_pred = classifier.predict(&features.transform(&test_df)?)?;
        let report = ClassificationReport::compute(&y_test, &y_pred)?;
        info!(
            accuracy = report.accuracy,
            macro_f1 = report.macro_f1,
            depth = classifier.get_depth(),
            leaves = classifier.get_n_leaves(),
            "Evaluated on held-out rows"
        );

        let vocabulary = CategoryVocabulary::from_frame(df, &self.schema.categorical)?;

        let summary = TrainingSummary {
            trained_at: Utc::now(),
            config: self.config.clone(),
            n_train: y_train.len(),
            n_test: y_test.len(),
            dropped_undefined: labeled.dropped_undefined,
            dropped_incomplete: labeled.dropped_incomplete,
            report,
            tree_depth: classifier.get_depth(),
            tree_leaves: classifier.get_n_leaves(),
        };
        let pipeline = FittedPipeline::new(features, classifier, summary)?;

        info!(elapsed_secs = start.elapsed().as_secs_f64(), "Training finished");
        Ok(TrainingOutcome { pipeline, vocabulary })
    }

    /// Train and write both artifacts
    pub fn train_and_save(&self, df: &DataFrame, paths: &ArtifactPaths) -> Result<TrainingOutcome> {
        let outcome = self.train(df)?;
        outcome.save(paths)?;
        Ok(outcome)
    }
}

fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        indices.iter().map(|&i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}

fn select_labels(labels: &[Category], indices: &[usize]) -> Vec<Category> {
    indices.iter().map(|&i| labels[i]).collect()
}
