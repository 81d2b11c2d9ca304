//! airq - Air quality category derivation and classification
//!
//! This crate converts raw pollutant concentrations into an Air Quality
//! Index, labels each reading with a category, and trains a decision tree
//! that predicts the category from readings, weather and location.
//!
//! # Modules
//!
//! ## Labeling
//! - [`aqi`] - Breakpoint interpolation, global index and categories
//!
//! ## Core ML Modules
//! - [`preprocessing`] - Feature schema, scaling, one-hot encoding
//! - [`training`] - Label derivation, stratified split, decision tree, metrics
//! - [`artifacts`] - Fitted pipeline and category vocabulary persistence
//! - [`inference`] - Observations and the prediction service
//!
//! ## Presentation support
//! - [`insights`] - Dominant pollutant, advice text, reports
//! - [`cli`] - Command-line interface
//!
//! ## Utilities
//! - [`config`] - Artifact locations
//! - [`utils`] - Data loading
//!
//! # Example
//!
//! ```no_run
//! use airq::prelude::*;
//!
//! # fn main() -> airq::Result<()> {
//! let df = DataLoader::new().load_csv("global_air_quality_data_10000.csv")?;
//! let outcome = TrainingOrchestrator::new(TrainingConfig::default()).train(&df)?;
//! outcome.save(&ArtifactPaths::default())?;
//!
//! let predictor = Predictor::load(&ArtifactPaths::default())?;
//! let observation = Observation::from_json(r#"{
//!     "PM2.5": 35, "PM10": 30, "NO2": 40, "SO2": 20, "CO": 2, "O3": 60,
//!     "Temperature": 25, "Humidity": 45, "Wind Speed": 15,
//!     "City": "Delhi", "Country": "India", "Date": "2023-01-01"
//! }"#)?;
//! let category = predictor.predict_category(&observation)?;
//! println!("{}: {}", category, category.headline());
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Labeling
pub mod aqi;

// Core ML modules
pub mod preprocessing;
pub mod training;
pub mod artifacts;
pub mod inference;

// Presentation support
pub mod insights;
pub mod cli;

// Utilities
pub mod config;
pub mod utils;

pub use error::{AirQualityError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{AirQualityError, Result};

    // Labeling
    pub use crate::aqi::{
        category, global_index, subindex, AqiBreakdown, AqiStandard, Breakpoint, BreakpointTable,
        Category, Pollutant,
    };

    // Preprocessing
    pub use crate::preprocessing::{FeaturePipeline, FeatureSchema, OneHotEncoder, StandardScaler};

    // Training
    pub use crate::training::{
        ClassificationReport, Criterion, DecisionTreeClassifier, MissingIndexPolicy, TrainingConfig,
        TrainingOrchestrator, TrainingOutcome,
    };

    // Artifacts
    pub use crate::artifacts::{CategoryVocabulary, FittedPipeline};

    // Inference
    pub use crate::inference::{LocationInput, Observation, Predictor};

    // Insights
    pub use crate::insights::{dominant_pollutant, Insight, PredictionReport};

    // Config and data loading
    pub use crate::config::ArtifactPaths;
    pub use crate::utils::DataLoader;
}
