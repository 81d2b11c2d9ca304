//! Error types for the airq crate

use thiserror::Error;

/// Result type alias for airq operations
pub type Result<T> = std::result::Result<T, AirQualityError>;

/// Main error type for AQI derivation, training and inference
#[derive(Error, Debug)]
pub enum AirQualityError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    /// A row set contained readings whose global index could not be derived
    #[error("Data quality error: {rows} row(s) have no defined AQI ({detail})")]
    DataQuality { rows: usize, detail: String },

    /// An inference input did not match the training-time column schema
    #[error("Schema mismatch on column '{column}': {reason}")]
    SchemaMismatch { column: String, reason: String },

    /// A persisted artifact could not be read or decoded
    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl AirQualityError {
    pub(crate) fn schema(column: impl Into<String>, reason: impl Into<String>) -> Self {
        AirQualityError::SchemaMismatch {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn artifact(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        AirQualityError::ArtifactLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<polars::error::PolarsError> for AirQualityError {
    fn from(err: polars::error::PolarsError) -> Self {
        AirQualityError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for AirQualityError {
    fn from(err: serde_json::Error) -> Self {
        AirQualityError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for AirQualityError {
    fn from(err: ndarray::ShapeError) -> Self {
        AirQualityError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
