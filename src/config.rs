//! Artifact locations and runtime defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name of the fitted pipeline
pub const DEFAULT_MODEL_PATH: &str = "final_model.json";

/// Default file name of the category vocabulary
pub const DEFAULT_VOCABULARY_PATH: &str = "categories.json";

/// Default training data file
pub const DEFAULT_DATA_PATH: &str = "global_air_quality_data_10000.csv";

/// Where the two training artifacts live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model_path: PathBuf,
    pub vocabulary_path: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            vocabulary_path: PathBuf::from(DEFAULT_VOCABULARY_PATH),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model_path: impl Into<PathBuf>, vocabulary_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            vocabulary_path: vocabulary_path.into(),
        }
    }

    /// Both artifacts under one directory, with the default file names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DEFAULT_MODEL_PATH), dir.join(DEFAULT_VOCABULARY_PATH))
    }
}
