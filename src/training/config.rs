//! Training configuration

use super::decision_tree::Criterion;
use crate::error::{AirQualityError, Result};
use serde::{Deserialize, Serialize};

/// What to do with rows whose global index cannot be derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingIndexPolicy {
    /// Drop the offending rows and continue
    DropRow,
    /// Abort training with a data quality error
    FailBatch,
}

/// Configuration for building the fitted pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation
    pub test_size: f64,

    /// Seed for the stratified split
    pub random_state: u64,

    /// Maximum depth of the tree
    pub max_depth: usize,

    /// Minimum samples required to split an internal node
    pub min_samples_split: usize,

    /// Minimum samples per leaf
    pub min_samples_leaf: usize,

    /// Impurity criterion
    pub criterion: Criterion,

    /// Handling of rows with no defined global index
    pub missing_index_policy: MissingIndexPolicy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
            missing_index_policy: MissingIndexPolicy::DropRow,
        }
    }
}

impl TrainingConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set the split seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Builder method to set maximum tree depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder method to set minimum samples per split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Builder method to set minimum samples per leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Builder method to set the impurity criterion
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Builder method to set the missing-index policy
    pub fn with_missing_index_policy(mut self, policy: MissingIndexPolicy) -> Self {
        self.missing_index_policy = policy;
        self
    }

    /// Reject values the orchestrator cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(AirQualityError::InvalidParameter {
                name: "test_size".to_string(),
                value: self.test_size.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }
        if self.max_depth == 0 {
            return Err(AirQualityError::InvalidParameter {
                name: "max_depth".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_samples_split < 2 {
            return Err(AirQualityError::InvalidParameter {
                name: "min_samples_split".to_string(),
                value: self.min_samples_split.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        if self.min_samples_leaf == 0 {
            return Err(AirQualityError::InvalidParameter {
                name: "min_samples_leaf".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrainingConfig::default();
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_state, 42);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.min_samples_split, 5);
        assert_eq!(config.missing_index_policy, MissingIndexPolicy::DropRow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainingConfig::new()
            .with_test_size(0.25)
            .with_random_state(7)
            .with_max_depth(4)
            .with_min_samples_leaf(3)
            .with_criterion(Criterion::Entropy)
            .with_missing_index_policy(MissingIndexPolicy::FailBatch);

        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.random_state, 7);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.min_samples_leaf, 3);
        assert_eq!(config.criterion, Criterion::Entropy);
        assert_eq!(config.missing_index_policy, MissingIndexPolicy::FailBatch);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(TrainingConfig::new().with_test_size(1.0).validate().is_err());
        assert!(TrainingConfig::new().with_test_size(0.0).validate().is_err());
        assert!(TrainingConfig::new().with_min_samples_split(1).validate().is_err());
        assert!(TrainingConfig::new().with_max_depth(0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_leaves() {
        match TrainingConfig::new().with_min_samples_leaf(0).validate() {
            Err(AirQualityError::InvalidParameter { name, .. }) => assert_eq!(name, "min_samples_leaf"),
            other => panic!("expected invalid parameter, got {:?}", other),
        }
        assert!(TrainingConfig::new().with_min_samples_leaf(1).validate().is_ok());
    }
}
