//! Training of the air-quality classifier
//!
//! - [`labels`] derives category targets from pollutant concentrations
//! - [`split`] performs the seeded stratified train/test split
//! - [`decision_tree`] is the classifier
//! - [`metrics`] evaluates predictions on held-out rows
//! - [`engine`] runs all of the above and produces the persisted artifacts

mod config;
mod engine;
pub mod decision_tree;
pub mod labels;
pub mod metrics;
pub mod split;

pub use config::{MissingIndexPolicy, TrainingConfig};
pub use decision_tree::{ClassCounts, Criterion, DecisionTreeClassifier, TreeNode};
pub use engine::{TrainingOrchestrator, TrainingOutcome};
pub use labels::{derive_breakdowns, label_distribution, label_frame, LabeledData};
pub use metrics::{ClassMetrics, ClassificationReport};
pub use split::{stratified_split, TrainTestSplit};
