//! Classification metrics for held-out evaluation

use crate::aqi::Category;
use crate::error::{AirQualityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision/recall/F1 for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub category: Category,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of true rows of this category
    pub support: usize,
}

/// Metrics for evaluating a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Fraction of rows predicted correctly
    pub accuracy: f64,
    /// Unweighted mean precision over categories present in truth or prediction
    pub macro_precision: f64,
    /// Unweighted mean recall
    pub macro_recall: f64,
    /// Unweighted mean F1
    pub macro_f1: f64,
    /// `confusion[true][predicted]`, indexed by category ordinal
    pub confusion: [[usize; Category::COUNT]; Category::COUNT],
    pub per_class: Vec<ClassMetrics>,
    pub n_samples: usize,
}

impl ClassificationReport {
    /// Compare true and predicted categories
    pub fn compute(y_true: &[Category], y_pred: &[Category]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(AirQualityError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(AirQualityError::DataError("cannot evaluate zero rows".to_string()));
        }

        let mut confusion = [[0usize; Category::COUNT]; Category::COUNT];
        for (t, p) in y_true.iter().zip(y_pred) {
            confusion[t.ordinal()][p.ordinal()] += 1;
        }

        let correct: usize = (0..Category::COUNT).map(|i| confusion[i][i]).sum();
        let accuracy = correct as f64 / y_true.len() as f64;

        let mut per_class = Vec::new();
        for category in Category::ALL {
            let k = category.ordinal();
            let tp = confusion[k][k];
            let support: usize = confusion[k].iter().sum();
            let predicted: usize = (0..Category::COUNT).map(|i| confusion[i][k]).sum();
            if support == 0 && predicted == 0 {
                continue;
            }

            let precision = if predicted > 0 { tp as f64 / predicted as f64 } else { 0.0 };
            let recall = if support > 0 { tp as f64 / support as f64 } else { 0.0 };
            let f1_score = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            per_class.push(ClassMetrics { category, precision, recall, f1_score, support });
        }

        let n = per_class.len().max(1) as f64;
        Ok(Self {
            accuracy,
            macro_precision: per_class.iter().map(|m| m.precision).sum::<f64>() / n,
            macro_recall: per_class.iter().map(|m| m.recall).sum::<f64>() / n,
            macro_f1: per_class.iter().map(|m| m.f1_score).sum::<f64>() / n,
            confusion,
            per_class,
            n_samples: y_true.len(),
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<16} {:>9} {:>9} {:>9} {:>8}", "", "precision", "recall", "f1", "support")?;
        for m in &self.per_class {
            writeln!(
                f,
                "{:<16} {:>9.3} {:>9.3} {:>9.3} {:>8}",
                m.category.as_str(),
                m.precision,
                m.recall,
                m.f1_score,
                m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:<16} {:>9.3} {:>9.3} {:>9.3} {:>8}", "macro avg", self.macro_precision, self.macro_recall, self.macro_f1, self.n_samples)?;
        write!(f, "{:<16} {:>29.3} {:>8}", "accuracy", self.accuracy, self.n_samples)
    }
}
