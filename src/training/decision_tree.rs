//! Decision tree classifier over air quality categories

use crate::aqi::Category;
use crate::error::{AirQualityError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-category sample counts, indexed by [`Category::ordinal`]
pub type ClassCounts = [usize; Category::COUNT];

/// Minimum impurity decrease for a split to be kept
const MIN_GAIN: f64 = 1e-12;

/// Decision tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with the majority category
    Leaf {
        class: Category,
        counts: ClassCounts,
        n_samples: usize,
    },
    /// Internal node; samples with `x[feature_idx] <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Impurity criterion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Criterion {
    /// Gini impurity
    Gini,
    /// Shannon entropy
    Entropy,
}

impl Criterion {
    fn impurity(&self, counts: &ClassCounts, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        match self {
            Criterion::Gini => {
                1.0 - counts
                    .iter()
                    .map(|&c| (c as f64 / n).powi(2))
                    .sum::<f64>()
            }
            Criterion::Entropy => -counts
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / n;
                    p * p.log2()
                })
                .sum::<f64>(),
        }
    }
}

/// Best split candidate for one node
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Decision tree classifier bounded by depth and minimum split size.
///
/// Growth is deterministic: equal-gain splits resolve to the lowest feature
/// index then the lowest threshold, and leaf ties resolve to the least
/// severe category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth (root is depth 0)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split an internal node
    pub min_samples_split: usize,
    /// Minimum samples in each child of a split
    pub min_samples_leaf: usize,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Number of features seen at fit time
    n_features: usize,
    /// Normalized impurity-decrease importances
    feature_importances: Option<Array1<f64>>,
    /// Categories present in the training labels
    classes: Vec<Category>,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeClassifier {
    /// Create an unbounded Gini tree
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
            n_features: 0,
            feature_importances: None,
            classes: Vec::new(),
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set criterion
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Fit the tree to a feature matrix and one label per row
    pub fn fit(&mut self, x: &Array2<f64>, y: &[Category]) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(AirQualityError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(AirQualityError::TrainingError(
                "cannot fit a tree on zero samples".to_string(),
            ));
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
        if x.iter().any(|v| !v.is_finite()) {
            return Err(AirQualityError::TrainingError(
                "feature matrix contains non-finite values".to_string(),
            ));
        }

        self.n_features = n_features;

        let labels: Vec<usize> = y.iter().map(|c| c.ordinal()).collect();
        let mut present = [false; Category::COUNT];
        for &l in &labels {
            present[l] = true;
        }
        self.classes = Category::ALL
            .iter()
            .copied()
            .filter(|c| present[c.ordinal()])
            .collect();

        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        let root = self.build_tree(x, &labels, &indices, 0, &mut importances);

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));
        self.root = Some(root);

        debug!(
            samples = n_samples,
            features = n_features,
            depth = self.get_depth(),
            leaves = self.get_n_leaves(),
            "Decision tree fitted"
        );
        Ok(self)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        labels: &[usize],
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let counts = class_counts(labels, indices);
        let impurity = self.criterion.impurity(&counts, n_samples);

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || impurity <= MIN_GAIN;

        if should_stop {
            return leaf(counts, n_samples);
        }

        let Some(best) = self.find_best_split(x, labels, indices, &counts, impurity) else {
            return leaf(counts, n_samples);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, best.feature_idx]] <= best.threshold);

        importances[best.feature_idx] += n_samples as f64 * best.gain;

        let left = Box::new(self.build_tree(x, labels, &left_indices, depth + 1, importances));
        let right = Box::new(self.build_tree(x, labels, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
            impurity,
        }
    }

    fn find_best_split(
        &self,
        x: &Array2<f64>,
        labels: &[usize],
        indices: &[usize],
        parent_counts: &ClassCounts,
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let n = indices.len();

        // Each feature independently finds its best threshold; results keep
        // feature order so the reduction below is deterministic.
        let feature_results: Vec<Option<SplitCandidate>> = (0..x.ncols())
            .into_par_iter()
            .map(|feature_idx| {
                let mut sorted: Vec<(f64, usize)> = indices
                    .iter()
                    .map(|&i| (x[[i, feature_idx]], labels[i]))
                    .collect();
                if sorted.iter().all(|(v, _)| *v == sorted[0].0) {
                    return None;
                }
                sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

                let mut left_counts: ClassCounts = [0; Category::COUNT];
                let mut best: Option<SplitCandidate> = None;

                for k in 0..n - 1 {
                    left_counts[sorted[k].1] += 1;
                    let (value, next) = (sorted[k].0, sorted[k + 1].0);
                    if value == next {
                        continue;
                    }

                    let left_n = k + 1;
                    let right_n = n - left_n;
                    if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                        continue;
                    }

                    let mut right_counts = *parent_counts;
                    for (r, l) in right_counts.iter_mut().zip(left_counts.iter()) {
                        *r -= l;
                    }

                    let weighted = (left_n as f64 * self.criterion.impurity(&left_counts, left_n)
                        + right_n as f64 * self.criterion.impurity(&right_counts, right_n))
                        / n as f64;
                    let gain = parent_impurity - weighted;

                    if gain > MIN_GAIN && best.map_or(true, |b| gain > b.gain) {
                        let mut threshold = value + (next - value) / 2.0;
                        if threshold >= next {
                            threshold = value;
                        }
                        best = Some(SplitCandidate { feature_idx, threshold, gain });
                    }
                }

                best
            })
            .collect();

        feature_results
            .into_iter()
            .flatten()
            .fold(None, |acc: Option<SplitCandidate>, cand| match acc {
                Some(b) if b.gain >= cand.gain => Some(b),
                _ => Some(cand),
            })
    }

    /// Predict one category per row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<Category>> {
        let root = self.root.as_ref().ok_or(AirQualityError::ModelNotFitted)?;

        if x.ncols() != self.n_features {
            return Err(AirQualityError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.rows().into_iter().map(|row| predict_sample(root, row)).collect())
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Categories seen during fit
    pub fn classes(&self) -> &[Category] {
        &self.classes
    }

    /// Number of features seen during fit
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Number of split levels below the root
    pub fn get_depth(&self) -> usize {
        self.root.as_ref().map_or(0, node_depth)
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, count_leaves)
    }
}

fn class_counts(labels: &[usize], indices: &[usize]) -> ClassCounts {
    let mut counts = [0; Category::COUNT];
    for &i in indices {
        counts[labels[i]] += 1;
    }
    counts
}

/// Majority category; ties go to the lower ordinal
fn leaf(counts: ClassCounts, n_samples: usize) -> TreeNode {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    TreeNode::Leaf {
        class: Category::ALL[best],
        counts,
        n_samples,
    }
}

fn predict_sample(node: &TreeNode, sample: ArrayView1<f64>) -> Category {
    match node {
        TreeNode::Leaf { class, .. } => *class,
        TreeNode::Split { feature_idx, threshold, left, right, .. } => {
            if sample[*feature_idx] <= *threshold {
                predict_sample(left, sample)
            } else {
                predict_sample(right, sample)
            }
        }
    }
}

fn node_depth(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 0,
        TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
    }
}

fn count_leaves(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => count_leaves(left) + count_leaves(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use Category::*;

    #[test]
    fn test_classifier_separable() {
        let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let y = vec![Good, Good, Unhealthy, Unhealthy];

        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_eq!(tree.classes(), &[Good, Unhealthy]);
        assert_eq!(tree.get_depth(), 1);
    }

    #[test]
    fn test_multiclass_thresholds() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = vec![Good, Good, Moderate, Moderate, Unhealthy, Unhealthy, VeryUnhealthy, VeryUnhealthy];

        let mut tree = DecisionTreeClassifier::new().with_criterion(Criterion::Entropy);
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_eq!(tree.predict(&array![[2.4], [7.9]]).unwrap(), vec![Good, VeryUnhealthy]);
        assert_eq!(tree.get_n_leaves(), 4);
    }

    #[test]
    fn test_max_depth() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = vec![Good, Moderate, Unhealthy, VeryUnhealthy];

        let mut tree = DecisionTreeClassifier::new().with_max_depth(1);
        tree.fit(&x, &y).unwrap();

        assert!(tree.get_depth() <= 1);
    }

    #[test]
    fn test_min_samples_split_stops_growth() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = vec![Good, Moderate, Good, Moderate];

        let mut tree = DecisionTreeClassifier::new().with_min_samples_split(5);
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.get_n_leaves(), 1);
        // tie between Good and Moderate resolves to Good
        assert_eq!(tree.predict(&x).unwrap(), vec![Good; 4]);
    }

    #[test]
    fn test_feature_importances() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
        let y = vec![Good, Good, Moderate, Moderate];

        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&x, &y).unwrap();

        let importances = tree.feature_importances().unwrap();
        assert_eq!(importances[0], 1.0);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_predict_errors() {
        let tree = DecisionTreeClassifier::new();
        assert!(matches!(tree.predict(&array![[1.0]]), Err(AirQualityError::ModelNotFitted)));

        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&array![[1.0], [2.0]], &[Good, Moderate]).unwrap();
        assert!(matches!(
            tree.predict(&array![[1.0, 2.0]]),
            Err(AirQualityError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_fit_rejects_length_mismatch() {
        let mut tree = DecisionTreeClassifier::new();
        assert!(tree.fit(&array![[1.0], [2.0]], &[Good]).is_err());
    }
}
