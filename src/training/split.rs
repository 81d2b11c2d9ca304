//! Seeded stratified train/test split

use crate::aqi::Category;
use crate::error::{AirQualityError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Row indices of each side of a split, ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Split rows so each category keeps its proportion on both sides.
///
/// Each category contributes `round(n * test_size)` rows to the test side,
/// kept between 1 and `n - 1`. A category with a single row stays in
/// training. The same labels and seed always give the same split.
pub fn stratified_split(labels: &[Category], test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(AirQualityError::InvalidParameter {
            name: "test_size".to_string(),
            value: test_size.to_string(),
            reason: "must lie strictly between 0 and 1".to_string(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train_indices = Vec::with_capacity(labels.len());
    let mut test_indices = Vec::new();

    for category in Category::ALL {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == category)
            .map(|(i, _)| i)
            .collect();

        match indices.len() {
            0 => continue,
            1 => {
                warn!(category = %category, "Only one row for category, keeping it in training");
                train_indices.extend(indices);
                continue;
            }
            n => {
                indices.shuffle(&mut rng);
                let n_test = ((n as f64) * test_size).round() as usize;
                let n_test = n_test.clamp(1, n - 1);
                test_indices.extend_from_slice(&indices[..n_test]);
                train_indices.extend_from_slice(&indices[n_test..]);
            }
        }
    }

    if train_indices.is_empty() || test_indices.is_empty() {
        return Err(AirQualityError::DataError(
            "Stratified split resulted in empty train or test set".to_string(),
        ));
    }

    train_indices.sort_unstable();
    test_indices.sort_unstable();
    Ok(TrainTestSplit { train_indices, test_indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use Category::*;

    fn labels() -> Vec<Category> {
        let mut y = vec![Good; 50];
        y.extend(vec![Moderate; 30]);
        y.extend(vec![Unhealthy; 20]);
        y
    }

    #[test]
    fn test_preserves_proportions() {
        let y = labels();
        let split = stratified_split(&y, 0.2, 42).unwrap();

        assert_eq!(split.test_indices.len(), 20);
        assert_eq!(split.train_indices.len(), 80);
        let count = |idx: &[usize], c: Category| idx.iter().filter(|&&i| y[i] == c).count();
        assert_eq!(count(&split.test_indices, Good), 10);
        assert_eq!(count(&split.test_indices, Moderate), 6);
        assert_eq!(count(&split.test_indices, Unhealthy), 4);
    }

    #[test]
    fn test_disjoint_and_complete() {
        let y = labels();
        let split = stratified_split(&y, 0.2, 1).unwrap();
        let mut all: Vec<usize> = split.train_indices.iter().chain(&split.test_indices).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..y.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let y = labels();
        assert_eq!(stratified_split(&y, 0.2, 42).unwrap(), stratified_split(&y, 0.2, 42).unwrap());
        assert_ne!(stratified_split(&y, 0.2, 42).unwrap(), stratified_split(&y, 0.2, 43).unwrap());
    }

    #[test]
    fn test_singleton_category_stays_in_training() {
        let y = vec![Good, Good, Good, Good, VeryUnhealthy];
        let split = stratified_split(&y, 0.2, 42).unwrap();
        assert!(split.train_indices.contains(&4));
        assert_eq!(split.test_indices.len(), 1);
    }

    #[test]
    fn test_rejects_bad_test_size() {
        assert!(stratified_split(&labels(), 0.0, 42).is_err());
        assert!(stratified_split(&[Good], 0.2, 42).is_err());
    }
}
