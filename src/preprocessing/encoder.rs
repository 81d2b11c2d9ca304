//! One-hot encoding of categorical columns

use crate::error::{AirQualityError, Result};
use super::string_values;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fit-time vocabulary of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ColumnVocabulary {
    column: String,
    /// Sorted, deduplicated
    categories: Vec<String>,
}

impl ColumnVocabulary {
    #[inline]
    fn position(&self, value: &str) -> Option<usize> {
        self.categories.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }
}

/// One-hot encoder that maps values unseen at fit time to an all-zero block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    vocabularies: Vec<ColumnVocabulary>,
    is_fitted: bool,
}

impl OneHotEncoder {
    /// Create an unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sorted set of non-null values of each column
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let mut vocabularies = Vec::with_capacity(columns.len());

        for col_name in columns {
            let categories: BTreeSet<String> =
                string_values(df, col_name)?.into_iter().flatten().collect();
            vocabularies.push(ColumnVocabulary {
                column: col_name.clone(),
                categories: categories.into_iter().collect(),
            });
        }

        self.vocabularies = vocabularies;
        self.is_fitted = true;
        Ok(self)
    }

    /// Encode the fitted columns into a dense 0/1 matrix.
    ///
    /// Unknown and null values produce zeros across that column's block.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(AirQualityError::ModelNotFitted);
        }

        let mut out = Array2::<f64>::zeros((df.height(), self.n_output_features()));
        let mut offset = 0usize;

        for vocab in &self.vocabularies {
            let values = string_values(df, &vocab.column).map_err(|e| match e {
                AirQualityError::FeatureNotFound(c) => {
                    AirQualityError::schema(c, "required categorical column is missing")
                }
                other => other,
            })?;
            for (i, value) in values.iter().enumerate() {
                if let Some(pos) = value.as_deref().and_then(|v| vocab.position(v)) {
                    out[[i, offset + pos]] = 1.0;
                }
            }
            offset += vocab.categories.len();
        }

        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Total width of the encoded block
    pub fn n_output_features(&self) -> usize {
        self.vocabularies.iter().map(|v| v.categories.len()).sum()
    }

    /// Output column names as `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.vocabularies
            .iter()
            .flat_map(|v| v.categories.iter().map(move |c| format!("{}_{}", v.column, c)))
            .collect()
    }

    /// Fit-time categories of a column
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.vocabularies
            .iter()
            .find(|v| v.column == column)
            .map(|v| v.categories.as_slice())
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_onehot_encoding_sorted_vocabulary() {
        let df = df!("city" => &["b", "a", "c", "a", "b"]).unwrap();

        let mut encoder = OneHotEncoder::new();
        let out = encoder.fit_transform(&df, &cols(&["city"])).unwrap();

        assert_eq!(encoder.categories("city").unwrap(), &["a", "b", "c"]);
        assert_eq!(out.dim(), (5, 3));
        assert_eq!(out.row(0).to_vec(), vec![0.0, 1.0, 0.0]);
        assert_eq!(out.row(1).to_vec(), vec![1.0, 0.0, 0.0]);
        assert!(out.rows().into_iter().all(|r| r.sum() == 1.0));
    }

    #[test]
    fn test_unknown_category_encodes_as_zeros() {
        let train = df!("city" => &["Delhi", "Paris"], "country" => &["India", "France"]).unwrap();
        let test = df!("city" => &["Atlantis"], "country" => &["France"]).unwrap();

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&train, &cols(&["city", "country"])).unwrap();
        let out = encoder.transform(&test).unwrap();

        assert_eq!(out.row(0).to_vec(), vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(
            encoder.feature_names(),
            vec!["city_Delhi", "city_Paris", "country_France", "country_India"]
        );
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let train = df!("city" => &["a"]).unwrap();
        let test = df!("town" => &["a"]).unwrap();
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&train, &cols(&["city"])).unwrap();
        assert!(matches!(
            encoder.transform(&test),
            Err(AirQualityError::SchemaMismatch { .. })
        ));
    }
}
