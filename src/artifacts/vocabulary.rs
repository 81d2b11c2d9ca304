//! Observed values of each categorical feature

use super::{read_json, write_json};
use crate::error::Result;
use crate::preprocessing::string_values;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Selection-list entry that switches a field to free-text input
pub const OTHER_OPTION: &str = "Other";

/// Sorted distinct values per categorical column, as seen in training data.
///
/// Serializes as a plain JSON object (`{"City": [...], ...}`) with keys and
/// values in sorted order, so identical data gives identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryVocabulary {
    fields: BTreeMap<String, Vec<String>>,
}

impl CategoryVocabulary {
    /// Collect the non-null distinct values of each column
    pub fn from_frame(df: &DataFrame, columns: &[String]) -> Result<Self> {
        let mut fields = BTreeMap::new();
        for name in columns {
            let values: BTreeSet<String> = string_values(df, name)?.into_iter().flatten().collect();
            fields.insert(name.clone(), values.into_iter().collect());
        }
        Ok(Self { fields })
    }

    /// Known values of a field, sorted
    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Known values followed by [`OTHER_OPTION`], for selection lists
    pub fn options(&self, field: &str) -> Vec<String> {
        let mut options = self.values(field).to_vec();
        options.push(OTHER_OPTION.to_string());
        options
    }

    /// Whether a value was seen in training data
    pub fn contains(&self, field: &str, value: &str) -> bool {
        self.values(field).binary_search_by(|v| v.as_str().cmp(value)).is_ok()
    }

    /// Field names
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Write to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(self, path.as_ref())
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn vocab() -> CategoryVocabulary {
        let df = df!(
            "City" => &[Some("Paris"), Some("Delhi"), None, Some("Paris")],
            "Date" => &["2023-01-02", "2023-01-01", "2023-01-01", "2023-01-03"]
        )
        .unwrap();
        CategoryVocabulary::from_frame(&df, &["City".to_string(), "Date".to_string()]).unwrap()
    }

    #[test]
    fn test_sorted_distinct_values() {
        let vocab = vocab();
        assert_eq!(vocab.values("City"), &["Delhi", "Paris"]);
        assert_eq!(vocab.values("Date").len(), 3);
        assert!(vocab.values("Country").is_empty());
        assert!(vocab.contains("City", "Delhi"));
        assert!(!vocab.contains("City", "Lagos"));
    }

    #[test]
    fn test_options_end_with_other() {
        assert_eq!(vocab().options("City"), vec!["Delhi", "Paris", "Other"]);
    }

    #[test]
    fn test_json_shape_is_plain_map() {
        let json = serde_json::to_string(&vocab()).unwrap();
        assert_eq!(
            json,
            r#"{"City":["Delhi","Paris"],"Date":["2023-01-01","2023-01-02","2023-01-03"]}"#
        );
    }
}
