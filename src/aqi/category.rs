//! Global index aggregation and category thresholds

use crate::error::{AirQualityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete air quality level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Good,
    Moderate,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
}

/// Inclusive upper bounds of Good, Moderate and Unhealthy
const GOOD_MAX: f64 = 50.0;
const MODERATE_MAX: f64 = 100.0;
const UNHEALTHY_MAX: f64 = 150.0;

impl Category {
    /// Number of categories
    pub const COUNT: usize = 4;

    /// All categories in ascending severity
    pub const ALL: [Category; Category::COUNT] = [
        Category::Good,
        Category::Moderate,
        Category::Unhealthy,
        Category::VeryUnhealthy,
    ];

    /// Map a defined global index to its category
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= GOOD_MAX {
            Category::Good
        } else if aqi <= MODERATE_MAX {
            Category::Moderate
        } else if aqi <= UNHEALTHY_MAX {
            Category::Unhealthy
        } else {
            Category::VeryUnhealthy
        }
    }

    /// Ordinal position, 0 for Good
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Inverse of [`Category::ordinal`]
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
        }
    }

    /// One-line status message shown with a prediction
    pub fn headline(&self) -> &'static str {
        match self {
            Category::Good => "Air quality is good.",
            Category::Moderate => "Sensitive people should be cautious.",
            Category::Unhealthy => "Limit outdoor activity.",
            Category::VeryUnhealthy => "Avoid outdoor exposure.",
        }
    }

    /// Whether outdoor activity should be reduced
    pub fn is_harmful(&self) -> bool {
        matches!(self, Category::Unhealthy | Category::VeryUnhealthy)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AirQualityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AirQualityError::InvalidParameter {
                name: "category".to_string(),
                value: s.to_string(),
                reason: "expected Good, Moderate, Unhealthy or Very Unhealthy".to_string(),
            })
    }
}

/// Maximum of the defined sub-indices; `None` when every sub-index is missing.
///
/// Missing values are skipped, never treated as zero.
pub fn global_index<I>(subindices: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    subindices
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
}

/// Category of a global index; a missing index has no category
pub fn category(global_index: Option<f64>) -> Option<Category> {
    global_index.map(Category::from_aqi)
}
