//! Standard scaling of numeric columns

use crate::error::{AirQualityError, Result};
use super::numeric_values;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fit-time statistics for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub column: String,
    pub mean: f64,
    /// Standard deviation, 1.0 for constant columns
    pub scale: f64,
}

impl ScalerParams {
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}

/// z-score scaler: `(x - mean) / std` with statistics captured at fit time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    /// Create an unfitted scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture mean and standard deviation for each column.
    ///
    /// Null cells are ignored when computing statistics.
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let mut params = Vec::with_capacity(columns.len());

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| AirQualityError::FeatureNotFound(col_name.clone()))?;
            let casted = column.cast(&DataType::Float64)?;
            let ca = casted.f64()?;

            let mean = ca.mean().ok_or_else(|| {
                AirQualityError::PreprocessingError(format!(
                    "column '{}' has no numeric values to fit",
                    col_name
                ))
            })?;
            // ddof 0: population standard deviation
            let std = ca.std(0).unwrap_or(0.0);
            params.push(ScalerParams {
                column: col_name.clone(),
                mean,
                scale: if std == 0.0 { 1.0 } else { std },
            });
        }

        self.params = params;
        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the fitted columns into a dense matrix, one column per fitted
    /// column in fit order. A null cell is a schema mismatch.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(AirQualityError::ModelNotFitted);
        }

        let n_rows = df.height();
        let mut out = Array2::<f64>::zeros((n_rows, self.params.len()));

        for (j, params) in self.params.iter().enumerate() {
            let values = numeric_values(df, &params.column).map_err(|e| match e {
                AirQualityError::FeatureNotFound(c) => {
                    AirQualityError::schema(c, "required numeric column is missing")
                }
                other => other,
            })?;
            for (i, v) in values.into_iter().enumerate() {
                let v = v.filter(|v| v.is_finite()).ok_or_else(|| {
                    AirQualityError::schema(
                        &params.column,
                        format!("row {} has no numeric value", i),
                    )
                })?;
                out[[i, j]] = params.apply(v);
            }
        }

        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Fitted statistics in column order
    pub fn params(&self) -> &[ScalerParams] {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
