//! Data loading utilities

use crate::aqi::{AqiStandard, Category};
use crate::error::{AirQualityError, Result};
use crate::training::{derive_breakdowns, label_distribution};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Loader for tabular reading files
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows inspected when inferring column types
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { infer_schema_length: 1000 }
    }

    /// Set how many rows are inspected for type inference
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows.max(1);
        self
    }

    /// Load a comma-separated file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        self.load_delimited(path.as_ref(), b',')
    }

    /// Pick the delimiter from the extension (`.tsv` is tab, anything else comma)
    pub fn load_auto(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("tsv"));
        self.load_delimited(path, if is_tsv { b'\t' } else { b',' })
    }

    fn load_delimited(&self, path: &Path, delimiter: u8) -> Result<DataFrame> {
        let start = Instant::now();
        let file = File::open(path)
            .map_err(|e| AirQualityError::DataError(format!("{}: {}", path.display(), e)))?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_parse_options(CsvParseOptions::default().with_separator(delimiter))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| AirQualityError::DataError(format!("{}: {}", path.display(), e)))?;

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Loaded data"
        );
        Ok(df)
    }
}

/// Save frames as CSV
pub struct DataSaver;

impl DataSaver {
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path.as_ref())?;
        CsvWriter::new(&mut file).finish(df)?;
        Ok(())
    }
}

/// Summary of a loaded dataset
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub n_rows: usize,
    pub n_cols: usize,
    /// `(column, dtype, null count)` in frame order
    pub columns: Vec<(String, String, usize)>,
    /// Derived category per row, where the pollutant columns allow it
    pub label_distribution: Option<BTreeMap<Category, usize>>,
    /// Rows with no defined global index
    pub undefined_rows: usize,
    /// Why categories could not be derived, when `label_distribution` is `None`
    pub label_error: Option<String>,
}

impl DatasetInfo {
    /// Describe a frame, deriving labels when the pollutant columns exist
    pub fn describe(df: &DataFrame, standard: &AqiStandard) -> Self {
        let columns = df
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), c.dtype().to_string(), c.null_count()))
            .collect();

        let (label_distribution, undefined_rows, label_error) = match derive_breakdowns(df, standard) {
            Ok(breakdowns) => {
                let labels: Vec<Category> = breakdowns.iter().filter_map(|b| b.category()).collect();
                let undefined = breakdowns.len() - labels.len();
                (Some(label_distribution(&labels)), undefined, None)
            }
            Err(e) => (None, 0, Some(e.to_string())),
        };

        Self {
            n_rows: df.height(),
            n_cols: df.width(),
            columns,
            label_distribution,
            undefined_rows,
            label_error,
        }
    }
}
