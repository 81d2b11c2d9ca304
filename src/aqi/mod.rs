//! Air Quality Index derivation
//!
//! Converts raw pollutant concentrations into sub-indices through
//! piecewise-linear breakpoint tables, takes the worst sub-index as the
//! global index and thresholds it into a [`Category`].

mod breakpoints;
mod category;

pub use breakpoints::{subindex, AqiStandard, Breakpoint, BreakpointTable, Pollutant};
pub use category::{category, global_index, Category};

use serde::{Deserialize, Serialize};

/// Per-pollutant sub-indices and the resulting global index for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiBreakdown {
    pub subindices: Vec<(Pollutant, Option<f64>)>,
    pub global: Option<f64>,
}

impl AqiBreakdown {
    /// Category of the global index, if defined
    pub fn category(&self) -> Option<Category> {
        category(self.global)
    }
}

impl AqiStandard {
    /// Evaluate every contributing pollutant for one reading.
    ///
    /// `concentration` returns the raw value for a pollutant, or `None` when
    /// the reading lacks it.
    pub fn evaluate<F>(&self, mut concentration: F) -> AqiBreakdown
    where
        F: FnMut(Pollutant) -> Option<f64>,
    {
        let subindices: Vec<(Pollutant, Option<f64>)> = self
            .tables()
            .iter()
            .map(|(p, table)| (*p, concentration(*p).and_then(|c| table.subindex(c))))
            .collect();
        let global = global_index(subindices.iter().map(|(_, v)| *v));
        AqiBreakdown { subindices, global }
    }
}
