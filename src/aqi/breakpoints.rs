//! Piecewise-linear breakpoint tables and sub-index interpolation

use crate::error::{AirQualityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pollutants collected per observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "O3")]
    O3,
}

impl Pollutant {
    /// All pollutants in column order
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Column name in the tabular input
    pub fn column(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    /// Parse from a column name
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.column() == name)
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One (concentration range -> index range) segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub conc_low: f64,
    pub conc_high: f64,
    pub index_low: f64,
    pub index_high: f64,
}

impl Breakpoint {
    pub const fn new(conc_low: f64, conc_high: f64, index_low: f64, index_high: f64) -> Self {
        Self { conc_low, conc_high, index_low, index_high }
    }

    /// Whether the concentration lies inside `[conc_low, conc_high]`
    #[inline]
    pub fn contains(&self, concentration: f64) -> bool {
        self.conc_low <= concentration && concentration <= self.conc_high
    }

    /// Linear interpolation; the position ratio is taken first so both
    /// range endpoints map exactly onto their index bounds
    #[inline]
    fn interpolate(&self, concentration: f64) -> f64 {
        let position = (concentration - self.conc_low) / (self.conc_high - self.conc_low);
        self.index_low + (self.index_high - self.index_low) * position
    }
}

/// Ordered, non-overlapping breakpoint ranges for one pollutant.
///
/// Ranges are scanned in order and the first containing range wins, so a
/// concentration sitting exactly on a boundary shared by two ranges resolves
/// to the lower range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct BreakpointTable {
    ranges: Vec<Breakpoint>,
}

impl BreakpointTable {
    /// Build a table, rejecting empty, inverted, zero-width or overlapping ranges
    pub fn new(ranges: Vec<Breakpoint>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(AirQualityError::InvalidParameter {
                name: "breakpoints".to_string(),
                value: "[]".to_string(),
                reason: "table needs at least one range".to_string(),
            });
        }

        for (i, bp) in ranges.iter().enumerate() {
            let finite = [bp.conc_low, bp.conc_high, bp.index_low, bp.index_high]
                .iter()
                .all(|v| v.is_finite());
            if !finite || bp.conc_high <= bp.conc_low || bp.index_high < bp.index_low {
                return Err(AirQualityError::InvalidParameter {
                    name: format!("breakpoints[{}]", i),
                    value: format!("{:?}", bp),
                    reason: "range must be finite with low < high".to_string(),
                });
            }
            if i > 0 && bp.conc_low < ranges[i - 1].conc_high {
                return Err(AirQualityError::InvalidParameter {
                    name: format!("breakpoints[{}]", i),
                    value: format!("{:?}", bp),
                    reason: format!(
                        "overlaps previous range ending at {}",
                        ranges[i - 1].conc_high
                    ),
                });
            }
        }

        Ok(Self { ranges })
    }

    /// Ranges in scan order
    pub fn ranges(&self) -> &[Breakpoint] {
        &self.ranges
    }

    /// Highest concentration covered by the table
    pub fn max_concentration(&self) -> f64 {
        self.ranges.last().map(|bp| bp.conc_high).unwrap_or(f64::NEG_INFINITY)
    }

    /// Sub-index for a concentration, or `None` when no range contains it.
    ///
    /// Values outside every range (negative, above the table, inside a gap
    /// between ranges, or NaN) are missing rather than clamped.
    pub fn subindex(&self, concentration: f64) -> Option<f64> {
        self.ranges
            .iter()
            .find(|bp| bp.contains(concentration))
            .map(|bp| bp.interpolate(concentration))
    }
}

impl TryFrom<Vec<Breakpoint>> for BreakpointTable {
    type Error = AirQualityError;

    fn try_from(ranges: Vec<Breakpoint>) -> Result<Self> {
        Self::new(ranges)
    }
}

impl From<BreakpointTable> for Vec<Breakpoint> {
    fn from(table: BreakpointTable) -> Self {
        table.ranges
    }
}

/// Sub-index of `concentration` under `table`
pub fn subindex(concentration: f64, table: &BreakpointTable) -> Option<f64> {
    table.subindex(concentration)
}

const PM25_BREAKPOINTS: [Breakpoint; 4] = [
    Breakpoint::new(0.0, 12.0, 0.0, 50.0),
    Breakpoint::new(12.1, 35.4, 51.0, 100.0),
    Breakpoint::new(35.5, 55.4, 101.0, 150.0),
    Breakpoint::new(55.5, 150.4, 151.0, 200.0),
];

const PM10_BREAKPOINTS: [Breakpoint; 4] = [
    Breakpoint::new(0.0, 54.0, 0.0, 50.0),
    Breakpoint::new(55.0, 154.0, 51.0, 100.0),
    Breakpoint::new(155.0, 254.0, 101.0, 150.0),
    Breakpoint::new(255.0, 354.0, 151.0, 200.0),
];

const NO2_BREAKPOINTS: [Breakpoint; 3] = [
    Breakpoint::new(0.0, 53.0, 0.0, 50.0),
    Breakpoint::new(54.0, 100.0, 51.0, 100.0),
    Breakpoint::new(101.0, 360.0, 101.0, 150.0),
];

/// The set of pollutant tables that contribute to the global index.
///
/// SO2, CO and O3 are model features only; they have no table here and do
/// not contribute to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiStandard {
    tables: Vec<(Pollutant, BreakpointTable)>,
}

impl AqiStandard {
    /// Build a standard from explicit per-pollutant tables
    pub fn new(tables: Vec<(Pollutant, BreakpointTable)>) -> Result<Self> {
        for (i, (p, _)) in tables.iter().enumerate() {
            if tables[..i].iter().any(|(q, _)| q == p) {
                return Err(AirQualityError::InvalidParameter {
                    name: "tables".to_string(),
                    value: p.to_string(),
                    reason: "pollutant listed twice".to_string(),
                });
            }
        }
        Ok(Self { tables })
    }

    /// Pollutants with a table, in evaluation order
    pub fn pollutants(&self) -> impl Iterator<Item = Pollutant> + '_ {
        self.tables.iter().map(|(p, _)| *p)
    }

    /// Table for a pollutant, if it contributes
    pub fn table(&self, pollutant: Pollutant) -> Option<&BreakpointTable> {
        self.tables.iter().find(|(p, _)| *p == pollutant).map(|(_, t)| t)
    }

    /// All (pollutant, table) pairs
    pub fn tables(&self) -> &[(Pollutant, BreakpointTable)] {
        &self.tables
    }
}

impl Default for AqiStandard {
    /// PM2.5, PM10 and NO2 tables
    fn default() -> Self {
        Self {
            tables: vec![
                (Pollutant::Pm25, BreakpointTable { ranges: PM25_BREAKPOINTS.to_vec() }),
                (Pollutant::Pm10, BreakpointTable { ranges: PM10_BREAKPOINTS.to_vec() }),
                (Pollutant::No2, BreakpointTable { ranges: NO2_BREAKPOINTS.to_vec() }),
            ],
        }
    }
}
