//! Human-readable interpretation of a prediction
//!
//! Everything here keys off the predicted category and the raw readings;
//! the prediction itself is taken as given.

mod report;

pub use report::{pollutant_chart, PredictionReport};

use crate::aqi::{Category, Pollutant};
use crate::inference::Observation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pollutant with the largest raw concentration; earlier pollutants win ties
pub fn dominant_pollutant(observation: &Observation) -> (Pollutant, f64) {
    let mut best = (Pollutant::ALL[0], observation.concentration(Pollutant::ALL[0]));
    for pollutant in &Pollutant::ALL[1..] {
        let value = observation.concentration(*pollutant);
        if value > best.1 {
            best = (*pollutant, value);
        }
    }
    best
}

/// Advice shown alongside a category
pub fn recommendation(category: Category) -> &'static str {
    match category {
        Category::Unhealthy | Category::VeryUnhealthy => {
            "Sensitive groups should reduce outdoor activities."
        }
        Category::Moderate => "Air quality is acceptable, but caution is advised for sensitive people.",
        Category::Good => "Air quality is good. Enjoy outdoor activities.",
    }
}

/// Summary of one prediction for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub category: Category,
    pub dominant_pollutant: Pollutant,
    pub dominant_value: f64,
    pub location: String,
    pub weather: String,
    pub recommendation: String,
}

impl Insight {
    pub fn new(observation: &Observation, category: Category) -> Self {
        let (dominant_pollutant, dominant_value) = dominant_pollutant(observation);
        Self {
            category,
            dominant_pollutant,
            dominant_value,
            location: format!("{}, {}", observation.city, observation.country),
            weather: format!(
                "{}°C, {}% humidity, wind {} km/h",
                observation.temperature, observation.humidity, observation.wind_speed
            ),
            recommendation: recommendation(category).to_string(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Air Quality Level: {}", self.category)?;
        writeln!(
            f,
            "Dominant Pollutant: {} ({})",
            self.dominant_pollutant, self.dominant_value
        )?;
        writeln!(f, "Location: {}", self.location)?;
        writeln!(f, "Weather: {}", self.weather)?;
        write!(f, "{}", self.recommendation)
    }
}
