//! Plain-text report and chart rendering

use crate::aqi::{Category, Pollutant};
use crate::error::Result;
use crate::inference::Observation;
use std::path::Path;

/// Title line of every report
pub const REPORT_TITLE: &str = "Air Quality Prediction Report";

/// Downloadable summary of one prediction and its inputs
#[derive(Debug, Clone)]
pub struct PredictionReport<'a> {
    observation: &'a Observation,
    category: Category,
}

impl<'a> PredictionReport<'a> {
    pub fn new(observation: &'a Observation, category: Category) -> Self {
        Self { observation, category }
    }

    pub fn render(&self) -> String {
        let obs = self.observation;
        let mut out = String::new();
        out.push_str(&format!("{}\n\n", REPORT_TITLE));
        out.push_str(&format!("Prediction: {}\n", self.category));
        out.push_str(&format!("City: {}\n", obs.city));
        out.push_str(&format!("Country: {}\n", obs.country));
        out.push_str(&format!("Date: {}\n\n", obs.date));
        out.push_str("Input Parameters:\n");
        for (name, value) in obs.fields() {
            out.push_str(&format!("{}: {}\n", name, value));
        }
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

/// Horizontal bar chart of the six pollutant concentrations
pub fn pollutant_chart(observation: &Observation, width: usize) -> String {
    let values: Vec<(Pollutant, f64)> = Pollutant::ALL
        .iter()
        .map(|&p| (p, observation.concentration(p)))
        .collect();
    let max = values.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (pollutant, value) in values {
        let bar = if max > 0.0 {
            ((value.max(0.0) / max) * width as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{:<6} {:<width$} {}\n",
            pollutant.column(),
            "#".repeat(bar),
            value,
            width = width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> Observation {
        Observation::from_json(
            r#"{"PM2.5": 35, "PM10": 30, "NO2": 40, "SO2": 20, "CO": 2, "O3": 60,
                "Temperature": 25, "Humidity": 45, "Wind Speed": 15,
                "City": "Atlantis", "Country": "Nowhere", "Date": "2023-01-01"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_report_layout() {
        let obs = observation();
        let text = PredictionReport::new(&obs, Category::Moderate).render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], REPORT_TITLE);
        assert_eq!(lines[2], "Prediction: Moderate");
        assert_eq!(lines[3], "City: Atlantis");
        assert_eq!(lines[7], "Input Parameters:");
        assert_eq!(lines[8], "PM2.5: 35");
        assert_eq!(lines[16], "Wind Speed: 15");
        assert_eq!(lines.last(), Some(&"Date: 2023-01-01"));
    }

    #[test]
    fn test_chart_scales_to_largest() {
        let chart = pollutant_chart(&observation(), 10);
        let o3 = chart.lines().find(|l| l.starts_with("O3")).unwrap();
        assert!(o3.contains(&"#".repeat(10)));
        assert_eq!(chart.lines().count(), 6);
    }

    #[test]
    fn test_chart_keeps_fractional_readings() {
        let mut obs = observation();
        obs.co = 2.5;
        let chart = pollutant_chart(&obs, 10);
        let co = chart.lines().find(|l| l.starts_with("CO")).unwrap();
        assert!(co.ends_with(" 2.5"), "{}", co);
        let o3 = chart.lines().find(|l| l.starts_with("O3")).unwrap();
        assert!(o3.ends_with(" 60"), "{}", o3);
    }
}
