//! A single reading submitted for prediction

use crate::aqi::Pollutant;
use crate::error::{AirQualityError, Result};
use crate::preprocessing::{CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One observation: nine numeric readings plus location and date.
///
/// Field names serialize as the training column names, so a JSON document
/// like `{"PM2.5": 35, ..., "Wind Speed": 15, "City": "Delhi", ...}` maps
/// directly onto this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "PM2.5")]
    pub pm25: f64,
    #[serde(rename = "PM10")]
    pub pm10: f64,
    #[serde(rename = "NO2")]
    pub no2: f64,
    #[serde(rename = "SO2")]
    pub so2: f64,
    #[serde(rename = "CO")]
    pub co: f64,
    #[serde(rename = "O3")]
    pub o3: f64,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "Wind Speed")]
    pub wind_speed: f64,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Date")]
    pub date: String,
}

impl Observation {
    /// Parse a JSON object, naming the first absent or non-numeric field
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or_else(|| {
            AirQualityError::InferenceError("observation must be a JSON object".to_string())
        })?;

        for column in NUMERIC_COLUMNS {
            match object.get(column) {
                None | Some(Value::Null) => {
                    return Err(AirQualityError::schema(column, "required numeric field is absent"))
                }
                Some(v) if !v.is_number() => {
                    return Err(AirQualityError::schema(column, format!("expected a number, got {}", v)))
                }
                Some(_) => {}
            }
        }
        for column in CATEGORICAL_COLUMNS {
            match object.get(column) {
                Some(Value::String(_)) => {}
                None | Some(Value::Null) => {
                    return Err(AirQualityError::schema(column, "required field is absent"))
                }
                Some(v) => {
                    return Err(AirQualityError::schema(column, format!("expected a string, got {}", v)))
                }
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Value of a numeric column by its training name
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let value = match column {
            "PM2.5" => self.pm25,
            "PM10" => self.pm10,
            "NO2" => self.no2,
            "SO2" => self.so2,
            "CO" => self.co,
            "O3" => self.o3,
            "Temperature" => self.temperature,
            "Humidity" => self.humidity,
            "Wind Speed" => self.wind_speed,
            _ => return None,
        };
        Some(value)
    }

    /// Value of a categorical column by its training name
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "City" => Some(&self.city),
            "Country" => Some(&self.country),
            "Date" => Some(&self.date),
            _ => None,
        }
    }

    /// Raw concentration of a pollutant
    pub fn concentration(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
            Pollutant::O3 => self.o3,
        }
    }

    /// Every input field as `(column, display value)`, in column order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields: Vec<(&'static str, String)> = NUMERIC_COLUMNS
            .iter()
            .filter_map(|&c| self.numeric(c).map(|v| (c, v.to_string())))
            .collect();
        fields.extend(
            CATEGORICAL_COLUMNS
                .iter()
                .filter_map(|&c| self.categorical(c).map(|v| (c, v.to_string()))),
        );
        fields
    }

    /// Single-row frame with the training column names
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(NUMERIC_COLUMNS.len() + CATEGORICAL_COLUMNS.len());
        for (name, value) in NUMERIC_COLUMNS.iter().filter_map(|&c| self.numeric(c).map(|v| (c, v))) {
            columns.push(Series::new(name.into(), &[value]).into());
        }
        for (name, value) in CATEGORICAL_COLUMNS.iter().filter_map(|&c| self.categorical(c).map(|v| (c, v))) {
            columns.push(Series::new(name.into(), &[value]).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// How a location field was supplied: picked from the vocabulary, or typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationInput {
    Known(String),
    FreeText(String),
}

impl LocationInput {
    /// Interpret a selection-list choice; the "Other" entry takes the free text
    pub fn from_choice(choice: &str, free_text: Option<&str>) -> Self {
        if choice == crate::artifacts::OTHER_OPTION {
            LocationInput::FreeText(free_text.unwrap_or_default().trim().to_string())
        } else {
            LocationInput::Known(choice.to_string())
        }
    }

    /// The plain string passed to the feature pipeline
    pub fn resolve(self) -> String {
        match self {
            LocationInput::Known(value) | LocationInput::FreeText(value) => value,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LocationInput::Known(value) | LocationInput::FreeText(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELHI: &str = r#"{
        "PM2.5": 35, "PM10": 30, "NO2": 40, "SO2": 20, "CO": 2, "O3": 60,
        "Temperature": 25, "Humidity": 45, "Wind Speed": 15,
        "City": "Delhi", "Country": "India", "Date": "2023-01-01"
    }"#;

    #[test]
    fn test_from_json() {
        let obs = Observation::from_json(DELHI).unwrap();
        assert_eq!(obs.pm25, 35.0);
        assert_eq!(obs.wind_speed, 15.0);
        assert_eq!(obs.city, "Delhi");
    }

    #[test]
    fn test_missing_numeric_field_names_column() {
        let json = DELHI.replace(r#""Humidity": 45,"#, "");
        match Observation::from_json(&json) {
            Err(AirQualityError::SchemaMismatch { column, .. }) => assert_eq!(column, "Humidity"),
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let json = DELHI.replace(r#""CO": 2"#, r#""CO": "two""#);
        assert!(matches!(
            Observation::from_json(&json),
            Err(AirQualityError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_to_frame_has_training_columns() {
        let df = Observation::from_json(DELHI).unwrap().to_frame().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 12);
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names[0], "PM2.5");
        assert_eq!(names[8], "Wind Speed");
        assert_eq!(names[11], "Date");
    }

    #[test]
    fn test_location_choice() {
        assert_eq!(
            LocationInput::from_choice("Delhi", None),
            LocationInput::Known("Delhi".to_string())
        );
        let typed = LocationInput::from_choice("Other", Some(" Atlantis "));
        assert_eq!(typed, LocationInput::FreeText("Atlantis".to_string()));
        assert_eq!(typed.resolve(), "Atlantis");
    }
}
