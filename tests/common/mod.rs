//! Synthetic readings shared by the integration tests

#![allow(dead_code)]

use airq::inference::Observation;
use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const LOCATIONS: [(&str, &str); 5] = [
    ("Delhi", "India"),
    ("Paris", "France"),
    ("Lima", "Peru"),
    ("Cairo", "Egypt"),
    ("Tokyo", "Japan"),
];

fn one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// `n` readings with every training column; values are reproducible per seed
pub fn readings(n: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pm25 = Vec::with_capacity(n);
    let mut pm10 = Vec::with_capacity(n);
    let mut no2 = Vec::with_capacity(n);
    let mut so2 = Vec::with_capacity(n);
    let mut co = Vec::with_capacity(n);
    let mut o3 = Vec::with_capacity(n);
    let mut temperature = Vec::with_capacity(n);
    let mut humidity = Vec::with_capacity(n);
    let mut wind = Vec::with_capacity(n);
    let mut city = Vec::with_capacity(n);
    let mut country = Vec::with_capacity(n);
    let mut date = Vec::with_capacity(n);

    for _ in 0..n {
        pm25.push(one_decimal(rng.gen_range(0.0..150.0)));
        pm10.push(one_decimal(rng.gen_range(0.0..300.0)));
        no2.push(one_decimal(rng.gen_range(0.0..200.0)));
        so2.push(one_decimal(rng.gen_range(0.0..100.0)));
        co.push(one_decimal(rng.gen_range(0.0..10.0)));
        o3.push(one_decimal(rng.gen_range(0.0..200.0)));
        temperature.push(one_decimal(rng.gen_range(-10.0..40.0)));
        humidity.push(one_decimal(rng.gen_range(10.0..100.0)));
        wind.push(one_decimal(rng.gen_range(0.0..40.0)));
        let (c, k) = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];
        city.push(c);
        country.push(k);
        date.push(format!("2023-01-{:02}", rng.gen_range(1..=10)));
    }

    df!(
        "City" => &city,
        "Country" => &country,
        "Date" => &date,
        "PM2.5" => &pm25,
        "PM10" => &pm10,
        "NO2" => &no2,
        "SO2" => &so2,
        "CO" => &co,
        "O3" => &o3,
        "Temperature" => &temperature,
        "Humidity" => &humidity,
        "Wind Speed" => &wind
    )
    .unwrap()
}

/// The Delhi reading used across serving tests
pub fn delhi(date: &str) -> Observation {
    Observation {
        pm25: 35.0,
        pm10: 30.0,
        no2: 40.0,
        so2: 20.0,
        co: 2.0,
        o3: 60.0,
        temperature: 25.0,
        humidity: 45.0,
        wind_speed: 15.0,
        city: "Delhi".to_string(),
        country: "India".to_string(),
        date: date.to_string(),
    }
}
