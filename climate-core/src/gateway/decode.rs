//! Decoding of Open-Meteo daily blocks.
//!
//! The provider returns one array per requested variable; the request order
//! is the contract. The constants below are the single source of truth for
//! that order, and every decode validates that exactly the requested
//! variables came back with one value per day. A transposition in either
//! table silently swaps columns, so the sample-response tests pin each
//! column to known distinct values.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::FetchError;
use crate::model::DailyObservation;

/// Archive daily variables, in request order:
/// 0 = max, 1 = min, 2 = mean, 3 = precipitation sum, 4 = wind.
pub const HISTORICAL_DAILY_VARIABLES: [&str; 5] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "temperature_2m_mean",
    "precipitation_sum",
    "wind_speed_10m_max",
];

/// Forecast daily variables, in request order:
/// 0 = max, 1 = min, 2 = precipitation probability, 3 = wind, 4 = code.
pub const FORECAST_DAILY_VARIABLES: [&str; 5] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_probability_max",
    "wind_speed_10m_max",
    "weather_code",
];

/// The `daily` object of an Open-Meteo response: a time axis plus one
/// series per requested variable.
#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    time: Vec<String>,
    #[serde(flatten)]
    series: HashMap<String, Vec<Value>>,
}

impl DailyBlock {
    /// Check the block holds exactly the requested variables.
    fn ensure_requested(&self, variables: &[&str]) -> Result<(), FetchError> {
        for name in variables {
            if !self.series.contains_key(*name) {
                return Err(FetchError::Decode(format!(
                    "daily block is missing the requested variable `{name}`"
                )));
            }
        }
        if self.series.len() != variables.len() {
            return Err(FetchError::Decode(format!(
                "daily block has {} variables, requested {}",
                self.series.len(),
                variables.len()
            )));
        }
        Ok(())
    }

    fn column(&self, name: &str, expected_len: usize) -> Result<Vec<f64>, FetchError> {
        let raw = self.series.get(name).ok_or_else(|| {
            FetchError::Decode(format!("daily block is missing the requested variable `{name}`"))
        })?;

        if raw.len() != expected_len {
            return Err(FetchError::Decode(format!(
                "variable `{name}` has {} values for {expected_len} days",
                raw.len()
            )));
        }

        raw.iter()
            .map(|value| {
                if value.is_null() {
                    // The archive serves nulls for days it has not aggregated yet.
                    Ok(f64::NAN)
                } else {
                    value.as_f64().ok_or_else(|| {
                        FetchError::Decode(format!("variable `{name}` contains a non-numeric value"))
                    })
                }
            })
            .collect()
    }

    fn dates(&self) -> Result<Vec<NaiveDate>, FetchError> {
        self.time
            .iter()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| FetchError::Decode(format!("bad date `{raw}`: {e}")))
            })
            .collect()
    }
}

pub fn decode_historical(block: &DailyBlock) -> Result<Vec<DailyObservation>, FetchError> {
    block.ensure_requested(&HISTORICAL_DAILY_VARIABLES)?;

    let dates = block.dates()?;
    let len = dates.len();
    let max = block.column(HISTORICAL_DAILY_VARIABLES[0], len)?;
    let min = block.column(HISTORICAL_DAILY_VARIABLES[1], len)?;
    let mean = block.column(HISTORICAL_DAILY_VARIABLES[2], len)?;
    let precipitation = block.column(HISTORICAL_DAILY_VARIABLES[3], len)?;
    let wind = block.column(HISTORICAL_DAILY_VARIABLES[4], len)?;

    Ok(dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| DailyObservation {
            date,
            temperature_max: max[i],
            temperature_min: min[i],
            temperature_mean: Some(mean[i]),
            precipitation: precipitation[i],
            wind_speed_max: wind[i],
            weather_code: None,
        })
        .collect())
}

pub fn decode_forecast(block: &DailyBlock) -> Result<Vec<DailyObservation>, FetchError> {
    block.ensure_requested(&FORECAST_DAILY_VARIABLES)?;

    let dates = block.dates()?;
    let len = dates.len();
    let max = block.column(FORECAST_DAILY_VARIABLES[0], len)?;
    let min = block.column(FORECAST_DAILY_VARIABLES[1], len)?;
    let probability = block.column(FORECAST_DAILY_VARIABLES[2], len)?;
    let wind = block.column(FORECAST_DAILY_VARIABLES[3], len)?;
    let code = block.column(FORECAST_DAILY_VARIABLES[4], len)?;

    Ok(dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| DailyObservation {
            date,
            temperature_max: max[i],
            temperature_min: min[i],
            temperature_mean: None,
            precipitation: probability[i],
            wind_speed_max: wind[i],
            weather_code: Some(code[i].round() as i32),
        })
        .collect())
}
