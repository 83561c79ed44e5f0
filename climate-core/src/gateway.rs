//! Open-Meteo data gateway: current conditions, historical daily aggregates
//! and the 7-day forecast, normalized into the crate's daily table model.

use chrono::{FixedOffset, Utc};
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::model::{CurrentConditions, DailySeries, DateRange, SeriesKind};

pub mod decode;

pub const OPEN_METEO_FORECAST_BASE: &str = "https://api.open-meteo.com/v1";
pub const OPEN_METEO_ARCHIVE_BASE: &str = "https://archive-api.open-meteo.com/v1";

/// The forecast table is fixed at one week.
pub const FORECAST_DAYS: usize = 7;

/// Current-conditions variables, in request order.
pub const CURRENT_VARIABLES: [&str; 6] = [
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "is_day",
    "weather_code",
    "wind_speed_10m",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Archive requests retry on transport failures and 5xx answers.
const RETRY_ATTEMPTS: u32 = 5;
const RETRY_BACKOFF_FACTOR: Duration = Duration::from_millis(200);

/// Freshness window for cached historical responses.
const HISTORICAL_CACHE_TTL: Duration = Duration::from_secs(3600);
const HISTORICAL_CACHE_CAPACITY: u64 = 64;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather request failed: {0}")]
    Transport(String),

    #[error("weather service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode weather response: {0}")]
    Decode(String),

    #[error("invalid date range: {0}")]
    InvalidRange(String),
}

impl FetchError {
    fn retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    utc_offset_seconds: i32,
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    is_day: i32,
    weather_code: i32,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: decode::DailyBlock,
}

/// Gateway over the two Open-Meteo hosts. Historical responses are served
/// from a TTL cache; forecasts change too often to cache.
#[derive(Debug)]
pub struct OpenMeteoGateway {
    http: Client,
    forecast_base: String,
    archive_base: String,
    historical_cache: Cache<String, DailySeries>,
}

impl OpenMeteoGateway {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_urls(
            OPEN_METEO_FORECAST_BASE.to_string(),
            OPEN_METEO_ARCHIVE_BASE.to_string(),
        )
    }

    /// Point at different hosts; used by tests.
    pub fn with_base_urls(forecast_base: String, archive_base: String) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let historical_cache = Cache::builder()
            .max_capacity(HISTORICAL_CACHE_CAPACITY)
            .time_to_live(HISTORICAL_CACHE_TTL)
            .build();

        Ok(Self {
            http,
            forecast_base,
            archive_base,
            historical_cache,
        })
    }

    /// Single point-in-time read with the provider's UTC offset applied.
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, FetchError> {
        let url = format!("{}/forecast", self.forecast_base);
        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("current", CURRENT_VARIABLES.join(",")),
            ("timezone", "auto".to_string()),
        ];

        let response: CurrentResponse = self.get(&url, &query).await?;

        let offset = FixedOffset::east_opt(response.utc_offset_seconds).ok_or_else(|| {
            FetchError::Decode(format!(
                "UTC offset {} seconds is out of range",
                response.utc_offset_seconds
            ))
        })?;
        let local_time = Utc::now().with_timezone(&offset);

        let current = response.current;
        Ok(CurrentConditions {
            temperature_c: current.temperature_2m,
            humidity_pct: current.relative_humidity_2m,
            apparent_temperature_c: current.apparent_temperature,
            is_daytime: current.is_day != 0,
            weather_code: current.weather_code,
            wind_speed_kmh: current.wind_speed_10m,
            local_time,
        })
    }

    /// Daily aggregates for a past range. Requires `start <= end <= today`.
    pub async fn fetch_historical(
        &self,
        lat: f64,
        lon: f64,
        range: DateRange,
    ) -> Result<DailySeries, FetchError> {
        if range.start > range.end {
            return Err(FetchError::InvalidRange(format!(
                "start {} is after end {}",
                range.start, range.end
            )));
        }
        let today = Utc::now().date_naive();
        if range.end > today {
            return Err(FetchError::InvalidRange(format!(
                "end {} is in the future",
                range.end
            )));
        }

        let key = format!("{lat:.4}:{lon:.4}:{}:{}", range.start, range.end);
        if let Some(hit) = self.historical_cache.get(&key).await {
            debug!(key = %key, "archive cache hit");
            return Ok(hit);
        }

        let url = format!("{}/archive", self.archive_base);
        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("start_date", range.start.to_string()),
            ("end_date", range.end.to_string()),
            ("daily", decode::HISTORICAL_DAILY_VARIABLES.join(",")),
            ("timezone", "auto".to_string()),
        ];

        let response: DailyResponse = self.get_with_retry(&url, &query).await?;
        let days = decode::decode_historical(&response.daily)?;
        let series = DailySeries {
            kind: SeriesKind::Historical,
            days,
        };

        self.historical_cache.insert(key, series.clone()).await;
        Ok(series)
    }

    /// Seven-day forecast table. Never cached.
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<DailySeries, FetchError> {
        let url = format!("{}/forecast", self.forecast_base);
        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("daily", decode::FORECAST_DAILY_VARIABLES.join(",")),
            ("forecast_days", FORECAST_DAYS.to_string()),
            ("timezone", "auto".to_string()),
        ];

        let response: DailyResponse = self.get(&url, &query).await?;
        let days = decode::decode_forecast(&response.daily)?;
        if days.len() != FORECAST_DAYS {
            return Err(FetchError::Decode(format!(
                "expected {FORECAST_DAYS} forecast days, got {}",
                days.len()
            )));
        }

        Ok(DailySeries {
            kind: SeriesKind::Forecast,
            days,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        debug!(url = %url, "fetching weather data");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let mut attempt = 1;
        loop {
            match self.get(url, query).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < RETRY_ATTEMPTS && err.retryable() => {
                    let backoff = RETRY_BACKOFF_FACTOR * 2u32.pow(attempt - 1);
                    debug!(attempt, backoff_ms = backoff.as_millis() as u64, "retrying archive request");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn gateway() -> OpenMeteoGateway {
        // Unroutable hosts; the tests below never reach the network.
        OpenMeteoGateway::with_base_urls(
            "http://127.0.0.1:9".to_string(),
            "http://127.0.0.1:9".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn rejects_inverted_range() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        );

        let err = gateway().fetch_historical(37.9, 40.2, range).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidRange(_)));
    }

    #[tokio::test]
    async fn rejects_future_end_date() {
        let today = Utc::now().date_naive();
        let range = DateRange::new(today, today + chrono::Duration::days(3));

        let err = gateway().fetch_historical(37.9, 40.2, range).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidRange(_)));
    }

    #[test]
    fn transport_and_server_errors_are_retryable() {
        assert!(FetchError::Transport("connection reset".into()).retryable());
        assert!(FetchError::Status { status: 503, body: String::new() }.retryable());
        assert!(!FetchError::Status { status: 400, body: String::new() }.retryable());
        assert!(!FetchError::Decode("bad json".into()).retryable());
        assert!(!FetchError::InvalidRange("inverted".into()).retryable());
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert!(truncated.len() < body.len());
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
