use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A place resolved from free text, as returned by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Full canonical address, e.g. "Diyarbakır, Güneydoğu Anadolu Bölgesi, Türkiye".
    pub display_address: String,
}

impl Location {
    /// Short name: everything before the first comma of the canonical address.
    pub fn short_name(&self) -> &str {
        self.display_address
            .split(',')
            .next()
            .unwrap_or(&self.display_address)
            .trim()
    }
}

/// Point-in-time snapshot of the conditions at a location. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub apparent_temperature_c: f64,
    pub is_daytime: bool,
    pub weather_code: i32,
    pub wind_speed_kmh: f64,
    /// Wall-clock time at the location, derived from the provider's UTC offset.
    pub local_time: DateTime<FixedOffset>,
}

/// Which daily series a table holds. The precipitation column carries a
/// sum in millimetres for historical data and a probability in percent for
/// forecast data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Historical,
    Forecast,
}

impl SeriesKind {
    pub fn precipitation_field(self) -> &'static str {
        match self {
            SeriesKind::Historical => "precipitation_sum",
            SeriesKind::Forecast => "precipitation_probability",
        }
    }
}

/// One day's aggregated weather statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    /// Daily mean temperature; only delivered for historical data.
    pub temperature_mean: Option<f64>,
    /// Precipitation sum (mm, historical) or probability (%, forecast).
    pub precipitation: f64,
    pub wind_speed_max: f64,
    /// WMO weather code; only delivered for forecast data.
    pub weather_code: Option<i32>,
}

/// An ordered daily table, ascending by date, one entry per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySeries {
    pub kind: SeriesKind,
    pub days: Vec<DailyObservation>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Scalar reductions over a historical range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Arithmetic mean of the daily maximum temperatures.
    pub average_c: f64,
    pub max_c: f64,
    pub min_c: f64,
    pub total_precipitation_mm: f64,
    pub max_wind_kmh: f64,
}

/// Inclusive calendar-date range for a historical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days spanned, end exclusive (the period length quoted in
    /// report headings).
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
