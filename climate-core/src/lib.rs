//! Core library for the `climate` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding and weather-data clients (Nominatim, Open-Meteo)
//! - Weather-code classification, advisories and summary statistics
//! - Report prompt building and the text-generation client
//!
//! It is used by `climate-cli`, but can also be reused by other binaries or services.

pub mod advisory;
pub mod condition;
pub mod config;
pub mod export;
pub mod gateway;
pub mod gemini;
pub mod geocode;
pub mod model;
pub mod report;
pub mod stats;

pub use advisory::{Advisory, AdvisoryThresholds, advise};
pub use condition::SkyCondition;
pub use config::{Config, ReportConfig};
pub use export::{ExportError, parse_csv, to_csv};
pub use gateway::{FetchError, OpenMeteoGateway};
pub use gemini::{GeminiClient, ReportError, ReportGenerator};
pub use geocode::{GeocodeError, LocationResolver, NominatimResolver};
pub use model::{
    CurrentConditions, DailyObservation, DailySeries, DateRange, Location, SeriesKind,
    SummaryStatistics,
};
pub use stats::summarize;
