use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::path::PathBuf;
use tracing::warn;

use climate_core::{
    Config, DateRange, GeminiClient, GeocodeError, Location, LocationResolver, NominatimResolver,
    OpenMeteoGateway, ReportGenerator, report, summarize, to_csv,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "climate", version, about = "Climate analysis station")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the report-service credential.
    Configure,

    /// Show current conditions for a place.
    Current {
        /// City or place name, free text.
        place: String,
    },

    /// Analyze a past date range (defaults to the trailing year).
    History {
        /// City or place name, free text.
        place: String,

        /// First day of the range (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the range (YYYY-MM-DD); must not lie in the future.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Write the daily table to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Generate the engineering report.
        #[arg(long)]
        report: bool,
    },

    /// Seven-day forecast with per-day advisories.
    Forecast {
        /// City or place name, free text.
        place: String,

        /// Write the daily table to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Generate the weekly assessment report.
        #[arg(long)]
        report: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        if config.maintenance_mode() && !matches!(self.command, Command::Configure) {
            println!("{}", render::MAINTENANCE_NOTICE);
            return Ok(());
        }

        match self.command {
            Command::Configure => configure(config),
            Command::Current { place } => current(&place).await,
            Command::History { place, start, end, csv, report } => {
                let range = default_range(start, end, Utc::now().date_naive());
                history(&config, &place, range, csv, report).await
            }
            Command::Forecast { place, csv, report } => {
                forecast(&config, &place, csv, report).await
            }
        }
    }
}

/// Fill missing bounds with the original dashboard default: the trailing year.
fn default_range(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> DateRange {
    let end = end.unwrap_or(today);
    let start = start.unwrap_or(end - Duration::days(365));
    DateRange::new(start, end)
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Password::new("Report-service API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        println!("Nothing entered; configuration unchanged.");
        return Ok(());
    }

    config.set_report_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Resolve a place name, surfacing failures as user messages.
///
/// Returns `None` when the lookup produced nothing usable; the command then
/// ends without touching the weather service.
async fn resolve_place(place: &str) -> Result<Option<Location>> {
    let resolver = NominatimResolver::new()?;

    match resolver.resolve(place).await {
        Ok(location) => Ok(Some(location)),
        Err(GeocodeError::NotFound) => {
            println!("City not found.");
            Ok(None)
        }
        Err(e) => {
            warn!(error = %e, "geocoding failed");
            println!("City lookup failed: {e}");
            Ok(None)
        }
    }
}

async fn current(place: &str) -> Result<()> {
    let Some(location) = resolve_place(place).await? else {
        return Ok(());
    };

    let gateway = OpenMeteoGateway::new()?;
    match gateway.fetch_current(location.latitude, location.longitude).await {
        Ok(conditions) => render::current_card(&location, &conditions),
        Err(e) => println!("Data error: {e}"),
    }

    Ok(())
}

async fn history(
    config: &Config,
    place: &str,
    range: DateRange,
    csv: Option<PathBuf>,
    want_report: bool,
) -> Result<()> {
    let Some(location) = resolve_place(place).await? else {
        return Ok(());
    };

    let gateway = OpenMeteoGateway::new()?;

    match gateway.fetch_current(location.latitude, location.longitude).await {
        Ok(conditions) => render::current_card(&location, &conditions),
        Err(e) => println!("Data error: {e}"),
    }

    let series = match gateway
        .fetch_historical(location.latitude, location.longitude, range)
        .await
    {
        Ok(series) => series,
        Err(e) => {
            println!("Data error: {e}");
            return Ok(());
        }
    };

    let Some(stats) = summarize(&series.days) else {
        println!("Data error: the archive returned an empty table.");
        return Ok(());
    };
    render::statistics(&range, &stats);

    if let Some(path) = csv {
        std::fs::write(&path, to_csv(&series))
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        println!("Wrote {} rows to {}", series.len(), path.display());
    }

    if want_report {
        let prompt = report::historical_prompt(&location, &range, &stats);
        let text = report_generator(config)?.generate_or_placeholder(&prompt).await;
        render::report(&text);
    }

    Ok(())
}

async fn forecast(
    config: &Config,
    place: &str,
    csv: Option<PathBuf>,
    want_report: bool,
) -> Result<()> {
    let Some(location) = resolve_place(place).await? else {
        return Ok(());
    };

    let gateway = OpenMeteoGateway::new()?;

    match gateway.fetch_current(location.latitude, location.longitude).await {
        Ok(conditions) => render::current_card(&location, &conditions),
        Err(e) => println!("Data error: {e}"),
    }

    let series = match gateway
        .fetch_forecast(location.latitude, location.longitude)
        .await
    {
        Ok(series) => series,
        Err(e) => {
            println!("Data error: {e}");
            return Ok(());
        }
    };

    render::forecast_table(location.short_name(), &series.days, &config.thresholds);

    if let Some(path) = csv {
        std::fs::write(&path, to_csv(&series))
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        println!("Wrote {} rows to {}", series.len(), path.display());
    }

    if want_report {
        let prompt = report::forecast_prompt(&location, &series.days);
        let text = report_generator(config)?.generate_or_placeholder(&prompt).await;
        render::report(&text);
    }

    Ok(())
}

fn report_generator(config: &Config) -> Result<GeminiClient> {
    let api_key = config.report_api_key()?;
    Ok(GeminiClient::new(api_key, config.report.model.clone())?)
}
