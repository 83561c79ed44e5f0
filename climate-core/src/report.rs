//! Prompt construction for the engineering reports.
//!
//! The returned strings are a contract with the downstream language model:
//! they embed the statistics at fixed precision and spell out formatting
//! rules (no greeting, no "(Daily)" in headings, period-derived title).
//! Callers treat the generated prose as opaque display text.

use crate::model::{DailyObservation, DateRange, Location, SummaryStatistics};

/// Prompt for the historical-range engineering report.
pub fn historical_prompt(
    location: &Location,
    range: &DateRange,
    stats: &SummaryStatistics,
) -> String {
    format!(
        "You are an expert meteorological engineer.\n\
         \n\
         Analysis details:\n\
         - Location: {address}\n\
         - Period: {start} to {end} ({days}-day span).\n\
         \n\
         Statistics:\n\
         - Maximum temperature: {max:.1}°C\n\
         - Minimum temperature: {min:.1}°C\n\
         - Average temperature: {avg:.1}°C\n\
         - Total precipitation: {precip:.1} mm\n\
         - Maximum wind: {wind:.1} km/h\n\
         \n\
         TASK:\n\
         Write a technical \"engineering report\" from these figures.\n\
         \n\
         RULES:\n\
         1. Never use the word \"(Daily)\" in a heading.\n\
         2. Title the report after the period length (for example \
         \"{short_name} Four-Month Seasonal Analysis\" or \"Summer Period Review\").\n\
         3. Technical analysis only; no narrative introduction or closing remarks.",
        address = location.display_address,
        start = range.start.format("%d.%m.%Y"),
        end = range.end.format("%d.%m.%Y"),
        days = range.day_count(),
        max = stats.max_c,
        min = stats.min_c,
        avg = stats.average_c,
        precip = stats.total_precipitation_mm,
        wind = stats.max_wind_kmh,
        short_name = location.short_name(),
    )
}

/// Prompt for the weekly forecast assessment.
pub fn forecast_prompt(location: &Location, days: &[DailyObservation]) -> String {
    let maxima = join_values(days, |d| format!("{:.1}", d.temperature_max));
    let probabilities = join_values(days, |d| format!("{:.0}", d.precipitation));
    let winds = join_values(days, |d| format!("{:.1}", d.wind_speed_max));

    format!(
        "You are a meteorological engineer. Review the forecast data for the \
         next {count} days and write a technical assessment.\n\
         Location: {address}\n\
         Maximum temperatures (°C): [{maxima}]\n\
         Precipitation probabilities (%): [{probabilities}]\n\
         Wind speeds (km/h): [{winds}]\n\
         \n\
         Add short technical notes on:\n\
         1. The temperature trend (rising or falling)\n\
         2. The precipitation regime and its likelihood\n\
         3. Wind conditions and storm risk\n\
         \n\
         No greeting and no sign-off.",
        count = days.len(),
        address = location.display_address,
    )
}

fn join_values(days: &[DailyObservation], f: impl Fn(&DailyObservation) -> String) -> String {
    days.iter().map(f).collect::<Vec<_>>().join(", ")
}
