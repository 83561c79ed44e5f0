//! Terminal rendering of the station's views.

use climate_core::{
    AdvisoryThresholds, CurrentConditions, DailyObservation, DateRange, Location, SkyCondition,
    SummaryStatistics, advise,
};

pub const MAINTENANCE_NOTICE: &str =
    "🔧 The station is under maintenance. Please check back later.";

/// Header card with the place, local time and current conditions.
pub fn current_card(location: &Location, current: &CurrentConditions) {
    let condition = SkyCondition::from_code(current.weather_code);

    println!();
    println!(
        "{} {} — {}",
        condition.icon(current.is_daytime),
        location.short_name(),
        condition.label()
    );
    println!("   {}", location.display_address);
    println!("   🕒 {} (local time)", current.local_time.format("%H:%M"));
    println!(
        "   {:.1}°C (feels like {:.1}°C) | Humidity {:.0}% | Wind {:.1} km/h",
        current.temperature_c,
        current.apparent_temperature_c,
        current.humidity_pct,
        current.wind_speed_kmh
    );
}

pub fn statistics(range: &DateRange, stats: &SummaryStatistics) {
    println!();
    println!(
        "📅 Period {} – {} ({} days)",
        range.start,
        range.end,
        range.day_count()
    );
    println!(
        "   Average {:.1} °C | Highest {:.1} °C | Lowest {:.1} °C",
        stats.average_c, stats.max_c, stats.min_c
    );
    println!(
        "   Total precipitation {:.1} mm | Max wind gust {:.1} km/h",
        stats.total_precipitation_mm, stats.max_wind_kmh
    );
}

/// One line per forecast day: date, icon, high/low, condition, advisory.
pub fn forecast_table(short_name: &str, days: &[DailyObservation], thresholds: &AdvisoryThresholds) {
    println!();
    println!("🔮 7-day forecast: {short_name}");

    for day in days {
        // Forecast rows always carry a code; treat a gap as unknown.
        let code = day.weather_code.unwrap_or(-1);
        let condition = SkyCondition::from_code(code);
        let advisory = advise(thresholds, day.temperature_max, day.precipitation, code);

        println!(
            "   {}  {}  {:>3.0}° / {:>3.0}°  {:<14} {}",
            day.date.format("%d.%m"),
            condition.icon(true),
            day.temperature_max,
            day.temperature_min,
            condition.label(),
            advisory.message(),
        );
    }
}

pub fn report(text: &str) {
    println!();
    println!("📝 Engineer's report");
    println!();
    println!("{text}");
}
