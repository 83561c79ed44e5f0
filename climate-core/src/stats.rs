//! Scalar reductions over a daily series.

use crate::model::{DailyObservation, SummaryStatistics};

/// Reduce a non-empty sequence of daily observations to summary statistics.
///
/// Returns `None` for an empty slice; callers guarantee non-empty input via
/// the date-range validation done before fetching.
pub fn summarize(days: &[DailyObservation]) -> Option<SummaryStatistics> {
    if days.is_empty() {
        return None;
    }

    let average_c = days.iter().map(|d| d.temperature_max).sum::<f64>() / days.len() as f64;
    let max_c = days.iter().map(|d| d.temperature_max).fold(f64::MIN, f64::max);
    let min_c = days.iter().map(|d| d.temperature_min).fold(f64::MAX, f64::min);
    let total_precipitation_mm = days.iter().map(|d| d.precipitation).sum();
    let max_wind_kmh = days.iter().map(|d| d.wind_speed_max).fold(f64::MIN, f64::max);

    Some(SummaryStatistics {
        average_c,
        max_c,
        min_c,
        total_precipitation_mm,
        max_wind_kmh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32, max: f64, min: f64, precipitation: f64, wind: f64) -> DailyObservation {
        DailyObservation {
            date: NaiveDate::from_ymd_opt(2023, 1, d).unwrap(),
            temperature_max: max,
            temperature_min: min,
            temperature_mean: Some((max + min) / 2.0),
            precipitation,
            wind_speed_max: wind,
            weather_code: None,
        }
    }

    #[test]
    fn empty_input_has_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn single_day_collapses_to_its_own_values() {
        let stats = summarize(&[day(1, 12.5, 3.0, 4.2, 18.0)]).unwrap();

        assert_eq!(stats.average_c, 12.5);
        assert_eq!(stats.max_c, 12.5);
        assert_eq!(stats.min_c, 3.0);
        assert_eq!(stats.total_precipitation_mm, 4.2);
        assert_eq!(stats.max_wind_kmh, 18.0);
    }

    #[test]
    fn three_day_range() {
        let days = [
            day(1, 10.0, 2.0, 0.0, 10.0),
            day(2, 15.0, 3.0, 5.0, 30.0),
            day(3, 5.0, 1.0, 2.0, 20.0),
        ];

        let stats = summarize(&days).unwrap();
        assert_eq!(stats.average_c, 10.0);
        assert_eq!(stats.max_c, 15.0);
        assert_eq!(stats.min_c, 1.0);
        assert_eq!(stats.total_precipitation_mm, 7.0);
        assert_eq!(stats.max_wind_kmh, 30.0);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = [
            day(1, 10.0, 2.0, 0.0, 10.0),
            day(2, 15.0, 3.0, 5.0, 30.0),
            day(3, 5.0, 1.0, 2.0, 20.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(summarize(&forward), summarize(&reversed));
    }

    #[test]
    fn extrema_with_negative_temperatures() {
        let days = [day(1, -5.0, -12.0, 1.0, 40.0), day(2, -2.0, -8.0, 0.5, 25.0)];

        let stats = summarize(&days).unwrap();
        assert_eq!(stats.max_c, -2.0);
        assert_eq!(stats.min_c, -12.0);
        assert_eq!(stats.average_c, -3.5);
    }
}
