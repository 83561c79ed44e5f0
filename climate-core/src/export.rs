//! CSV serialization of a daily table.
//!
//! Columns follow the observation field names; the precipitation column is
//! named for what it holds (`precipitation_sum` vs `precipitation_probability`)
//! and the weather-code column only exists for forecast tables. Floats are
//! written with Rust's shortest-roundtrip formatting so a re-parse recovers
//! the exact values.

use thiserror::Error;

use crate::model::{DailyObservation, DailySeries, SeriesKind};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unexpected CSV header: {0}")]
    Header(String),

    #[error("CSV row {row}: {reason}")]
    Row { row: usize, reason: String },
}

fn header(kind: SeriesKind) -> String {
    match kind {
        SeriesKind::Historical => format!(
            "date,temperature_max,temperature_min,temperature_mean,{},wind_speed_max",
            kind.precipitation_field()
        ),
        SeriesKind::Forecast => format!(
            "date,temperature_max,temperature_min,{},wind_speed_max,weather_code",
            kind.precipitation_field()
        ),
    }
}

pub fn to_csv(series: &DailySeries) -> String {
    let mut out = header(series.kind);
    out.push('\n');

    for day in &series.days {
        match series.kind {
            SeriesKind::Historical => {
                let mean = day
                    .temperature_mean
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                out.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    day.date,
                    day.temperature_max,
                    day.temperature_min,
                    mean,
                    day.precipitation,
                    day.wind_speed_max,
                ));
            }
            SeriesKind::Forecast => {
                let code = day.weather_code.map(|c| c.to_string()).unwrap_or_default();
                out.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    day.date,
                    day.temperature_max,
                    day.temperature_min,
                    day.precipitation,
                    day.wind_speed_max,
                    code,
                ));
            }
        }
    }

    out
}

pub fn parse_csv(kind: SeriesKind, text: &str) -> Result<DailySeries, ExportError> {
    let mut lines = text.lines();
    let expected = header(kind);
    let found = lines.next().unwrap_or_default();
    if found != expected {
        return Err(ExportError::Header(found.to_string()));
    }

    let days = lines
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| parse_row(kind, i + 2, line))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DailySeries { kind, days })
}

fn parse_row(kind: SeriesKind, row: usize, line: &str) -> Result<DailyObservation, ExportError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 6 {
        return Err(ExportError::Row {
            row,
            reason: format!("expected 6 fields, found {}", fields.len()),
        });
    }

    let bad = |reason: String| ExportError::Row { row, reason };

    let date = fields[0]
        .parse()
        .map_err(|e| bad(format!("bad date `{}`: {e}", fields[0])))?;
    let number = |field: &str, name: &str| {
        field
            .parse::<f64>()
            .map_err(|e| bad(format!("bad {name} `{field}`: {e}")))
    };

    match kind {
        SeriesKind::Historical => Ok(DailyObservation {
            date,
            temperature_max: number(fields[1], "temperature_max")?,
            temperature_min: number(fields[2], "temperature_min")?,
            temperature_mean: if fields[3].is_empty() {
                None
            } else {
                Some(number(fields[3], "temperature_mean")?)
            },
            precipitation: number(fields[4], "precipitation_sum")?,
            wind_speed_max: number(fields[5], "wind_speed_max")?,
            weather_code: None,
        }),
        SeriesKind::Forecast => Ok(DailyObservation {
            date,
            temperature_max: number(fields[1], "temperature_max")?,
            temperature_min: number(fields[2], "temperature_min")?,
            temperature_mean: None,
            precipitation: number(fields[3], "precipitation_probability")?,
            wind_speed_max: number(fields[4], "wind_speed_max")?,
            weather_code: if fields[5].is_empty() {
                None
            } else {
                Some(fields[5].parse().map_err(|e| {
                    bad(format!("bad weather_code `{}`: {e}", fields[5]))
                })?)
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn historical() -> DailySeries {
        DailySeries {
            kind: SeriesKind::Historical,
            days: vec![
                DailyObservation {
                    date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                    temperature_max: 10.3,
                    temperature_min: 2.15,
                    temperature_mean: Some(6.225),
                    precipitation: 0.0,
                    wind_speed_max: 11.7,
                    weather_code: None,
                },
                DailyObservation {
                    date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                    temperature_max: 15.0,
                    temperature_min: 3.0,
                    temperature_mean: Some(9.0),
                    precipitation: 5.4,
                    wind_speed_max: 31.0,
                    weather_code: None,
                },
            ],
        }
    }

    fn forecast() -> DailySeries {
        DailySeries {
            kind: SeriesKind::Forecast,
            days: vec![DailyObservation {
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                temperature_max: 28.0,
                temperature_min: 17.5,
                temperature_mean: None,
                precipitation: 70.0,
                wind_speed_max: 22.5,
                weather_code: Some(96),
            }],
        }
    }

    #[test]
    fn historical_round_trip() {
        let series = historical();
        let csv = to_csv(&series);

        assert!(csv.starts_with(
            "date,temperature_max,temperature_min,temperature_mean,precipitation_sum,wind_speed_max\n"
        ));

        let parsed = parse_csv(SeriesKind::Historical, &csv).unwrap();
        assert_eq!(parsed.days, series.days);
    }

    #[test]
    fn forecast_round_trip() {
        let series = forecast();
        let csv = to_csv(&series);

        assert!(csv.starts_with(
            "date,temperature_max,temperature_min,precipitation_probability,wind_speed_max,weather_code\n"
        ));
        assert!(csv.contains("2024-06-01,28,17.5,70,22.5,96"));

        let parsed = parse_csv(SeriesKind::Forecast, &csv).unwrap();
        assert_eq!(parsed.days, series.days);
    }

    #[test]
    fn header_mismatch_is_rejected() {
        let csv = to_csv(&forecast());
        let err = parse_csv(SeriesKind::Historical, &csv).unwrap_err();
        assert!(matches!(err, ExportError::Header(_)));
    }

    #[test]
    fn short_row_is_rejected_with_its_line_number() {
        let csv = format!("{}\n2023-01-01,1.0,2.0\n", super::header(SeriesKind::Historical));
        let err = parse_csv(SeriesKind::Historical, &csv).unwrap_err();

        match err {
            ExportError::Row { row, .. } => assert_eq!(row, 2),
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_number_is_rejected() {
        let csv = format!(
            "{}\n2023-01-01,hot,2.0,3.0,0.0,11.0\n",
            super::header(SeriesKind::Historical)
        );

        let err = parse_csv(SeriesKind::Historical, &csv).unwrap_err();
        assert!(err.to_string().contains("temperature_max"));
    }
}
