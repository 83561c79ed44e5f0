//! Mapping from WMO weather codes to display conditions.
//!
//! The code bands follow the WMO interpretation table published with the
//! Open-Meteo docs, collapsed to the granularity the station displays:
//! the whole drizzle/rain block (51-67) renders as one rain family and
//! codes 1-3 as one cloudy family. Any code outside the known bands maps
//! to [`SkyCondition::Unknown`], never an error.

use serde::{Deserialize, Serialize};

/// Sky/precipitation condition derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyCondition {
    /// WMO 0
    Clear,
    /// WMO 1-3
    PartlyCloudy,
    /// WMO 45-48
    Fog,
    /// WMO 51-67
    Rain,
    /// WMO 71-77
    Snow,
    /// WMO 80-82
    Showers,
    /// WMO 95-99
    Thunderstorm,
    /// Anything else, including negative or out-of-range codes.
    Unknown,
}

impl SkyCondition {
    /// Classify a raw provider code. Total over all of `i32`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::PartlyCloudy,
            45..=48 => Self::Fog,
            51..=67 => Self::Rain,
            71..=77 => Self::Snow,
            80..=82 => Self::Showers,
            95..=99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Fog => "Foggy",
            Self::Rain => "Rainy",
            Self::Snow => "Snowy",
            Self::Showers => "Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }

    /// Display glyph. Only the clear sky differs between day and night.
    pub const fn icon(self, is_daytime: bool) -> &'static str {
        match self {
            Self::Clear => {
                if is_daytime {
                    "☀️"
                } else {
                    "🌙"
                }
            }
            Self::PartlyCloudy => "⛅",
            Self::Fog => "🌫️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Showers => "🌦️",
            Self::Thunderstorm => "⛈️",
            Self::Unknown => "🌡️",
        }
    }
}

impl std::fmt::Display for SkyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(SkyCondition::from_code(0), SkyCondition::Clear);
        assert_eq!(SkyCondition::from_code(1), SkyCondition::PartlyCloudy);
        assert_eq!(SkyCondition::from_code(3), SkyCondition::PartlyCloudy);
        assert_eq!(SkyCondition::from_code(45), SkyCondition::Fog);
        assert_eq!(SkyCondition::from_code(48), SkyCondition::Fog);
        assert_eq!(SkyCondition::from_code(51), SkyCondition::Rain);
        assert_eq!(SkyCondition::from_code(67), SkyCondition::Rain);
        assert_eq!(SkyCondition::from_code(71), SkyCondition::Snow);
        assert_eq!(SkyCondition::from_code(77), SkyCondition::Snow);
        assert_eq!(SkyCondition::from_code(80), SkyCondition::Showers);
        assert_eq!(SkyCondition::from_code(82), SkyCondition::Showers);
        assert_eq!(SkyCondition::from_code(95), SkyCondition::Thunderstorm);
        assert_eq!(SkyCondition::from_code(99), SkyCondition::Thunderstorm);
    }

    #[test]
    fn total_over_the_provider_range() {
        for code in 0..=99 {
            let condition = SkyCondition::from_code(code);
            assert!(!condition.label().is_empty());
            assert!(!condition.icon(true).is_empty());
            assert!(!condition.icon(false).is_empty());
        }
    }

    #[test]
    fn codes_between_bands_are_unknown() {
        for code in [-1, 4, 44, 49, 50, 68, 70, 78, 79, 83, 94, 100, i32::MAX] {
            assert_eq!(SkyCondition::from_code(code), SkyCondition::Unknown);
        }
    }

    #[test]
    fn clear_icon_follows_daylight() {
        assert_eq!(SkyCondition::Clear.icon(true), "☀️");
        assert_eq!(SkyCondition::Clear.icon(false), "🌙");
        // All other conditions ignore the flag.
        assert_eq!(
            SkyCondition::Thunderstorm.icon(true),
            SkyCondition::Thunderstorm.icon(false)
        );
    }
}
