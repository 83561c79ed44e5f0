//! Per-day advisories for the forecast view.
//!
//! A fixed, ordered rule set: the first matching rule wins, so the storm-code
//! rule must be checked before the generic precipitation rule, which must be
//! checked before the temperature rules. All cutoffs live in
//! [`AdvisoryThresholds`] so deployments can tune them without code changes.

use serde::{Deserialize, Serialize};

/// Cutoffs for the advisory rules, loaded as part of the station config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryThresholds {
    /// Weather codes at or above this are treated as storm conditions.
    #[serde(default = "default_storm_code")]
    pub storm_code: i32,

    /// Precipitation probability (%) above which an umbrella is advised.
    #[serde(default = "default_precipitation_cutoff")]
    pub precipitation_cutoff: f64,

    /// Daily maximum (°C) above which a heat warning is issued.
    #[serde(default = "default_heat_cutoff")]
    pub heat_cutoff: f64,

    /// Daily maximum (°C) below which a cold warning is issued.
    #[serde(default = "default_cold_cutoff")]
    pub cold_cutoff: f64,
}

const fn default_storm_code() -> i32 {
    95
}

const fn default_precipitation_cutoff() -> f64 {
    50.0
}

const fn default_heat_cutoff() -> f64 {
    35.0
}

const fn default_cold_cutoff() -> f64 {
    10.0
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            storm_code: default_storm_code(),
            precipitation_cutoff: default_precipitation_cutoff(),
            heat_cutoff: default_heat_cutoff(),
            cold_cutoff: default_cold_cutoff(),
        }
    }
}

/// Outcome of the rule evaluation, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    Storm,
    Umbrella,
    Heat,
    Cold,
    Fair,
}

impl Advisory {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Storm => "⛈️ Storm risk!",
            Self::Umbrella => "☔ Take an umbrella!",
            Self::Heat => "🔥 Very hot!",
            Self::Cold => "🧣 Dress warmly!",
            Self::Fair => "😎 Fair weather",
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Evaluate the rules for one forecast day. Deterministic and total: falls
/// through to [`Advisory::Fair`] when nothing matches.
pub fn advise(
    thresholds: &AdvisoryThresholds,
    temperature_max: f64,
    precipitation: f64,
    weather_code: i32,
) -> Advisory {
    if weather_code >= thresholds.storm_code {
        Advisory::Storm
    } else if precipitation > thresholds.precipitation_cutoff {
        Advisory::Umbrella
    } else if temperature_max > thresholds.heat_cutoff {
        Advisory::Heat
    } else if temperature_max < thresholds.cold_cutoff {
        Advisory::Cold
    } else {
        Advisory::Fair
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> AdvisoryThresholds {
        AdvisoryThresholds::default()
    }

    #[test]
    fn storm_code_wins_over_precipitation() {
        // Both the storm rule and the precipitation rule hold; the storm rule
        // is checked first.
        assert_eq!(advise(&defaults(), 20.0, 70.0, 96), Advisory::Storm);
    }

    #[test]
    fn precipitation_wins_over_temperature() {
        assert_eq!(advise(&defaults(), 38.0, 60.0, 61), Advisory::Umbrella);
        assert_eq!(advise(&defaults(), 2.0, 60.0, 61), Advisory::Umbrella);
    }

    #[test]
    fn temperature_bands() {
        assert_eq!(advise(&defaults(), 36.0, 10.0, 0), Advisory::Heat);
        assert_eq!(advise(&defaults(), 5.0, 10.0, 0), Advisory::Cold);
        assert_eq!(advise(&defaults(), 20.0, 10.0, 0), Advisory::Fair);
    }

    #[test]
    fn cutoffs_are_exclusive() {
        let t = defaults();
        assert_eq!(advise(&t, 35.0, 50.0, 0), Advisory::Fair);
        assert_eq!(advise(&t, 10.0, 50.0, 0), Advisory::Fair);
    }

    #[test]
    fn custom_thresholds_are_honored() {
        let t = AdvisoryThresholds {
            storm_code: 95,
            precipitation_cutoff: 60.0,
            heat_cutoff: 30.0,
            cold_cutoff: 5.0,
        };

        assert_eq!(advise(&t, 32.0, 55.0, 0), Advisory::Heat);
        assert_eq!(advise(&t, 20.0, 65.0, 0), Advisory::Umbrella);
        assert_eq!(advise(&t, 7.0, 0.0, 0), Advisory::Fair);
    }

    #[test]
    fn every_input_yields_an_advisory() {
        for code in [-5, 0, 50, 94, 95, 99, 120] {
            for max in [-30.0, 0.0, 20.0, 45.0] {
                for precip in [0.0, 49.9, 100.0] {
                    let _ = advise(&defaults(), max, precip, code);
                }
            }
        }
    }

    #[test]
    fn thresholds_deserialize_with_defaults() {
        let t: AdvisoryThresholds = toml::from_str("").expect("empty table should parse");
        assert_eq!(t, AdvisoryThresholds::default());

        let t: AdvisoryThresholds =
            toml::from_str("precipitation_cutoff = 60.0").expect("partial table should parse");
        assert_eq!(t.precipitation_cutoff, 60.0);
        assert_eq!(t.heat_cutoff, 35.0);
    }
}
