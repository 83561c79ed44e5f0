use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::advisory::AdvisoryThresholds;

/// Environment variable that overrides the stored text-generation API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable that forces maintenance mode on ("1" or "true").
pub const MAINTENANCE_ENV: &str = "CLIMATE_MAINTENANCE";

/// Settings for the text-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// API key for the generative-language service. Kept out of the source
    /// tree; usually supplied via `climate configure` or the environment.
    pub api_key: Option<String>,

    /// Model identifier to request.
    #[serde(default = "default_report_model")]
    pub model: String,
}

fn default_report_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { api_key: None, model: default_report_model() }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// When set, every command short-circuits and shows a static notice.
    #[serde(default)]
    pub maintenance_mode: bool,

    /// Example TOML:
    /// [report]
    /// api_key = "..."
    /// model = "gemini-2.0-flash"
    #[serde(default)]
    pub report: ReportConfig,

    /// Advisory cutoffs; absent fields fall back to the shipped defaults.
    #[serde(default)]
    pub thresholds: AdvisoryThresholds,
}

impl Config {
    /// API key for the report service, environment first, config file second.
    pub fn report_api_key(&self) -> Result<String> {
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        self.report.api_key.clone().ok_or_else(|| {
            anyhow!(
                "No API key configured for the report service.\n\
                 Hint: run `climate configure` and enter your key, or set {API_KEY_ENV}."
            )
        })
    }

    pub fn is_report_configured(&self) -> bool {
        self.report.api_key.is_some() || env::var(API_KEY_ENV).is_ok_and(|k| !k.is_empty())
    }

    /// Maintenance switch, environment override first.
    pub fn maintenance_mode(&self) -> bool {
        match env::var(MAINTENANCE_ENV) {
            Ok(v) => v == "1" || v.eq_ignore_ascii_case("true"),
            Err(_) => self.maintenance_mode,
        }
    }

    /// Store an API key, keeping the configured model.
    pub fn set_report_api_key(&mut self, api_key: String) {
        self.report.api_key = Some(api_key);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "climate-station", "climate-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
