//! Configuration management and validation.
//!
//! Provides configuration structures for endpoint locations, the activity
//! rule list, and billing defaults. Values come from `Default`, an optional
//! JSON file, and CLI overrides in that order.

use crate::constants::{
    DEFAULT_DOCTOR_ROTATION, DEFAULT_FORECAST_URL, DEFAULT_HEADLINE_LIMIT, DEFAULT_HEADLINES_URL,
    DEFAULT_INSURER, DEFAULT_LOCATION_URL, DEFAULT_NEWS_LANGUAGE, DEFAULT_UNITS, EXPORT_FILE_NAME,
};
use crate::error::{AppError, Result};
use crate::models::ActivityRule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Weather planner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Geolocation endpoint
    pub location_url: String,

    /// Forecast endpoint
    pub forecast_url: String,

    /// Headlines endpoint
    pub headlines_url: String,

    /// Unit system sent to the forecast endpoint
    pub units: String,

    /// Headline language filter
    pub news_language: String,

    /// Maximum number of headlines displayed
    pub headline_limit: usize,

    /// Activities suggested for matching slots
    pub activities: Vec<ActivityRule>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            location_url: DEFAULT_LOCATION_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            headlines_url: DEFAULT_HEADLINES_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            news_language: DEFAULT_NEWS_LANGUAGE.to_string(),
            headline_limit: DEFAULT_HEADLINE_LIMIT,
            activities: vec![ActivityRule::new("Hiking", 50.0, 70.0)],
        }
    }
}

impl WeatherConfig {
    /// Point all three endpoints at a single base URL (used for local mirrors and tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.location_url = format!("{}/json/", base);
        self.forecast_url = format!("{}/data/2.5/forecast", base);
        self.headlines_url = format!("{}/v2/top-headlines", base);
        self
    }

    /// Append extra activity rules
    pub fn with_activities(mut self, activities: impl IntoIterator<Item = ActivityRule>) -> Self {
        self.activities.extend(activities);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for rule in &self.activities {
            rule.validate().map_err(|e| AppError::Configuration {
                message: format!("activity rule rejected: {}", e),
            })?;
        }
        Ok(())
    }

    /// Set the maximum number of headlines displayed
    pub fn with_headline_limit(mut self, limit: usize) -> Self {
        self.headline_limit = limit;
        self
    }
}

/// Billing dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Doctors assigned in rotation to patients without one
    pub doctor_rotation: Vec<String>,

    /// Insurer assigned to patients without one
    pub default_insurer: String,

    /// Export directory; `None` means the user's download directory
    pub export_dir: Option<PathBuf>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            doctor_rotation: DEFAULT_DOCTOR_ROTATION
                .iter()
                .map(|d| d.to_string())
                .collect(),
            default_insurer: DEFAULT_INSURER.to_string(),
            export_dir: None,
        }
    }
}

impl BillingConfig {
    /// Set the doctor rotation
    pub fn with_doctor_rotation<I, S>(mut self, doctors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doctor_rotation = doctors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default insurer
    pub fn with_default_insurer(mut self, insurer: impl Into<String>) -> Self {
        self.default_insurer = insurer.into();
        self
    }

    /// Default export path: `<download dir>/billing_summary.csv`, falling back to cwd
    pub fn default_export_path(&self) -> PathBuf {
        let dir = self
            .export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(EXPORT_FILE_NAME)
    }

    pub fn validate(&self) -> Result<()> {
        if self.doctor_rotation.is_empty() {
            return Err(AppError::Configuration {
                message: "doctor rotation must name at least one doctor".to_string(),
            });
        }
        if self.default_insurer.trim().is_empty() {
            return Err(AppError::Configuration {
                message: "default insurer must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub weather: WeatherConfig,
    pub billing: BillingConfig,
}

impl AppConfig {
    /// Load configuration from a JSON file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            serde_json::from_str(&contents).map_err(|e| AppError::Configuration {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.weather.validate()?;
        self.billing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.weather.units, "imperial");
        assert_eq!(config.weather.headline_limit, 5);
        assert_eq!(config.weather.activities.len(), 1);
        assert_eq!(config.weather.activities[0].name, "Hiking");
        assert_eq!(config.billing.doctor_rotation, vec!["A", "B"]);
        assert_eq!(config.billing.default_insurer, "Medicaid");
    }

    #[test]
    fn test_with_base_url() {
        let config = WeatherConfig::default().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.location_url, "http://127.0.0.1:9000/json/");
        assert_eq!(config.forecast_url, "http://127.0.0.1:9000/data/2.5/forecast");
        assert_eq!(config.headlines_url, "http://127.0.0.1:9000/v2/top-headlines");
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"billing": {"doctor_rotation": ["Smith"]}, "weather": {"headline_limit": 3}}"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.billing.doctor_rotation, vec!["Smith"]);
        assert_eq!(config.billing.default_insurer, "Medicaid");
        assert_eq!(config.weather.headline_limit, 3);
        assert_eq!(config.weather.units, "imperial");
    }

    #[test]
    fn test_empty_rotation_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"billing": {"doctor_rotation": []}}"#).unwrap();

        match AppConfig::from_file(&path) {
            Err(AppError::Configuration { message }) => {
                assert!(message.contains("doctor rotation"));
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_activity_in_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"weather": {"activities": [{"name": "Hiking", "temp_min": 70, "temp_max": 50}]}}"#,
        )
        .unwrap();

        match AppConfig::from_file(&path) {
            Err(AppError::Configuration { message }) => {
                assert!(message.contains("Hiking"));
                assert!(message.contains("minimum exceeds maximum"));
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_export_path_uses_configured_dir() {
        let config = BillingConfig {
            export_dir: Some(PathBuf::from("/tmp/reports")),
            ..Default::default()
        };
        assert_eq!(
            config.default_export_path(),
            PathBuf::from("/tmp/reports/billing_summary.csv")
        );
    }
}
