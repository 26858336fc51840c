//! HTTP access to the geolocation, forecast and headline endpoints.
//!
//! Each call is a single GET awaited to completion. Responses are decoded
//! from text so that non-JSON bodies surface as `MalformedResponse`
//! rather than transport errors. Nothing is retried.

use crate::config::WeatherConfig;
use crate::error::{AppError, Result};
use crate::models::{ForecastEntry, Headline, Location};
use chrono::DateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct LocationResponse {
    status: String,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    /// `"200"` on success; error payloads sometimes carry a number instead
    cod: Value,
    message: Option<Value>,
    #[serde(default)]
    list: Vec<ForecastSample>,
}

#[derive(Debug, Deserialize)]
struct ForecastSample {
    dt: i64,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<WeatherDescriptor>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WeatherDescriptor {
    main: String,
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
}

/// Client for the three public endpoints
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Resolve the caller's city and coordinates from their network address
    pub async fn locate(&self) -> Result<Location> {
        let response: LocationResponse = self
            .get_json(&self.config.location_url, &[])
            .await?;

        if response.status != "success" {
            return Err(AppError::LocationUnavailable {
                message: response
                    .message
                    .unwrap_or_else(|| format!("status '{}'", response.status)),
            });
        }

        match (response.city, response.lat, response.lon) {
            (Some(city), Some(latitude), Some(longitude)) => {
                debug!("Located caller in {} ({}, {})", city, latitude, longitude);
                Ok(Location {
                    city,
                    latitude,
                    longitude,
                })
            }
            _ => Err(AppError::MalformedResponse {
                endpoint: self.config.location_url.clone(),
                reason: "successful response is missing city, lat or lon".to_string(),
            }),
        }
    }

    /// Fetch the multi-point forecast for a location
    pub async fn fetch_forecast(
        &self,
        location: &Location,
        api_key: &str,
    ) -> Result<Vec<ForecastEntry>> {
        let query = [
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("units", self.config.units.clone()),
            ("appid", api_key.to_string()),
        ];
        let response: ForecastResponse =
            self.get_json(&self.config.forecast_url, &query).await?;

        if !is_success_code(&response.cod) {
            let message = match response.message {
                Some(Value::String(message)) => message,
                _ => "Unknown error".to_string(),
            };
            return Err(AppError::ForecastUnavailable { message });
        }

        let entries = response
            .list
            .into_iter()
            .map(|sample| self.to_entry(sample))
            .collect::<Result<Vec<_>>>()?;

        debug!("Fetched {} forecast entries", entries.len());
        Ok(entries)
    }

    /// Fetch top headlines, truncated to the configured limit
    pub async fn fetch_headlines(&self, api_key: &str) -> Result<Vec<Headline>> {
        let query = [
            ("language", self.config.news_language.clone()),
            ("apiKey", api_key.to_string()),
        ];
        let response: HeadlinesResponse =
            self.get_json(&self.config.headlines_url, &query).await?;

        if response.status != "ok" {
            return Err(AppError::HeadlinesUnavailable {
                message: response
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        Ok(response
            .articles
            .into_iter()
            .take(self.config.headline_limit)
            .map(|article| Headline {
                title: article.title.unwrap_or_else(|| "No Title".to_string()),
                description: article
                    .description
                    .unwrap_or_else(|| "No Description".to_string()),
            })
            .collect())
    }

    fn to_entry(&self, sample: ForecastSample) -> Result<ForecastEntry> {
        let malformed = |reason: String| AppError::MalformedResponse {
            endpoint: self.config.forecast_url.clone(),
            reason,
        };

        let timestamp = DateTime::from_timestamp(sample.dt, 0)
            .ok_or_else(|| malformed(format!("timestamp {} out of range", sample.dt)))?;
        let condition = sample
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .ok_or_else(|| malformed(format!("entry at {} has no weather condition", sample.dt)))?;

        Ok(ForecastEntry {
            timestamp,
            temperature: sample.main.temp,
            humidity: sample.main.humidity,
            condition,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {}", url);
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            warn!("Undecodable response from {} (HTTP {})", url, status);
            AppError::MalformedResponse {
                endpoint: url.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

fn is_success_code(cod: &Value) -> bool {
    match cod {
        Value::String(code) => code == "200",
        Value::Number(code) => code.as_u64() == Some(200),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_code_accepts_string_and_number() {
        assert!(is_success_code(&json!("200")));
        assert!(is_success_code(&json!(200)));
        assert!(!is_success_code(&json!("401")));
        assert!(!is_success_code(&json!(404)));
        assert!(!is_success_code(&Value::Null));
    }

    #[test]
    fn test_sample_without_condition_is_malformed() {
        let client = WeatherClient::new(WeatherConfig::default()).unwrap();
        let sample: ForecastSample = serde_json::from_value(json!({
            "dt": 1_717_243_200,
            "main": {"temp": 61.2, "humidity": 40},
            "weather": []
        }))
        .unwrap();

        match client.to_entry(sample) {
            Err(AppError::MalformedResponse { reason, .. }) => {
                assert!(reason.contains("no weather condition"));
            }
            other => panic!("Expected malformed response, got {:?}", other),
        }
    }

    #[test]
    fn test_sample_converts_to_entry() {
        let client = WeatherClient::new(WeatherConfig::default()).unwrap();
        let sample: ForecastSample = serde_json::from_value(json!({
            "dt": 1_717_243_200,
            "main": {"temp": 61.2, "humidity": 40, "pressure": 1012},
            "weather": [{"main": "Clouds", "description": "few clouds"}]
        }))
        .unwrap();

        let entry = client.to_entry(sample).unwrap();
        assert_eq!(entry.timestamp.timestamp(), 1_717_243_200);
        assert_eq!(entry.temperature, 61.2);
        assert_eq!(entry.humidity, 40);
        assert_eq!(entry.condition, "Clouds");
    }
}
