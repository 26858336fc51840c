//! Weather planner pipeline.
//!
//! Location provider → forecast fetcher → preference filter → display.
//! Forecast failures abort the query; headline failures only degrade the
//! news section.

pub mod client;
pub mod display;
pub mod filter;

pub use client::WeatherClient;
pub use display::{format_headlines, format_slots};
pub use filter::{find_optimal_slots, suitable_activities};

use crate::error::Result;
use crate::models::{HeadlineOutcome, Location, OptimalSlot, Preference};
use tracing::{info, warn};

/// API credentials for one planning session
#[derive(Debug, Clone)]
pub struct ApiKeys {
    pub forecast: String,
    /// Headlines are skipped when no key is configured
    pub news: Option<String>,
}

/// Outcome of one preference query
#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub location: Location,
    pub slots: Vec<OptimalSlot>,
    pub headlines: HeadlineOutcome,
}

impl WeatherReport {
    /// Full text report: slots followed by headlines
    pub fn render(&self) -> String {
        format!(
            "{}\nTop Headlines:\n{}",
            format_slots(&self.slots),
            format_headlines(&self.headlines)
        )
    }
}

/// Run one preference query against an already resolved location
pub async fn plan(
    client: &WeatherClient,
    location: &Location,
    preference: &Preference,
    keys: &ApiKeys,
) -> Result<WeatherReport> {
    preference.validate()?;

    let entries = client.fetch_forecast(location, &keys.forecast).await?;
    let slots = find_optimal_slots(&entries, preference, &client.config().activities);
    info!(
        "{} of {} forecast entries match preferences for {}",
        slots.len(),
        entries.len(),
        location.city
    );

    let headlines = load_headlines(client, keys.news.as_deref()).await;

    Ok(WeatherReport {
        location: location.clone(),
        slots,
        headlines,
    })
}

/// Fetch headlines, converting any failure into a degraded outcome
pub async fn load_headlines(client: &WeatherClient, api_key: Option<&str>) -> HeadlineOutcome {
    let Some(api_key) = api_key else {
        return HeadlineOutcome::Unavailable("no news API key configured".to_string());
    };

    match client.fetch_headlines(api_key).await {
        Ok(headlines) => HeadlineOutcome::Available(headlines),
        Err(e) => {
            warn!("Headlines unavailable: {}", e);
            HeadlineOutcome::Unavailable(e.to_string())
        }
    }
}
