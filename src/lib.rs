//! Outdoor Billing Library
//!
//! A small Rust library behind two terminal tools: an outdoor activity
//! planner driven by public weather data, and a patient billing dashboard
//! built from tabular CSV sources.
//!
//! This library provides tools for:
//! - Resolving the caller's location and fetching the multi-point forecast
//! - Selecting forecast slots that satisfy temperature, humidity and condition preferences
//! - Suggesting activities for matching slots and showing top headlines
//! - Loading doctor charge, insurance rate and patient assignment tables
//! - Joining them into a per-patient summary with derived patient responsibility
//! - Filtering, charting and exporting the summary as CSV

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Core pipelines
pub mod billing;
pub mod weather;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{AppConfig, BillingConfig, WeatherConfig};
pub use error::{AppError, Result};
pub use models::{
    ActivityRule, BillingSummaryRow, ForecastEntry, Headline, HeadlineOutcome, Location,
    OptimalSlot, PatientRow, Preference,
};
