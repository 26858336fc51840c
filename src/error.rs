//! Error handling for weather planning and billing operations.
//!
//! Provides error types with context for endpoint failures, table
//! validation, join resolution and preference checks.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::TableKind;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("Unable to retrieve location: {message}")]
    LocationUnavailable { message: String },

    #[error("Error fetching weather data: {message}")]
    ForecastUnavailable { message: String },

    #[error("Error fetching news data: {message}")]
    HeadlinesUnavailable { message: String },

    #[error("Invalid preference: {reason}")]
    InvalidPreference { reason: String },

    #[error("Invalid activity '{value}': {reason}")]
    InvalidActivity { value: String, reason: String },

    #[error("Invalid patient '{value}': {reason}")]
    InvalidPatient { value: String, reason: String },

    #[error("Table {table} at {path} is missing required column '{column}'")]
    MissingColumn {
        table: TableKind,
        path: PathBuf,
        column: String,
    },

    #[error("Missing value in {table}, row {row}, column '{column}'")]
    MissingValue {
        table: TableKind,
        row: usize,
        column: String,
    },

    #[error("Non-numeric rate in {table}, row {row}, column '{column}': '{value}'")]
    NonNumericRate {
        table: TableKind,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Patient {patient} is assigned to unknown doctor '{doctor}' (known doctors: {known})")]
    UnknownDoctor {
        patient: String,
        doctor: String,
        known: String,
    },

    #[error("Ambiguous join key in {table}: {key} appears more than once")]
    AmbiguousJoinKey { table: TableKind, key: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, AppError>;
