//! Application constants for the outdoor planner and billing dashboard
//!
//! This module contains endpoint defaults, table column names and display
//! labels used throughout the application.

// =============================================================================
// Weather Endpoints
// =============================================================================

/// Geolocation-by-IP endpoint (returns status/city/lat/lon)
pub const DEFAULT_LOCATION_URL: &str = "http://ip-api.com/json/";

/// Multi-point forecast endpoint
pub const DEFAULT_FORECAST_URL: &str = "http://api.openweathermap.org/data/2.5/forecast";

/// Top headlines endpoint
pub const DEFAULT_HEADLINES_URL: &str = "https://newsapi.org/v2/top-headlines";

/// Unit system requested from the forecast endpoint (Fahrenheit)
pub const DEFAULT_UNITS: &str = "imperial";

/// Headline language filter
pub const DEFAULT_NEWS_LANGUAGE: &str = "en";

/// Number of headlines shown in the report
pub const DEFAULT_HEADLINE_LIMIT: usize = 5;

/// Environment variable holding the forecast API key
pub const FORECAST_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Environment variable holding the headlines API key
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";

/// Weather condition labels offered for selection
pub const KNOWN_CONDITIONS: &[&str] = &["Clear", "Clouds", "Rain", "Snow"];

/// Timestamp format used when listing optimal slots
pub const SLOT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// =============================================================================
// Billing Tables
// =============================================================================

/// Column names shared by the source tables
pub mod columns {
    pub const DISEASE_NAME: &str = "Disease Name";
    pub const ICD_CODE: &str = "ICD Code";

    pub const PATIENT_NAME: &str = "Patient Name";
    pub const PATIENT_ID: &str = "Patient ID";
    pub const DISEASE: &str = "Disease";
    pub const ASSIGNED_DOCTOR: &str = "Assigned Doctor";
    pub const INSURANCE_COMPANY: &str = "Insurance Company";

    pub const DOCTOR_CHARGE: &str = "Doctor Charge";
    pub const INSURANCE_RATE: &str = "Insurance Rate";
    pub const PATIENT_OWES: &str = "Patient Owes";
}

/// Summary columns in export and display order
pub const SUMMARY_COLUMNS: &[&str] = &[
    columns::PATIENT_NAME,
    columns::PATIENT_ID,
    columns::DISEASE,
    columns::ICD_CODE,
    columns::ASSIGNED_DOCTOR,
    columns::INSURANCE_COMPANY,
    columns::DOCTOR_CHARGE,
    columns::INSURANCE_RATE,
    columns::PATIENT_OWES,
];

/// Header pattern for per-doctor rate columns, e.g. `Doctor A Rate ($)`
pub const DOCTOR_RATE_PATTERN: &str = r"^Doctor\s+(.+?)\s+Rate\s*\(\$\)$";

/// Header pattern for per-insurer rate columns, e.g. `Medicaid Rate ($)`
pub const INSURER_RATE_PATTERN: &str = r"^(.+?)\s+Rate\s*\(\$\)$";

/// Doctors assigned in rotation when a patient row has none
pub const DEFAULT_DOCTOR_ROTATION: &[&str] = &["A", "B"];

/// Insurer assigned when a patient row has none
pub const DEFAULT_INSURER: &str = "Medicaid";

/// Filter value meaning "no filter"
pub const FILTER_ALL: &str = "All";

/// File name used when exporting the billing summary
pub const EXPORT_FILE_NAME: &str = "billing_summary.csv";
