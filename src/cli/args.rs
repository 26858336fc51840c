//! Command-line argument definitions
//!
//! This module defines the CLI interface using the clap derive API: a
//! `weather` command for the outdoor planner and a `billing` command for
//! the billing dashboard.

use crate::constants::{FILTER_ALL, FORECAST_API_KEY_ENV, NEWS_API_KEY_ENV};
use crate::models::{ActivityRule, PatientRow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Outdoor activity planner and billing dashboard
#[derive(Debug, Clone, Parser)]
#[command(
    name = "outdoor-billing",
    version,
    about = "Find good times to go outside, or review patient billing, from the terminal",
    long_about = "Two tools in one binary. `weather` geolocates you, fetches the forecast and \
                  top headlines, and lists the time slots matching your temperature, humidity \
                  and condition preferences with suggested activities. `billing` joins doctor \
                  charges, insurance rates and patient assignments into a per-patient cost \
                  breakdown with filtering, charts and CSV export."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", global = true, help = "Suppress non-error log output")]
    pub quiet: bool,

    /// JSON configuration file; keys that are absent keep their defaults
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Find optimal outdoor times from the local forecast
    Weather(WeatherArgs),
    /// Build and explore the patient billing summary
    Billing(BillingArgs),
}

/// Arguments for the weather command
#[derive(Debug, Clone, Parser)]
pub struct WeatherArgs {
    /// Lowest acceptable temperature in °F
    #[arg(long = "temp-min", value_name = "F", allow_negative_numbers = true)]
    pub temp_min: f64,

    /// Highest acceptable temperature in °F
    #[arg(long = "temp-max", value_name = "F", allow_negative_numbers = true)]
    pub temp_max: f64,

    /// Lowest acceptable relative humidity in percent
    #[arg(long = "humidity-min", value_name = "PCT", default_value_t = 0)]
    pub humidity_min: u8,

    /// Highest acceptable relative humidity in percent
    #[arg(long = "humidity-max", value_name = "PCT", default_value_t = 100)]
    pub humidity_max: u8,

    /// Acceptable weather conditions (Clear, Clouds, Rain, Snow, ...)
    ///
    /// Repeat the flag or pass a comma-separated list. With no conditions
    /// selected nothing matches.
    #[arg(long = "condition", value_name = "LABEL", value_delimiter = ',')]
    pub conditions: Vec<String>,

    /// Extra activity rule as NAME:MIN:MAX (°F), added to the configured list
    #[arg(long = "activity", value_name = "NAME:MIN:MAX")]
    pub activities: Vec<ActivityRule>,

    /// Forecast API key
    #[arg(long = "api-key", env = FORECAST_API_KEY_ENV, hide_env_values = true)]
    pub api_key: String,

    /// Headlines API key; headlines are skipped without one
    #[arg(long = "news-api-key", env = NEWS_API_KEY_ENV, hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Number of headlines to show
    #[arg(long = "headlines", value_name = "COUNT")]
    pub headlines: Option<usize>,
}

/// Arguments for the billing command
#[derive(Debug, Clone, Parser)]
pub struct BillingArgs {
    /// Doctor charges table (Disease Name, ICD Code, Doctor <name> Rate ($)...)
    #[arg(long = "doctors", value_name = "CSV")]
    pub doctors: PathBuf,

    /// Insurance rates table (Disease Name, ICD Code, <Insurer> Rate ($)...)
    #[arg(long = "insurance", value_name = "CSV")]
    pub insurance: PathBuf,

    /// Patient assignments (Patient Name, Patient ID, Disease, ICD Code[, Assigned Doctor][, Insurance Company])
    #[arg(long = "patients", value_name = "CSV")]
    pub patients: PathBuf,

    /// Add a patient as NAME,ID,DISEASE,ICD[,DOCTOR[,INSURER]]
    #[arg(long = "add-patient", value_name = "ROW")]
    pub add_patients: Vec<PatientRow>,

    /// Show only rows for this assigned doctor
    #[arg(long = "doctor", default_value = FILTER_ALL)]
    pub doctor: String,

    /// Show only rows for this patient name
    #[arg(long = "patient", default_value = FILTER_ALL)]
    pub patient: String,

    /// Show only rows for this insurance company
    #[arg(long = "insurer", default_value = FILTER_ALL)]
    pub insurer: String,

    /// Export the filtered view as CSV (defaults to the download directory)
    #[arg(long = "export", value_name = "PATH", num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,

    /// Also print the doctor charges and insurance rates tables
    #[arg(long = "show-sources")]
    pub show_sources: bool,

    /// Print the patient responsibility and charge distribution charts
    #[arg(long = "charts")]
    pub charts: bool,
}

impl Args {
    /// Get log level based on verbosity and quiet flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_args() {
        let args = Args::try_parse_from([
            "outdoor-billing",
            "weather",
            "--temp-min",
            "-5",
            "--temp-max",
            "75",
            "--condition",
            "Clear,Clouds",
            "--condition",
            "Rain",
            "--activity",
            "Cycling:55:80",
            "--api-key",
            "secret",
        ])
        .unwrap();

        let Some(Commands::Weather(weather)) = args.command else {
            panic!("Expected weather command");
        };
        assert_eq!(weather.temp_min, -5.0);
        assert_eq!(weather.humidity_min, 0);
        assert_eq!(weather.humidity_max, 100);
        assert_eq!(weather.conditions, vec!["Clear", "Clouds", "Rain"]);
        assert_eq!(weather.activities[0].name, "Cycling");
        assert_eq!(weather.api_key, "secret");
    }

    #[test]
    fn test_invalid_activity_is_rejected() {
        let result = Args::try_parse_from([
            "outdoor-billing",
            "weather",
            "--temp-min",
            "50",
            "--temp-max",
            "75",
            "--activity",
            "Cycling",
            "--api-key",
            "secret",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_billing_args_defaults() {
        let args = Args::try_parse_from([
            "outdoor-billing",
            "-vv",
            "billing",
            "--doctors",
            "d.csv",
            "--insurance",
            "i.csv",
            "--patients",
            "p.csv",
        ])
        .unwrap();

        assert_eq!(args.get_log_level(), "debug");
        let Some(Commands::Billing(billing)) = args.command else {
            panic!("Expected billing command");
        };
        assert_eq!(billing.doctor, "All");
        assert_eq!(billing.insurer, "All");
        assert!(billing.export.is_none());
        assert!(billing.add_patients.is_empty());
    }

    #[test]
    fn test_billing_export_flag_forms() {
        let base = [
            "outdoor-billing",
            "billing",
            "--doctors",
            "d.csv",
            "--insurance",
            "i.csv",
            "--patients",
            "p.csv",
        ];

        let args = Args::try_parse_from(base.iter().copied().chain(["--export"])).unwrap();
        let Some(Commands::Billing(billing)) = args.command else {
            panic!("Expected billing command");
        };
        assert_eq!(billing.export, Some(None));

        let args =
            Args::try_parse_from(base.iter().copied().chain(["--export", "out.csv"])).unwrap();
        let Some(Commands::Billing(billing)) = args.command else {
            panic!("Expected billing command");
        };
        assert_eq!(billing.export, Some(Some(PathBuf::from("out.csv"))));
    }

    #[test]
    fn test_add_patient_parsing() {
        let args = Args::try_parse_from([
            "outdoor-billing",
            "billing",
            "--doctors",
            "d.csv",
            "--insurance",
            "i.csv",
            "--patients",
            "p.csv",
            "--add-patient",
            "Ann Lee,P9,Asthma,J45,B",
        ])
        .unwrap();
        let Some(Commands::Billing(billing)) = args.command else {
            panic!("Expected billing command");
        };
        assert_eq!(billing.add_patients[0].name, "Ann Lee");
        assert_eq!(billing.add_patients[0].assigned_doctor.as_deref(), Some("B"));
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args = Args::try_parse_from(["outdoor-billing", "-vvv", "-q"]).unwrap();
        assert_eq!(args.get_log_level(), "error");
        assert!(args.command.is_none());
    }
}
