//! Command implementations for the outdoor-billing CLI
//!
//! This module contains the command execution logic, console reporting,
//! and error handling for the CLI interface.

use crate::billing::{self, BillingTables, Dashboard, SummaryField, SummaryFilter, render};
use crate::cli::args::{Args, BillingArgs, Commands, WeatherArgs};
use crate::config::AppConfig;
use crate::constants::KNOWN_CONDITIONS;
use crate::models::{BillingSummaryRow, Preference};
use crate::weather::{self, ApiKeys, WeatherClient};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bar width used by the billing charts
const CHART_WIDTH: usize = 40;

/// Main command runner
///
/// Sets up logging and configuration, then dispatches to the selected
/// subcommand.
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    match &args.command {
        Some(Commands::Weather(weather_args)) => run_weather(weather_args, config, &args).await,
        Some(Commands::Billing(billing_args)) => run_billing(billing_args, config),
        None => Ok(()),
    }
}

/// Set up structured logging to stderr
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("outdoor_billing={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration from the optional file, falling back to defaults
fn load_configuration(args: &Args) -> Result<AppConfig> {
    match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            AppConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => {
            info!("No config file given, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Spinner for a network wait; hidden in quiet mode
fn spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

async fn run_weather(args: &WeatherArgs, config: AppConfig, global: &Args) -> Result<()> {
    let mut weather_config = config.weather.with_activities(args.activities.iter().cloned());
    if let Some(limit) = args.headlines {
        weather_config = weather_config.with_headline_limit(limit);
    }

    let preference = Preference::new(
        (args.temp_min, args.temp_max),
        (args.humidity_min, args.humidity_max),
        args.conditions
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty()),
    )
    .context("Invalid preferences")?;

    for condition in &preference.conditions {
        if !KNOWN_CONDITIONS.contains(&condition.as_str()) {
            warn!(
                "Condition '{}' is not one of {}; it only matches if the forecast reports it verbatim",
                condition,
                KNOWN_CONDITIONS.join(", ")
            );
        }
    }
    if preference.conditions.is_empty() {
        warn!("No weather conditions selected; no forecast slot can match");
    }

    let client = WeatherClient::new(weather_config)?;
    let keys = ApiKeys {
        forecast: args.api_key.clone(),
        news: args.news_api_key.clone().filter(|key| !key.trim().is_empty()),
    };

    let pb = spinner("Detecting location...", global.quiet);
    let location = client.locate().await;
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let location = location.context("Cannot plan without a location")?;

    println!(
        "{} {} ({:.4}, {:.4})",
        "Detected Location:".bright_green().bold(),
        location.city.bright_white().bold(),
        location.latitude,
        location.longitude
    );

    let pb = spinner("Fetching forecast and headlines...", global.quiet);
    let report = weather::plan(&client, &location, &preference, &keys).await;
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let report = report?;

    println!();
    print!("{}", report.render());
    Ok(())
}

fn run_billing(args: &BillingArgs, config: AppConfig) -> Result<()> {
    let mut tables = BillingTables::load(&args.doctors, &args.insurance, &args.patients)
        .context("Failed to load billing tables")?;
    for patient in args.add_patients.iter().cloned() {
        info!("Adding patient {} ({})", patient.name, patient.id);
        tables.add_patient(patient);
    }

    let dashboard =
        Dashboard::build(tables, &config.billing).context("Failed to build billing summary")?;

    for field in [
        SummaryField::Doctor,
        SummaryField::Patient,
        SummaryField::InsuranceCompany,
    ] {
        debug!(
            "{:?} filter options: {:?}",
            field,
            billing::filter_options(&dashboard.summary, field)
        );
    }

    let filter = SummaryFilter::default()
        .with_doctor(&args.doctor)
        .with_patient(&args.patient)
        .with_insurance_company(&args.insurer);
    let view = dashboard.view(&filter);
    if !filter.is_empty() {
        info!(
            "Filter kept {} of {} summary rows",
            view.len(),
            dashboard.summary.len()
        );
    }

    if args.show_sources {
        println!("{}", "Doctor Charges".bright_green().bold());
        println!("{}", render::doctor_charges_frame(&dashboard.tables.doctor_charges)?);
        println!("\n{}", "Insurance Rates".bright_green().bold());
        println!("{}\n", render::insurance_rates_frame(&dashboard.tables.insurance_rates)?);
    }

    print_summary(&view);

    if args.charts {
        println!("\n{}", "Patient Responsibility".bright_green().bold());
        print!("{}", render::patient_responsibility_chart(&view, CHART_WIDTH));
        println!("\n{}", "Doctor Charge Distribution".bright_green().bold());
        print!("{}", render::charge_distribution_chart(&view, CHART_WIDTH));
    }

    if let Some(export) = &args.export {
        let path = export
            .clone()
            .unwrap_or_else(|| config.billing.default_export_path());
        billing::export_summary(&view, &path)
            .with_context(|| format!("Failed to export summary to {}", path.display()))?;
        println!(
            "\n{} {}",
            "Exported summary to".bright_green().bold(),
            path.display().to_string().bright_white().bold()
        );
    }

    Ok(())
}

fn print_summary(view: &[BillingSummaryRow]) {
    println!("{}", "Patient Billing Summary".bright_green().bold());
    if view.is_empty() {
        println!("{}", "No patients match the selected filters.".yellow());
    } else {
        print!("{}", render::summary_table(view));
    }
    println!();
    print!("{}", render::format_totals(&billing::totals(view)));
}
