//! Core data structures for weather planning and billing.
//!
//! Defines forecast samples, user preferences, activity rules, the
//! typed billing tables and the derived summary rows.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Location resolved from the caller's network address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One timestamped forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// Temperature in Fahrenheit
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    pub condition: String,
}

/// User weather preference, immutable for the duration of one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity_min: u8,
    pub humidity_max: u8,
    pub conditions: BTreeSet<String>,
}

impl Preference {
    /// Build a preference, rejecting inverted ranges
    pub fn new<I, S>(
        temp_range: (f64, f64),
        humidity_range: (u8, u8),
        conditions: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let preference = Self {
            temp_min: temp_range.0,
            temp_max: temp_range.1,
            humidity_min: humidity_range.0,
            humidity_max: humidity_range.1,
            conditions: conditions.into_iter().map(Into::into).collect(),
        };
        preference.validate()?;
        Ok(preference)
    }

    pub fn validate(&self) -> Result<()> {
        if self.temp_min.is_nan() || self.temp_max.is_nan() || self.temp_min > self.temp_max {
            return Err(AppError::InvalidPreference {
                reason: format!(
                    "temperature range {} to {} is not ordered",
                    self.temp_min, self.temp_max
                ),
            });
        }
        if self.humidity_min > self.humidity_max {
            return Err(AppError::InvalidPreference {
                reason: format!(
                    "humidity range {} to {} is not ordered",
                    self.humidity_min, self.humidity_max
                ),
            });
        }
        Ok(())
    }

    /// Whether an entry satisfies all three conditions (bounds inclusive)
    pub fn admits(&self, entry: &ForecastEntry) -> bool {
        (self.temp_min..=self.temp_max).contains(&entry.temperature)
            && (self.humidity_min..=self.humidity_max).contains(&entry.humidity)
            && self.conditions.contains(&entry.condition)
    }
}

/// Outdoor activity with its optimal temperature range in Fahrenheit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRule {
    pub name: String,
    pub temp_min: f64,
    pub temp_max: f64,
}

impl ActivityRule {
    pub fn new(name: impl Into<String>, temp_min: f64, temp_max: f64) -> Self {
        Self {
            name: name.into(),
            temp_min,
            temp_max,
        }
    }

    pub fn suits(&self, temperature: f64) -> bool {
        (self.temp_min..=self.temp_max).contains(&temperature)
    }

    /// Reject empty names, non-finite bounds and inverted ranges
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| AppError::InvalidActivity {
            value: format!("{}:{}:{}", self.name, self.temp_min, self.temp_max),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("activity name is empty"));
        }
        if !self.temp_min.is_finite() || !self.temp_max.is_finite() {
            return Err(invalid("temperature bounds must be finite numbers"));
        }
        if self.temp_min > self.temp_max {
            return Err(invalid("minimum exceeds maximum"));
        }
        Ok(())
    }
}

/// Parses `Name:min:max`, e.g. `Cycling:55:80`
impl FromStr for ActivityRule {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| AppError::InvalidActivity {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let [name, min, max] = parts.as_slice() else {
            return Err(invalid("expected NAME:MIN:MAX"));
        };
        let temp_min: f64 = min.parse().map_err(|_| invalid("minimum is not a number"))?;
        let temp_max: f64 = max.parse().map_err(|_| invalid("maximum is not a number"))?;

        let rule = Self::new(*name, temp_min, temp_max);
        rule.validate().map_err(|e| match e {
            AppError::InvalidActivity { reason, .. } => invalid(&reason),
            other => other,
        })?;
        Ok(rule)
    }
}

/// Forecast entry that matched a preference, with suitable activities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalSlot {
    pub entry: ForecastEntry,
    pub activities: Vec<String>,
}

/// News headline as displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub description: String,
}

/// Result of the headline fetch; failures degrade instead of aborting
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlineOutcome {
    Available(Vec<Headline>),
    Unavailable(String),
}

/// Billing tables, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    DoctorCharges,
    InsuranceRates,
    Patients,
    Summary,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::DoctorCharges => "doctor charges",
            TableKind::InsuranceRates => "insurance rates",
            TableKind::Patients => "patient assignments",
            TableKind::Summary => "billing summary",
        };
        f.write_str(name)
    }
}

/// Per-diagnosis charges, one rate per doctor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorChargeRow {
    pub disease: String,
    pub icd_code: String,
    /// Rate keyed by doctor name; `None` when the cell is empty
    pub rates: BTreeMap<String, Option<f64>>,
}

/// Rate covered by one insurer for one diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRateRow {
    pub disease: String,
    pub icd_code: String,
    pub insurance_company: String,
    pub covered_rate: Option<f64>,
}

/// Patient assignment as loaded or entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRow {
    pub name: String,
    pub id: String,
    pub disease: String,
    pub icd_code: String,
    pub assigned_doctor: Option<String>,
    pub insurance_company: Option<String>,
}

/// Parses `Name,ID,Disease,ICD[,Doctor[,Insurer]]`
impl FromStr for PatientRow {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(AppError::InvalidPatient {
                value: s.to_string(),
                reason: "expected NAME,ID,DISEASE,ICD[,DOCTOR[,INSURER]]".to_string(),
            });
        }
        if let Some(index) = parts[..4].iter().position(|part| part.is_empty()) {
            let field = ["name", "ID", "disease", "ICD code"][index];
            return Err(AppError::InvalidPatient {
                value: s.to_string(),
                reason: format!("{} is empty", field),
            });
        }

        let optional = |index: usize| {
            parts
                .get(index)
                .filter(|value| !value.is_empty())
                .map(|value| value.to_string())
        };

        Ok(Self {
            name: parts[0].to_string(),
            id: parts[1].to_string(),
            disease: parts[2].to_string(),
            icd_code: parts[3].to_string(),
            assigned_doctor: optional(4),
            insurance_company: optional(5),
        })
    }
}

/// One derived row per patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingSummaryRow {
    pub patient_name: String,
    pub patient_id: String,
    pub disease: String,
    pub icd_code: String,
    pub assigned_doctor: String,
    pub insurance_company: String,
    pub doctor_charge: Option<f64>,
    pub insurance_rate: Option<f64>,
    pub patient_owes: Option<f64>,
}

/// Totals over a summary view; missing values are skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryTotals {
    pub total_billed: f64,
    pub total_covered: f64,
    pub total_unpaid: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(temperature: f64, humidity: u8, condition: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            temperature,
            humidity,
            condition: condition.to_string(),
        }
    }

    #[test]
    fn test_preference_rejects_inverted_ranges() {
        assert!(Preference::new((80.0, 60.0), (10, 90), ["Clear"]).is_err());
        assert!(Preference::new((60.0, 80.0), (90, 10), ["Clear"]).is_err());
        assert!(Preference::new((60.0, 60.0), (10, 10), ["Clear"]).is_ok());
    }

    #[test]
    fn test_preference_bounds_are_inclusive() {
        let pref = Preference::new((50.0, 70.0), (30, 60), ["Clear"]).unwrap();
        assert!(pref.admits(&entry(50.0, 30, "Clear")));
        assert!(pref.admits(&entry(70.0, 60, "Clear")));
        assert!(!pref.admits(&entry(70.1, 60, "Clear")));
        assert!(!pref.admits(&entry(60.0, 61, "Clear")));
        assert!(!pref.admits(&entry(60.0, 40, "Rain")));
    }

    #[test]
    fn test_activity_rule_parsing() {
        let rule: ActivityRule = "Cycling:55:80".parse().unwrap();
        assert_eq!(rule, ActivityRule::new("Cycling", 55.0, 80.0));
        assert!(rule.suits(55.0));
        assert!(rule.suits(80.0));
        assert!(!rule.suits(80.5));

        assert!("Cycling:80:55".parse::<ActivityRule>().is_err());
        assert!("Cycling:warm:80".parse::<ActivityRule>().is_err());
        assert!("Cycling".parse::<ActivityRule>().is_err());
        assert!(":1:2".parse::<ActivityRule>().is_err());
    }

    #[test]
    fn test_activity_rule_rejects_non_finite_bounds() {
        for value in ["Hike:NaN:70", "Hike:50:inf", "Hike:-infinity:70"] {
            match value.parse::<ActivityRule>() {
                Err(AppError::InvalidActivity { value: rejected, reason }) => {
                    assert_eq!(rejected, value);
                    assert!(reason.contains("finite"));
                }
                other => panic!("Expected invalid activity for {}, got {:?}", value, other),
            }
        }
        assert!(ActivityRule::new("Hike", f64::NAN, 70.0).validate().is_err());
        assert!(ActivityRule::new("Hike", 50.0, 70.0).validate().is_ok());
    }

    #[test]
    fn test_patient_row_parsing() {
        let patient: PatientRow = "Ann Lee, P010, Asthma, J45".parse().unwrap();
        assert_eq!(patient.name, "Ann Lee");
        assert_eq!(patient.icd_code, "J45");
        assert_eq!(patient.assigned_doctor, None);
        assert_eq!(patient.insurance_company, None);

        let patient: PatientRow = "Ann Lee,P010,Asthma,J45,B,Acme".parse().unwrap();
        assert_eq!(patient.assigned_doctor.as_deref(), Some("B"));
        assert_eq!(patient.insurance_company.as_deref(), Some("Acme"));

        let patient: PatientRow = "Ann Lee,P010,Asthma,J45,,Acme".parse().unwrap();
        assert_eq!(patient.assigned_doctor, None);

        assert!("Ann Lee,P010,Asthma".parse::<PatientRow>().is_err());
        assert!("Ann Lee,,Asthma,J45".parse::<PatientRow>().is_err());
    }

    #[test]
    fn test_table_kind_display() {
        assert_eq!(TableKind::DoctorCharges.to_string(), "doctor charges");
        assert_eq!(TableKind::Patients.to_string(), "patient assignments");
    }
}
