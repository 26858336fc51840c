//! Billing summary builder.
//!
//! Joins patients to doctor charges on (disease, ICD code) and to insurance
//! rates on (disease, ICD code, insurance company), then derives the amount
//! each patient owes. Output rows follow patient order, so identical inputs
//! always produce identical summaries.

use crate::billing::loader::{DoctorCharges, load_doctor_charges, load_insurance_rates, load_patients};
use crate::config::BillingConfig;
use crate::error::{AppError, Result};
use crate::models::{BillingSummaryRow, DoctorChargeRow, InsuranceRateRow, PatientRow, TableKind};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// The three source tables of the billing dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct BillingTables {
    pub doctor_charges: DoctorCharges,
    pub insurance_rates: Vec<InsuranceRateRow>,
    pub patients: Vec<PatientRow>,
}

impl BillingTables {
    pub fn load(doctors: &Path, insurance: &Path, patients: &Path) -> Result<Self> {
        Ok(Self {
            doctor_charges: load_doctor_charges(doctors)?,
            insurance_rates: load_insurance_rates(insurance)?,
            patients: load_patients(patients)?,
        })
    }

    /// Append a user-entered patient
    pub fn add_patient(&mut self, patient: PatientRow) {
        debug!("Adding patient {} ({})", patient.name, patient.id);
        self.patients.push(patient);
    }
}

/// Fill in missing doctor (by rotation over row position) and insurer
pub fn assign_defaults(patients: &[PatientRow], config: &BillingConfig) -> Result<Vec<PatientRow>> {
    config.validate()?;

    Ok(patients
        .iter()
        .enumerate()
        .map(|(i, patient)| {
            let rotation = &config.doctor_rotation[i % config.doctor_rotation.len()];
            PatientRow {
                assigned_doctor: Some(
                    patient
                        .assigned_doctor
                        .clone()
                        .unwrap_or_else(|| rotation.clone()),
                ),
                insurance_company: Some(
                    patient
                        .insurance_company
                        .clone()
                        .unwrap_or_else(|| config.default_insurer.clone()),
                ),
                ..patient.clone()
            }
        })
        .collect())
}

/// Build one summary row per patient
pub fn build_summary(
    tables: &BillingTables,
    config: &BillingConfig,
) -> Result<Vec<BillingSummaryRow>> {
    let charges = index_doctor_charges(&tables.doctor_charges.rows)?;
    let rates = index_insurance_rates(&tables.insurance_rates)?;
    let patients = assign_defaults(&tables.patients, config)?;

    let mut summary = Vec::with_capacity(patients.len());
    for patient in patients {
        let doctor = patient.assigned_doctor.unwrap_or_default();
        let insurer = patient.insurance_company.unwrap_or_default();

        if !tables.doctor_charges.knows(&doctor) {
            return Err(AppError::UnknownDoctor {
                patient: format!("{} ({})", patient.name, patient.id),
                doctor,
                known: tables.doctor_charges.doctors.join(", "),
            });
        }

        let charge_row = charges.get(&(patient.disease.as_str(), patient.icd_code.as_str()));
        if charge_row.is_none() {
            warn!(
                "No doctor charges for {} / {} (patient {})",
                patient.disease, patient.icd_code, patient.id
            );
        }
        let doctor_charge = charge_row.and_then(|row| row.rates.get(&doctor).copied().flatten());

        let rate_row = rates.get(&(
            patient.disease.as_str(),
            patient.icd_code.as_str(),
            insurer.as_str(),
        ));
        if rate_row.is_none() {
            warn!(
                "No {} rate for {} / {} (patient {})",
                insurer, patient.disease, patient.icd_code, patient.id
            );
        }
        let insurance_rate = rate_row.and_then(|row| row.covered_rate);

        let patient_owes = match (doctor_charge, insurance_rate) {
            (Some(charge), Some(rate)) => Some(charge - rate),
            _ => None,
        };

        summary.push(BillingSummaryRow {
            patient_name: patient.name,
            patient_id: patient.id,
            disease: patient.disease,
            icd_code: patient.icd_code,
            assigned_doctor: doctor,
            insurance_company: insurer,
            doctor_charge,
            insurance_rate,
            patient_owes,
        });
    }

    debug!("Built billing summary with {} rows", summary.len());
    Ok(summary)
}

fn index_doctor_charges(rows: &[DoctorChargeRow]) -> Result<HashMap<(&str, &str), &DoctorChargeRow>> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let key = (row.disease.as_str(), row.icd_code.as_str());
        if index.insert(key, row).is_some() {
            return Err(AppError::AmbiguousJoinKey {
                table: TableKind::DoctorCharges,
                key: format!("({}, {})", row.disease, row.icd_code),
            });
        }
    }
    Ok(index)
}

fn index_insurance_rates(
    rows: &[InsuranceRateRow],
) -> Result<HashMap<(&str, &str, &str), &InsuranceRateRow>> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let key = (
            row.disease.as_str(),
            row.icd_code.as_str(),
            row.insurance_company.as_str(),
        );
        if index.insert(key, row).is_some() {
            return Err(AppError::AmbiguousJoinKey {
                table: TableKind::InsuranceRates,
                key: format!(
                    "({}, {}, {})",
                    row.disease, row.icd_code, row.insurance_company
                ),
            });
        }
    }
    Ok(index)
}
