//! Filtered views over the billing summary.

use crate::constants::FILTER_ALL;
use crate::models::{BillingSummaryRow, SummaryTotals};
use serde::{Deserialize, Serialize};

/// Summary columns that can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryField {
    Doctor,
    Patient,
    InsuranceCompany,
}

impl SummaryField {
    fn value(self, row: &BillingSummaryRow) -> &str {
        match self {
            SummaryField::Doctor => &row.assigned_doctor,
            SummaryField::Patient => &row.patient_name,
            SummaryField::InsuranceCompany => &row.insurance_company,
        }
    }
}

/// Equality filters; an absent filter passes every row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFilter {
    pub doctor: Option<String>,
    pub patient: Option<String>,
    pub insurance_company: Option<String>,
}

impl SummaryFilter {
    pub fn with_doctor(mut self, doctor: &str) -> Self {
        self.doctor = selection(doctor);
        self
    }

    pub fn with_patient(mut self, patient: &str) -> Self {
        self.patient = selection(patient);
        self
    }

    pub fn with_insurance_company(mut self, insurer: &str) -> Self {
        self.insurance_company = selection(insurer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.doctor.is_none() && self.patient.is_none() && self.insurance_company.is_none()
    }

    pub fn matches(&self, row: &BillingSummaryRow) -> bool {
        [
            (SummaryField::Doctor, &self.doctor),
            (SummaryField::Patient, &self.patient),
            (SummaryField::InsuranceCompany, &self.insurance_company),
        ]
        .iter()
        .all(|(field, wanted)| match wanted {
            Some(wanted) => field.value(row) == wanted,
            None => true,
        })
    }

    /// Rows matching every present filter, in summary order
    pub fn apply(&self, rows: &[BillingSummaryRow]) -> Vec<BillingSummaryRow> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

/// `All` (any case) or blank selects nothing
fn selection(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL) {
        None
    } else {
        Some(value.to_string())
    }
}

/// `All` followed by the distinct values of a field in first-seen order
pub fn filter_options(rows: &[BillingSummaryRow], field: SummaryField) -> Vec<String> {
    let mut options = vec![FILTER_ALL.to_string()];
    for row in rows {
        let value = field.value(row);
        if !options[1..].iter().any(|seen| seen == value) {
            options.push(value.to_string());
        }
    }
    options
}

/// Totals over a view; rows with missing values contribute nothing to that total
pub fn totals(rows: &[BillingSummaryRow]) -> SummaryTotals {
    rows.iter().fold(SummaryTotals::default(), |acc, row| SummaryTotals {
        total_billed: acc.total_billed + row.doctor_charge.unwrap_or(0.0),
        total_covered: acc.total_covered + row.insurance_rate.unwrap_or(0.0),
        total_unpaid: acc.total_unpaid + row.patient_owes.unwrap_or(0.0),
    })
}
