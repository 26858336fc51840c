//! CSV table loading and validation.
//!
//! Each source table is read with every column as a string, then converted
//! into typed records. Missing columns, missing key cells and non-numeric
//! rates are rejected here so later stages only see validated data.

use crate::constants::{DOCTOR_RATE_PATTERN, INSURER_RATE_PATTERN, columns};
use crate::error::{AppError, Result};
use crate::models::{DoctorChargeRow, InsuranceRateRow, PatientRow, TableKind};
use polars::prelude::*;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Doctor charges with the doctor names declared by the table header
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorCharges {
    /// Doctors in header order
    pub doctors: Vec<String>,
    pub rows: Vec<DoctorChargeRow>,
}

impl DoctorCharges {
    pub fn knows(&self, doctor: &str) -> bool {
        self.doctors.iter().any(|d| d == doctor)
    }
}

/// Read a CSV file with a header row, keeping every cell as a string
pub fn read_string_table(path: &Path) -> Result<DataFrame> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(
        "Read {} rows x {} columns from {}",
        frame.height(),
        frame.width(),
        path.display()
    );
    Ok(frame)
}

/// Named, validated access to the string cells of one table
pub(crate) struct TableReader<'a> {
    table: TableKind,
    path: &'a Path,
    frame: &'a DataFrame,
}

impl<'a> TableReader<'a> {
    pub(crate) fn new(table: TableKind, path: &'a Path, frame: &'a DataFrame) -> Self {
        Self { table, path, frame }
    }

    pub(crate) fn height(&self) -> usize {
        self.frame.height()
    }

    /// Header names, trimmed, in file order
    pub(crate) fn headers(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| c.name().trim().to_string())
            .collect()
    }

    pub(crate) fn optional_column(&self, name: &str) -> Result<Option<&'a StringChunked>> {
        match self
            .frame
            .get_columns()
            .iter()
            .find(|c| c.name().trim() == name)
        {
            Some(column) => Ok(Some(column.as_materialized_series().str()?)),
            None => Ok(None),
        }
    }

    pub(crate) fn column(&self, name: &str) -> Result<&'a StringChunked> {
        self.optional_column(name)?
            .ok_or_else(|| AppError::MissingColumn {
                table: self.table,
                path: self.path.to_path_buf(),
                column: name.to_string(),
            })
    }

    /// Trimmed cell value; empty cells read as `None`
    pub(crate) fn cell(values: &StringChunked, row: usize) -> Option<String> {
        values
            .get(row)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn required_cell(
        &self,
        values: &StringChunked,
        row: usize,
        column: &str,
    ) -> Result<String> {
        Self::cell(values, row).ok_or_else(|| AppError::MissingValue {
            table: self.table,
            row: row + 1,
            column: column.to_string(),
        })
    }

    /// Parse an optional monetary cell, accepting `$` and thousands separators
    pub(crate) fn rate_cell(
        &self,
        values: &StringChunked,
        row: usize,
        column: &str,
    ) -> Result<Option<f64>> {
        let Some(raw) = Self::cell(values, row) else {
            return Ok(None);
        };
        let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
        cleaned
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| AppError::NonNumericRate {
                table: self.table,
                row: row + 1,
                column: column.to_string(),
                value: raw,
            })
    }

    /// Whether every cell in a row is empty (trailing blank lines in exports)
    pub(crate) fn is_blank_row(&self, row: usize) -> Result<bool> {
        for column in self.frame.get_columns() {
            if Self::cell(column.as_materialized_series().str()?, row).is_some() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Load the doctor charges table: `Disease Name, ICD Code, Doctor <name> Rate ($)...`
pub fn load_doctor_charges(path: &Path) -> Result<DoctorCharges> {
    let frame = read_string_table(path)?;
    let reader = TableReader::new(TableKind::DoctorCharges, path, &frame);

    let disease = reader.column(columns::DISEASE_NAME)?;
    let icd = reader.column(columns::ICD_CODE)?;

    let pattern = Regex::new(DOCTOR_RATE_PATTERN).map_err(|e| AppError::Configuration {
        message: format!("invalid doctor rate pattern: {}", e),
    })?;
    let mut rate_columns: Vec<(String, &StringChunked, String)> = Vec::new();
    for header in reader.headers() {
        if let Some(caps) = pattern.captures(&header) {
            let doctor = caps[1].trim().to_string();
            if rate_columns.iter().any(|(seen, _, _)| *seen == doctor) {
                return Err(AppError::AmbiguousJoinKey {
                    table: TableKind::DoctorCharges,
                    key: format!("rate column for doctor '{}'", doctor),
                });
            }
            rate_columns.push((doctor, reader.column(&header)?, header));
        }
    }
    if rate_columns.is_empty() {
        return Err(AppError::MissingColumn {
            table: TableKind::DoctorCharges,
            path: path.to_path_buf(),
            column: "Doctor <name> Rate ($)".to_string(),
        });
    }

    let mut rows = Vec::with_capacity(reader.height());
    for row in 0..reader.height() {
        if reader.is_blank_row(row)? {
            debug!("Skipping blank doctor charges row {}", row + 1);
            continue;
        }
        let mut rates = BTreeMap::new();
        for (doctor, values, header) in &rate_columns {
            rates.insert(doctor.clone(), reader.rate_cell(values, row, header)?);
        }
        rows.push(DoctorChargeRow {
            disease: reader.required_cell(disease, row, columns::DISEASE_NAME)?,
            icd_code: reader.required_cell(icd, row, columns::ICD_CODE)?,
            rates,
        });
    }

    let doctors: Vec<String> = rate_columns.into_iter().map(|(d, _, _)| d).collect();
    debug!(
        "Loaded {} doctor charge rows for doctors {:?}",
        rows.len(),
        doctors
    );
    Ok(DoctorCharges { doctors, rows })
}

/// Load the insurance rates table: `Disease Name, ICD Code, <Insurer> Rate ($)...`
///
/// Each insurer rate column yields one row per diagnosis.
pub fn load_insurance_rates(path: &Path) -> Result<Vec<InsuranceRateRow>> {
    let frame = read_string_table(path)?;
    let reader = TableReader::new(TableKind::InsuranceRates, path, &frame);

    let disease = reader.column(columns::DISEASE_NAME)?;
    let icd = reader.column(columns::ICD_CODE)?;

    let insurer_pattern = Regex::new(INSURER_RATE_PATTERN).map_err(|e| AppError::Configuration {
        message: format!("invalid insurer rate pattern: {}", e),
    })?;
    let doctor_pattern = Regex::new(DOCTOR_RATE_PATTERN).map_err(|e| AppError::Configuration {
        message: format!("invalid doctor rate pattern: {}", e),
    })?;

    let mut rate_columns = Vec::new();
    for header in reader.headers() {
        if doctor_pattern.is_match(&header) {
            warn!("Ignoring doctor rate column '{}' in insurance table", header);
            continue;
        }
        if let Some(caps) = insurer_pattern.captures(&header) {
            let insurer = caps[1].trim().to_string();
            rate_columns.push((insurer, reader.column(&header)?, header));
        }
    }
    if rate_columns.is_empty() {
        return Err(AppError::MissingColumn {
            table: TableKind::InsuranceRates,
            path: path.to_path_buf(),
            column: "<Insurer> Rate ($)".to_string(),
        });
    }

    let mut rows = Vec::new();
    for row in 0..reader.height() {
        if reader.is_blank_row(row)? {
            continue;
        }
        let disease_name = reader.required_cell(disease, row, columns::DISEASE_NAME)?;
        let icd_code = reader.required_cell(icd, row, columns::ICD_CODE)?;
        for (insurer, values, header) in &rate_columns {
            rows.push(InsuranceRateRow {
                disease: disease_name.clone(),
                icd_code: icd_code.clone(),
                insurance_company: insurer.clone(),
                covered_rate: reader.rate_cell(values, row, header)?,
            });
        }
    }

    debug!("Loaded {} insurance rate rows", rows.len());
    Ok(rows)
}

/// Load patient assignments; doctor and insurer columns are optional
pub fn load_patients(path: &Path) -> Result<Vec<PatientRow>> {
    let frame = read_string_table(path)?;
    let reader = TableReader::new(TableKind::Patients, path, &frame);

    let name = reader.column(columns::PATIENT_NAME)?;
    let id = reader.column(columns::PATIENT_ID)?;
    let disease = reader.column(columns::DISEASE)?;
    let icd = reader.column(columns::ICD_CODE)?;
    let doctor = reader.optional_column(columns::ASSIGNED_DOCTOR)?;
    let insurer = reader.optional_column(columns::INSURANCE_COMPANY)?;

    let mut rows = Vec::with_capacity(reader.height());
    for row in 0..reader.height() {
        if reader.is_blank_row(row)? {
            continue;
        }
        rows.push(PatientRow {
            name: reader.required_cell(name, row, columns::PATIENT_NAME)?,
            id: reader.required_cell(id, row, columns::PATIENT_ID)?,
            disease: reader.required_cell(disease, row, columns::DISEASE)?,
            icd_code: reader.required_cell(icd, row, columns::ICD_CODE)?,
            assigned_doctor: doctor.and_then(|values| TableReader::cell(values, row)),
            insurance_company: insurer.and_then(|values| TableReader::cell(values, row)),
        });
    }

    debug!("Loaded {} patients", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_doctor_charges() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "doctors.csv",
            "Disease Name,ICD Code,Doctor A Rate ($),Doctor B Rate ($)\n\
             Asthma,J45,150,175.50\n\
             Diabetes,E11,\"$1,200\",\n",
        );

        let charges = load_doctor_charges(&path).unwrap();
        assert_eq!(charges.doctors, vec!["A", "B"]);
        assert_eq!(charges.rows.len(), 2);
        assert_eq!(charges.rows[0].disease, "Asthma");
        assert_eq!(charges.rows[0].rates["A"], Some(150.0));
        assert_eq!(charges.rows[0].rates["B"], Some(175.5));
        assert_eq!(charges.rows[1].rates["A"], Some(1200.0));
        assert_eq!(charges.rows[1].rates["B"], None);
        assert!(charges.knows("B"));
        assert!(!charges.knows("C"));
    }

    #[test]
    fn test_doctor_table_without_rate_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "doctors.csv", "Disease Name,ICD Code,Fee\nAsthma,J45,150\n");

        match load_doctor_charges(&path) {
            Err(AppError::MissingColumn { table, .. }) => {
                assert_eq!(table, TableKind::DoctorCharges);
            }
            other => panic!("Expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_rate_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "doctors.csv",
            "Disease Name,ICD Code,Doctor A Rate ($)\nAsthma,J45,call us\n",
        );

        match load_doctor_charges(&path) {
            Err(AppError::NonNumericRate { row, column, value, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "Doctor A Rate ($)");
                assert_eq!(value, "call us");
            }
            other => panic!("Expected non-numeric rate, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rates_are_rejected() {
        let dir = TempDir::new().unwrap();
        for value in ["NaN", "inf", "-Infinity"] {
            let path = write(
                &dir,
                "doctors.csv",
                &format!("Disease Name,ICD Code,Doctor A Rate ($)\nAsthma,J45,{}\n", value),
            );

            match load_doctor_charges(&path) {
                Err(AppError::NonNumericRate { value: rejected, .. }) => {
                    assert_eq!(rejected, value);
                }
                other => panic!("Expected non-numeric rate for {}, got {:?}", value, other),
            }
        }

        let path = write(
            &dir,
            "insurance.csv",
            "Disease Name,ICD Code,Medicaid Rate ($)\nAsthma,J45,nan\n",
        );
        assert!(matches!(
            load_insurance_rates(&path),
            Err(AppError::NonNumericRate { .. })
        ));
    }

    #[test]
    fn test_duplicate_doctor_columns_are_ambiguous() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "doctors.csv",
            "Disease Name,ICD Code,Doctor A Rate ($),Doctor A Rate($)\nAsthma,J45,150,160\n",
        );

        match load_doctor_charges(&path) {
            Err(AppError::AmbiguousJoinKey { table, key }) => {
                assert_eq!(table, TableKind::DoctorCharges);
                assert!(key.contains("'A'"));
            }
            other => panic!("Expected ambiguous doctor column, got {:?}", other),
        }
    }

    #[test]
    fn test_load_insurance_rates_wide_format() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "insurance.csv",
            "Disease Name,ICD Code,Medicaid Rate ($),Acme Health Rate ($)\n\
             Asthma,J45,100,120\n",
        );

        let rates = load_insurance_rates(&path).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].insurance_company, "Medicaid");
        assert_eq!(rates[0].covered_rate, Some(100.0));
        assert_eq!(rates[1].insurance_company, "Acme Health");
        assert_eq!(rates[1].covered_rate, Some(120.0));
    }

    #[test]
    fn test_load_patients_with_optional_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "patients.csv",
            "Patient Name,Patient ID,Disease,ICD Code,Assigned Doctor\n\
             Ann Lee,P001,Asthma,J45,B\n\
             Bo Chen,P002,Diabetes,E11,\n\
             ,,,,\n",
        );

        let patients = load_patients(&path).unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].assigned_doctor.as_deref(), Some("B"));
        assert_eq!(patients[0].insurance_company, None);
        assert_eq!(patients[1].assigned_doctor, None);
    }

    #[test]
    fn test_patient_missing_key_cell() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "patients.csv",
            "Patient Name,Patient ID,Disease,ICD Code\nAnn Lee,P001,Asthma,\n",
        );

        match load_patients(&path) {
            Err(AppError::MissingValue { table, row, column }) => {
                assert_eq!(table, TableKind::Patients);
                assert_eq!(row, 1);
                assert_eq!(column, "ICD Code");
            }
            other => panic!("Expected missing value, got {:?}", other),
        }
    }

    #[test]
    fn test_patient_table_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "patients.csv", "Patient Name,Disease\nAnn Lee,Asthma\n");

        match load_patients(&path) {
            Err(AppError::MissingColumn { column, .. }) => assert_eq!(column, "Patient ID"),
            other => panic!("Expected missing column, got {:?}", other),
        }
    }
}
