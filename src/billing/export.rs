//! CSV export and re-import of the billing summary.
//!
//! Exports carry a header row and every summary column in display order.
//! Missing amounts are written as empty cells.

use crate::billing::loader::{TableReader, read_string_table};
use crate::constants::columns;
use crate::error::Result;
use crate::models::{BillingSummaryRow, TableKind};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Convert summary rows into a frame with the display column set
pub fn summary_frame(rows: &[BillingSummaryRow]) -> Result<DataFrame> {
    let text = |value: fn(&BillingSummaryRow) -> String| rows.iter().map(value).collect::<Vec<_>>();
    let amount =
        |value: fn(&BillingSummaryRow) -> Option<f64>| rows.iter().map(value).collect::<Vec<_>>();

    let frame = DataFrame::new(vec![
        Column::new(columns::PATIENT_NAME.into(), text(|r| r.patient_name.clone())),
        Column::new(columns::PATIENT_ID.into(), text(|r| r.patient_id.clone())),
        Column::new(columns::DISEASE.into(), text(|r| r.disease.clone())),
        Column::new(columns::ICD_CODE.into(), text(|r| r.icd_code.clone())),
        Column::new(columns::ASSIGNED_DOCTOR.into(), text(|r| r.assigned_doctor.clone())),
        Column::new(columns::INSURANCE_COMPANY.into(), text(|r| r.insurance_company.clone())),
        Column::new(columns::DOCTOR_CHARGE.into(), amount(|r| r.doctor_charge)),
        Column::new(columns::INSURANCE_RATE.into(), amount(|r| r.insurance_rate)),
        Column::new(columns::PATIENT_OWES.into(), amount(|r| r.patient_owes)),
    ])?;
    Ok(frame)
}

/// Serialize summary rows as CSV into any writer
pub fn write_summary_csv<W: Write>(rows: &[BillingSummaryRow], writer: W) -> Result<()> {
    let mut frame = summary_frame(rows)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut frame)?;
    Ok(())
}

/// Write summary rows to a CSV file, creating parent directories as needed
pub fn export_summary(rows: &[BillingSummaryRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_summary_csv(rows, &mut writer)?;
    writer.flush()?;

    info!("Exported {} summary rows to {}", rows.len(), path.display());
    Ok(())
}

/// Parse a previously exported summary back into rows
pub fn read_summary_csv(path: &Path) -> Result<Vec<BillingSummaryRow>> {
    let frame = read_string_table(path)?;
    let reader = TableReader::new(TableKind::Summary, path, &frame);

    let column = |name: &'static str| reader.column(name).map(|values| (name, values));
    let name = column(columns::PATIENT_NAME)?;
    let id = column(columns::PATIENT_ID)?;
    let disease = column(columns::DISEASE)?;
    let icd = column(columns::ICD_CODE)?;
    let doctor = column(columns::ASSIGNED_DOCTOR)?;
    let insurer = column(columns::INSURANCE_COMPANY)?;
    let charge = column(columns::DOCTOR_CHARGE)?;
    let rate = column(columns::INSURANCE_RATE)?;
    let owes = column(columns::PATIENT_OWES)?;

    let mut rows = Vec::with_capacity(reader.height());
    for row in 0..reader.height() {
        if reader.is_blank_row(row)? {
            continue;
        }
        rows.push(BillingSummaryRow {
            patient_name: reader.required_cell(name.1, row, name.0)?,
            patient_id: reader.required_cell(id.1, row, id.0)?,
            disease: reader.required_cell(disease.1, row, disease.0)?,
            icd_code: reader.required_cell(icd.1, row, icd.0)?,
            assigned_doctor: reader.required_cell(doctor.1, row, doctor.0)?,
            insurance_company: reader.required_cell(insurer.1, row, insurer.0)?,
            doctor_charge: reader.rate_cell(charge.1, row, charge.0)?,
            insurance_rate: reader.rate_cell(rate.1, row, rate.0)?,
            patient_owes: reader.rate_cell(owes.1, row, owes.0)?,
        });
    }
    Ok(rows)
}
