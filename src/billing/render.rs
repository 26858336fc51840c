//! Terminal rendering for the billing dashboard: source tables, summary
//! statistics and text charts.

use crate::billing::loader::DoctorCharges;
use crate::constants::{SUMMARY_COLUMNS, columns};
use crate::error::Result;
use crate::models::{BillingSummaryRow, InsuranceRateRow, SummaryTotals};
use polars::prelude::*;
use std::fmt::Write;

const BAR: char = '█';
const NEGATIVE_BAR: char = '░';

/// Doctor charges as a frame, one rate column per doctor
pub fn doctor_charges_frame(charges: &DoctorCharges) -> Result<DataFrame> {
    let mut frame_columns = vec![
        Column::new(
            columns::DISEASE_NAME.into(),
            charges.rows.iter().map(|r| r.disease.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            columns::ICD_CODE.into(),
            charges.rows.iter().map(|r| r.icd_code.clone()).collect::<Vec<_>>(),
        ),
    ];
    for doctor in &charges.doctors {
        let rates: Vec<Option<f64>> = charges
            .rows
            .iter()
            .map(|r| r.rates.get(doctor).copied().flatten())
            .collect();
        frame_columns.push(Column::new(format!("Doctor {} Rate ($)", doctor).into(), rates));
    }
    Ok(DataFrame::new(frame_columns)?)
}

/// Insurance rates in long form: one row per diagnosis and insurer
pub fn insurance_rates_frame(rates: &[InsuranceRateRow]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Column::new(
            columns::DISEASE_NAME.into(),
            rates.iter().map(|r| r.disease.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            columns::ICD_CODE.into(),
            rates.iter().map(|r| r.icd_code.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            columns::INSURANCE_COMPANY.into(),
            rates.iter().map(|r| r.insurance_company.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Covered Rate ($)".into(),
            rates.iter().map(|r| r.covered_rate).collect::<Vec<_>>(),
        ),
    ])?)
}

/// Aligned text table of the summary; missing amounts show as `n/a`
pub fn summary_table(rows: &[BillingSummaryRow]) -> String {
    let amount = |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), format_currency);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.patient_name.clone(),
                r.patient_id.clone(),
                r.disease.clone(),
                r.icd_code.clone(),
                r.assigned_doctor.clone(),
                r.insurance_company.clone(),
                amount(r.doctor_charge),
                amount(r.insurance_rate),
                amount(r.patient_owes),
            ]
        })
        .collect();
    text_table(SUMMARY_COLUMNS, &cells)
}

fn text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };

    let mut out = render_row(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("|-{}-|\n", rule.join("-|-")));
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str).collect()));
    }
    out
}

/// `$1,234.56`, with a leading `-` for negative amounts
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

pub fn format_totals(totals: &SummaryTotals) -> String {
    format!(
        "Total Billed: {}\nTotal Covered (Insurance): {}\nTotal Unpaid (Patients): {}\n",
        format_currency(totals.total_billed),
        format_currency(totals.total_covered),
        format_currency(totals.total_unpaid)
    )
}

/// Horizontal bar chart of what each patient owes, scaled to `width`
pub fn patient_responsibility_chart(rows: &[BillingSummaryRow], width: usize) -> String {
    let label_width = label_width(rows);
    let max = rows
        .iter()
        .filter_map(|r| r.patient_owes)
        .map(f64::abs)
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for row in rows {
        let (bar_text, label) = match row.patient_owes {
            Some(owes) => {
                let fill = if owes < 0.0 { NEGATIVE_BAR } else { BAR };
                (bar(owes.abs(), max, width, fill), format_currency(owes))
            }
            None => (String::new(), "n/a".to_string()),
        };
        let _ = writeln!(
            out,
            "{:<label_width$} | {:<width$} {}",
            row.patient_name, bar_text, label
        );
    }
    out
}

/// Share of the total doctor charge attributed to each patient
pub fn charge_distribution_chart(rows: &[BillingSummaryRow], width: usize) -> String {
    let total: f64 = rows.iter().filter_map(|r| r.doctor_charge).sum();
    if total <= 0.0 {
        return "No doctor charges to chart.\n".to_string();
    }

    let label_width = label_width(rows);
    let mut out = String::new();
    for row in rows {
        let line = match row.doctor_charge {
            Some(charge) => format!(
                "{:<width$} {:>5.1}% ({})",
                bar(charge, total, width, BAR),
                charge / total * 100.0,
                format_currency(charge)
            ),
            None => format!("{:<width$} n/a", ""),
        };
        let _ = writeln!(out, "{:<label_width$} | {}", row.patient_name, line);
    }
    out
}

fn label_width(rows: &[BillingSummaryRow]) -> usize {
    rows.iter()
        .map(|r| r.patient_name.chars().count())
        .max()
        .unwrap_or(0)
}

fn bar(value: f64, max: f64, width: usize, fill: char) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * width as f64).round() as usize;
    std::iter::repeat_n(fill, len.min(width)).collect()
}
