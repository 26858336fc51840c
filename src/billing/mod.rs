//! Billing dashboard pipeline.
//!
//! Table loader → joiner/derivor → filtered view → renderer → CSV export.
//! Everything here is synchronous and works on small in-memory tables.

pub mod export;
pub mod loader;
pub mod render;
pub mod summary;
pub mod view;

pub use export::{export_summary, read_summary_csv, summary_frame, write_summary_csv};
pub use loader::{DoctorCharges, load_doctor_charges, load_insurance_rates, load_patients};
pub use summary::{BillingTables, assign_defaults, build_summary};
pub use view::{SummaryField, SummaryFilter, filter_options, totals};

use crate::config::BillingConfig;
use crate::error::Result;
use crate::models::BillingSummaryRow;
use tracing::info;

/// Source tables together with the summary derived from them
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub tables: BillingTables,
    pub summary: Vec<BillingSummaryRow>,
}

impl Dashboard {
    pub fn build(tables: BillingTables, config: &BillingConfig) -> Result<Self> {
        let summary = build_summary(&tables, config)?;
        info!(
            "Billing summary ready: {} patients, {} diagnoses, {} insurance rates",
            summary.len(),
            tables.doctor_charges.rows.len(),
            tables.insurance_rates.len()
        );
        Ok(Self { tables, summary })
    }

    /// Summary rows passing the filter
    pub fn view(&self, filter: &SummaryFilter) -> Vec<BillingSummaryRow> {
        filter.apply(&self.summary)
    }
}
