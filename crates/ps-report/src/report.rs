//! Report rows, header and CSV rendering

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use ps_core::format::format_ps_number;
use ps_core::{FilterSpec, ServiceOrder};

use crate::currency::format_brl;
use crate::ReportError;

pub const REPORT_TITLE: &str = "Relatório de Controle de PS - BFLa";

/// Column headings, in output order
pub const REPORT_COLUMNS: [&str; 6] = ["PS #", "OM", "Descrição", "Oficina", "Status", "Valor"];

/// One report line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub ps_number: String,
    pub organization: String,
    pub description: String,
    pub workshop: String,
    pub status: String,
    pub value: String,
}

impl ReportRow {
    pub fn from_order(order: &ServiceOrder, today: NaiveDate) -> Self {
        Self {
            ps_number: format_ps_number(order.sequence_number, order.entry_date, today),
            organization: order.organization.clone(),
            description: order.description.clone(),
            workshop: order.workshop.clone(),
            status: order.status.clone(),
            value: format_brl(order.budget_value),
        }
    }
}

/// Project filtered records onto report rows
pub fn report_rows(records: &[ServiceOrder], today: NaiveDate) -> Vec<ReportRow> {
    records.iter().map(|order| ReportRow::from_order(order, today)).collect()
}

/// Title block printed above the table
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHeader {
    pub title: String,
    pub generated_at: NaiveDateTime,
    pub filters: String,
}

impl ReportHeader {
    pub fn new(filter: &FilterSpec, generated_at: NaiveDateTime) -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            filters: filter.describe(),
        }
    }

    pub fn generated_line(&self) -> String {
        format!("Gerado em: {}", self.generated_at.format("%d/%m/%Y, %H:%M:%S"))
    }

    pub fn filters_line(&self) -> String {
        format!("Filtros: {}", self.filters)
    }

    /// `Relatorio_PS_BFLa_<epoch millis>.csv`
    pub fn file_name(&self) -> String {
        format!("Relatorio_PS_BFLa_{}.csv", self.generated_at.and_utc().timestamp_millis())
    }
}

/// Render the header block followed by the table. An empty row set is refused.
pub fn write_report<W: Write>(writer: W, header: &ReportHeader, rows: &[ReportRow]) -> Result<(), ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoData);
    }

    let mut csv = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(writer);

    csv.write_record([header.title.as_str()])?;
    csv.write_record([header.generated_line()])?;
    csv.write_record([header.filters_line()])?;
    csv.write_record(REPORT_COLUMNS)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the report into `dir` under the header's file name
pub fn write_report_file(dir: &Path, header: &ReportHeader, rows: &[ReportRow]) -> Result<PathBuf, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoData);
    }
    std::fs::create_dir_all(dir)?;
    let path = dir.join(header.file_name());
    write_report(File::create(&path)?, header, rows)?;

    info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(path)
}
