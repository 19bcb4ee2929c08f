//! Report export for the PS control dashboard
//!
//! Projects the filtered service orders onto the six report columns and
//! renders them, under a title and filter header, as CSV.

pub mod currency;
pub mod report;

use thiserror::Error;

pub use currency::format_brl;
pub use report::{report_rows, write_report, write_report_file, ReportHeader, ReportRow, REPORT_COLUMNS};

/// Errors from report export
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No records to export")]
    NoData,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
