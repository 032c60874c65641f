//! Error type for the file-facing edges of the crate.
//!
//! Reconciliation itself never fails; problems found while reconciling are
//! reported as [`crate::diagnostics::Diagnostic`] values instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to read the delimited file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unable to read the workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Unable to write the workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file opened but its contents are unusable (no sheets, empty sheet).
    #[error("{0}")]
    Spreadsheet(String),

    /// The roster has no column that looks like a supervisor column.
    #[error("No supervisor column found in the roster (headers: {0})")]
    MissingColumn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
