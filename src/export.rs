//! Writing reconciliation results: JSON for callers, the CSV and config the
//! scheduling solver reads, and an Excel workbook for people.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::reconcile::{AvailabilityMatrix, ReconcileReport};

/// Minimum supervisors per defense session expected by the solver.
pub const SOLVER_MIN_SUPERVISORS: usize = 3;
pub const SOLVER_STUDENT_LIMIT: usize = 30;

/// Settings file consumed by the scheduling solver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverConfig {
    #[serde(rename = "C")]
    pub room_capacity: usize,
    #[serde(rename = "D")]
    pub min_supervisors: usize,
    #[serde(rename = "H")]
    pub days: usize,
    #[serde(rename = "M")]
    pub slots_per_day: usize,
    #[serde(rename = "R")]
    pub rooms: usize,
    pub start_date: Option<String>,
    pub limit_stu: usize,
    #[serde(rename = "ALPHA")]
    pub alpha: f64,
    #[serde(rename = "BETA")]
    pub beta: f64,
    #[serde(rename = "GAMMA")]
    pub gamma: f64,
}

impl SolverConfig {
    pub fn from_matrix(matrix: &AvailabilityMatrix) -> Self {
        Self {
            room_capacity: matrix.room_capacity,
            min_supervisors: SOLVER_MIN_SUPERVISORS,
            days: matrix.day_count,
            slots_per_day: matrix.slots_per_day,
            rooms: matrix.rooms,
            start_date: Some(matrix.start_date.clone()),
            limit_stu: SOLVER_STUDENT_LIMIT,
            alpha: 0.0,
            beta: 0.5,
            gamma: 0.5,
        }
    }
}

pub fn write_report_json<W: Write>(report: &ReconcileReport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn write_matrix_json(matrix: &AvailabilityMatrix, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, matrix)?;
    Ok(())
}

pub fn write_solver_config(config: &SolverConfig, path: &Path) -> Result<()> {
    fs::write(path, serde_json::to_vec(config)?)?;
    Ok(())
}

/// One line per supervisor: the quoted name, then every slot as 0 or 1.
/// No header row.
pub fn write_preferences_csv<W: Write>(matrix: &AvailabilityMatrix, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(writer);

    for (name, values) in matrix.supervisors.iter().zip(&matrix.preferences) {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(name.clone());
        record.extend(values.iter().map(u8::to_string));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_preferences_csv(matrix: &AvailabilityMatrix, path: &Path) -> Result<()> {
    write_preferences_csv(matrix, BufWriter::new(File::create(path)?))
}

fn build_matrix_headers(matrix: &AvailabilityMatrix) -> Vec<String> {
    let mut headers = Vec::with_capacity(matrix.days.len() * matrix.slots.len() + 2);
    headers.push("Supervisor".into());
    for day in &matrix.days {
        for slot in &matrix.slots {
            headers.push(format!("{day} {slot}"));
        }
    }
    headers.push("Available".into());
    headers
}

/// Workbook with an `Availability` sheet (supervisors by day/slot, plus a
/// per-supervisor total) and a `Diagnostics` sheet.
pub fn build_matrix_workbook(
    matrix: &AvailabilityMatrix,
    diagnostics: &[Diagnostic],
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Availability")?;

    let headers = build_matrix_headers(matrix);
    for (col_index, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, column_index(col_index)?, header, &header_format)?;
    }
    sheet.set_column_width(0, 32)?;

    let slot_count = headers.len() - 2;
    let total_col = column_index(slot_count + 1)?;
    for (row_index, (name, values)) in matrix
        .supervisors
        .iter()
        .zip(&matrix.preferences)
        .enumerate()
    {
        let row = sheet_row(row_index + 1)?;
        sheet.write_string(row, 0, name)?;
        for (offset, value) in values.iter().enumerate() {
            sheet.write_number(row, column_index(offset + 1)?, f64::from(*value))?;
        }
        if slot_count > 0 {
            let formula = format!(
                "=SUM({}:{})",
                excel_cell_reference(row, 1),
                excel_cell_reference(row, u32::from(total_col) - 1)
            );
            sheet.write_formula(row, total_col, formula.as_str())?;
        }
    }

    let diagnostics_sheet = workbook.add_worksheet();
    diagnostics_sheet.set_name("Diagnostics")?;
    diagnostics_sheet.write_string_with_format(0, 0, "Message", &header_format)?;
    diagnostics_sheet.set_column_width(0, 100)?;
    for (row_index, diagnostic) in diagnostics.iter().enumerate() {
        diagnostics_sheet.write_string(sheet_row(row_index + 1)?, 0, diagnostic.to_string())?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn save_matrix_workbook(
    matrix: &AvailabilityMatrix,
    diagnostics: &[Diagnostic],
    path: &Path,
) -> Result<()> {
    fs::write(path, build_matrix_workbook(matrix, diagnostics)?)?;
    Ok(())
}

fn column_index(index: usize) -> Result<u16> {
    u16::try_from(index).map_err(|_| {
        Error::InvalidInput(format!("Column {index} does not fit in a worksheet."))
    })
}

fn sheet_row(index: usize) -> Result<u32> {
    u32::try_from(index)
        .map_err(|_| Error::InvalidInput(format!("Row {index} does not fit in a worksheet.")))
}

fn excel_column_name(mut index: u32) -> String {
    let mut name = String::new();
    loop {
        let remainder = index % 26;
        name.push((b'A' + remainder as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.chars().rev().collect()
}

fn excel_cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", excel_column_name(col), row + 1)
}
