//! Reading roster and availability files (delimited text or Excel workbooks).

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, DataType, Reader};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::grid::GRID_CATALOG;
use crate::reconcile::AvailabilityRow;
use crate::roster::{Roster, RosterRow};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb"];

/// Header labels (alphanumeric, lowercase) recognised as the supervisor column.
const SUPERVISOR_HEADERS: &[&str] = &[
    "pembimbing",
    "dosenpembimbing",
    "supervisor",
    "supervisorname",
    "advisor",
    "advisorname",
];

/// Reads a roster with a header row. `supervisor_column` overrides header
/// detection and is compared case-insensitively.
pub fn read_roster(path: &Path, supervisor_column: Option<&str>) -> Result<Roster> {
    let (headers, rows) = read_table(path, true)?;
    let roster = roster_from_table(headers, rows, supervisor_column)?;
    info!(
        "Read {} roster rows from {} (supervisor column '{}')",
        roster.rows.len(),
        path.display(),
        roster.supervisor_header
    );
    Ok(roster)
}

/// Builds a roster from already-read headers and rows.
pub fn roster_from_table(
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    supervisor_column: Option<&str>,
) -> Result<Roster> {
    let column = find_supervisor_column(&headers, supervisor_column)?;

    let passthrough_headers = headers
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != column)
        .map(|(_, header)| header.clone())
        .collect();

    let rows = rows
        .into_iter()
        .map(|mut values| {
            let supervisor = if column < values.len() {
                values.remove(column)
            } else {
                String::new()
            };
            RosterRow::with_passthrough(supervisor, values)
        })
        .collect();

    Ok(Roster {
        supervisor_header: headers[column].clone(),
        passthrough_headers,
        rows,
    })
}

pub fn find_supervisor_column(headers: &[String], requested: Option<&str>) -> Result<usize> {
    if let Some(requested) = requested.map(str::trim).filter(|value| !value.is_empty()) {
        let target = normalize_identifier_label(requested);
        return headers
            .iter()
            .position(|header| {
                header.trim().eq_ignore_ascii_case(requested)
                    || normalize_identifier_label(header) == target
            })
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "The roster has no column named '{requested}'. Available columns: {}",
                    headers.join(", ")
                ))
            });
    }

    headers
        .iter()
        .position(|header| SUPERVISOR_HEADERS.contains(&normalize_identifier_label(header).as_str()))
        .ok_or_else(|| Error::MissingColumn(headers.join(", ")))
}

/// Reads an availability file: a name column followed by 0/1 columns.
pub fn read_availability(path: &Path) -> Result<Vec<AvailabilityRow>> {
    let rows = if is_workbook(path) {
        let (_, rows) = read_excel_table(path, false)?;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        rows.into_iter()
            .map(|row| trim_range_padding(row, width))
            .collect::<Vec<_>>()
    } else {
        let raw = fs::read(path)?;
        read_delimited_text(&String::from_utf8_lossy(&raw))?
    };

    let availability = availability_from_rows(rows);
    info!(
        "Read {} availability rows from {}",
        availability.len(),
        path.display()
    );
    Ok(availability)
}

/// Parses availability text in memory; see [`read_availability`].
pub fn parse_availability_text(text: &str) -> Result<Vec<AvailabilityRow>> {
    Ok(availability_from_rows(read_delimited_text(text)?))
}

/// Undoes the padding a worksheet range adds to rows shorter than `width`.
///
/// Trailing blank cells are dropped. When the remaining value count is not a
/// catalog grid size, the row is padded back with blanks up to the smallest
/// catalog size that fits within the range, so a supervisor who left their
/// last slots empty keeps the grid they filled in.
fn trim_range_padding(mut row: Vec<String>, width: usize) -> Vec<String> {
    while row.len() > 1 && row.last().is_some_and(|cell| cell.is_empty()) {
        row.pop();
    }

    let values = row.len().saturating_sub(1);
    if values == 0 || is_catalog_size(values) {
        return row;
    }

    let widest = width.saturating_sub(1);
    let restored = GRID_CATALOG
        .iter()
        .map(|shape| shape.total_slots())
        .filter(|total| *total > values && *total <= widest)
        .min()
        .unwrap_or(widest);
    if restored > values {
        row.resize(restored + 1, String::new());
    }
    row
}

fn is_catalog_size(values: usize) -> bool {
    GRID_CATALOG.iter().any(|shape| shape.total_slots() == values)
}

fn availability_from_rows(rows: Vec<Vec<String>>) -> Vec<AvailabilityRow> {
    let skip = usize::from(looks_like_header(&rows));
    if skip == 1 {
        debug!("Skipping availability header row: {:?}", rows[0]);
    }

    rows.into_iter()
        .skip(skip)
        .filter_map(|row| AvailabilityRow::from_cells(row.as_slice()))
        .collect()
}

/// The first row is a header when there is more than one row and any of its
/// value cells is something other than `0` or `1`.
fn looks_like_header(rows: &[Vec<String>]) -> bool {
    rows.len() > 1
        && rows[0]
            .iter()
            .skip(1)
            .any(|cell| cell != "0" && cell != "1")
}

fn read_delimited_text(text: &str) -> Result<Vec<Vec<String>>> {
    let text = text.trim_start_matches('\u{feff}').replace('\r', "");
    let delimiter = sniff_delimiter(text.lines());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let values: Vec<String> = record.iter().map(|value| value.trim().to_string()).collect();
        if values.iter().all(|value| value.is_empty()) {
            continue;
        }
        rows.push(values);
    }

    Ok(rows)
}

/// Reads the first sheet of a workbook, or a delimited file, as text cells.
/// With `has_headers` the first non-blank row is returned separately.
pub fn read_table(path: &Path, has_headers: bool) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    if is_workbook(path) {
        read_excel_table(path, has_headers)
    } else {
        read_delimited_table(path, has_headers)
    }
}

fn is_workbook(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    WORKBOOK_EXTENSIONS.contains(&extension.as_str())
}

fn read_delimited_table(path: &Path, has_headers: bool) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let raw = fs::read(path)?;
    let mut rows = read_delimited_text(&String::from_utf8_lossy(&raw))?;

    let mut headers = if has_headers && !rows.is_empty() {
        rows.remove(0)
    } else {
        Vec::new()
    };

    align_row_lengths(&mut headers, &mut rows);
    Ok((headers, rows))
}

fn read_excel_table(path: &Path, has_headers: bool) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Spreadsheet("The workbook does not contain any worksheets.".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| {
            Error::Spreadsheet(format!("Unable to read the worksheet named '{sheet_name}'."))
        })??;

    let mut rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|values| values.iter().any(|value| !value.is_empty()))
        .collect();

    let mut headers = Vec::new();
    if has_headers {
        if rows.is_empty() {
            return Err(Error::Spreadsheet("The worksheet is empty.".into()));
        }
        headers = rows.remove(0);
        align_row_lengths(&mut headers, &mut rows);
    }

    Ok((headers, rows))
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        _ => cell.to_string().trim().to_string(),
    }
}

/// Pads short rows (and headers) to the widest row.
fn align_row_lengths(headers: &mut Vec<String>, rows: &mut [Vec<String>]) {
    let column_count = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(headers.len());

    if !headers.is_empty() {
        headers.resize(column_count, String::new());
    }

    for row in rows.iter_mut() {
        row.resize(column_count, String::new());
    }
}

/// Picks tab, comma or semicolon from the first few non-blank lines.
fn sniff_delimiter<'a>(lines: impl Iterator<Item = &'a str>) -> u8 {
    for line in lines.take(5) {
        if line.trim().is_empty() {
            continue;
        }

        let counts = [
            (b'\t', line.matches('\t').count()),
            (b',', line.matches(',').count()),
            (b';', line.matches(';').count()),
        ];

        if let Some((delimiter, count)) = counts.iter().max_by_key(|(_, count)| *count) {
            if *count > 0 {
                return *delimiter;
            }
        }
    }

    b','
}

fn normalize_identifier_label(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn finds_supervisor_column_by_label() {
        let headers = strings(&["NIM", "Nama", "Dosen Pembimbing", "Jenis"]);
        assert_eq!(find_supervisor_column(&headers, None).unwrap(), 2);
        let headers = strings(&["Student", "Supervisor"]);
        assert_eq!(find_supervisor_column(&headers, None).unwrap(), 1);
    }

    #[test]
    fn explicit_column_overrides_detection() {
        let headers = strings(&["Student", "Supervisor", "Lecturer"]);
        assert_eq!(find_supervisor_column(&headers, Some("lecturer")).unwrap(), 2);
        assert!(matches!(
            find_supervisor_column(&headers, Some("Examiner")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_supervisor_column_is_an_error() {
        let headers = strings(&["Student", "Program"]);
        assert!(matches!(
            find_supervisor_column(&headers, None),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn roster_rows_split_supervisor_from_passthrough() {
        let roster = roster_from_table(
            strings(&["NIM", "PEMBIMBING", "Nama"]),
            vec![strings(&["2101", "Dr. Ahmad", "Ani"]), strings(&["2102", "", "Bayu"])],
            None,
        )
        .unwrap();
        assert_eq!(roster.supervisor_header, "PEMBIMBING");
        assert_eq!(roster.passthrough_headers, strings(&["NIM", "Nama"]));
        assert_eq!(roster.rows[0].supervisor, "Dr. Ahmad");
        assert_eq!(roster.rows[1].supervisor, "");
        assert_eq!(roster.rows[1].passthrough, strings(&["2102", "Bayu"]));
    }

    #[test]
    fn availability_csv_handles_quotes_bom_and_headers() {
        let text = "\u{feff}Nama,S1,S2,S3\r\n\"Santoso, Ahmad\",1,0,1\r\n\r\nBudi,0,1,1\n";
        let rows = parse_availability_text(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].raw_name, "Santoso, Ahmad");
        assert_eq!(rows[0].values, vec![1, 0, 1]);
        assert_eq!(rows[1].values, vec![0, 1, 1]);
    }

    #[test]
    fn availability_without_header_keeps_first_row() {
        let rows = parse_availability_text("Ahmad,1,0\nBudi,0,1\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].raw_name, "Ahmad");
    }

    #[test]
    fn single_row_is_never_treated_as_header() {
        let rows = parse_availability_text("Ahmad,x,1\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values, vec![0, 1]);
    }

    #[test]
    fn sniffs_tabs_and_semicolons() {
        assert_eq!(sniff_delimiter(["a\tb\tc"].into_iter()), b'\t');
        assert_eq!(sniff_delimiter(["", "a;b;c"].into_iter()), b';');
        assert_eq!(sniff_delimiter(["plain"].into_iter()), b',');
    }

    #[test]
    fn range_padding_is_trimmed_to_the_filled_grid() {
        let mut short = strings(&["Ahmad"]);
        short.extend(std::iter::repeat("1".to_string()).take(49));
        short.extend(std::iter::repeat(String::new()).take(14));
        assert_eq!(trim_range_padding(short, 64).len(), 50);

        let mut blank_tail = strings(&["Budi"]);
        blank_tail.extend(std::iter::repeat("1".to_string()).take(60));
        blank_tail.extend(std::iter::repeat(String::new()).take(3));
        assert_eq!(trim_range_padding(blank_tail.clone(), 64).len(), 64);
        assert_eq!(trim_range_padding(blank_tail, 73).len(), 64);
    }

    #[test]
    fn odd_widths_keep_the_range_width() {
        let row = strings(&["Sri", "1", "0", "", ""]);
        assert_eq!(trim_range_padding(row, 5).len(), 5);
        let row = strings(&["Sri", "", ""]);
        assert_eq!(trim_range_padding(row, 3), strings(&["Sri"]));
    }

    #[test]
    fn aligns_ragged_rows() {
        let mut headers = strings(&["a", "b"]);
        let mut rows = vec![strings(&["1"]), strings(&["1", "2", "3"])];
        align_row_lengths(&mut headers, &mut rows);
        assert_eq!(headers.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 3));
    }
}
