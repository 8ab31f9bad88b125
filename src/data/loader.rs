use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::error::EngineError;
use super::filter::{parse_temporal, ParseStage};
use super::model::{CellValue, Column, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from an uploaded file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`          – delimited text with a header row
/// * `.xls` / `.xlsx` – spreadsheet, first worksheet
///
/// Anything else is rejected up front with
/// [`EngineError::UnsupportedFileType`].  Date parsing is attempted on load:
/// cells that look like timestamps come back typed, so a clean file needs no
/// further coercion.
pub fn load_file(path: &Path) -> Result<Table, EngineError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)?;
            read_csv(file)
        }
        "xls" | "xlsx" => load_spreadsheet(path),
        other => Err(EngineError::UnsupportedFileType {
            extension: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Cell typing
// ---------------------------------------------------------------------------

/// Type a raw text cell: empty → null, then number, then the datetime
/// formats, otherwise text.
fn guess_cell(s: &str) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return CellValue::Number(n);
    }
    match parse_temporal(trimmed) {
        (Some(ts), ParseStage::Strict | ParseStage::Loose) => CellValue::Timestamp(ts),
        _ => CellValue::Text(trimmed.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV table from any reader.  First row is the header; a
/// headers-only file yields a zero-row table with the full schema.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, EngineError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| EngineError::Malformed(format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        return Err(EngineError::Malformed("CSV has no header row".into()));
    }

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in rdr.records().enumerate() {
        let record =
            result.map_err(|e| EngineError::Malformed(format!("CSV row {row_no}: {e}")))?;
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(guess_cell(record.get(col_idx).unwrap_or("")));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::from_values(name, values))
        .collect();

    Ok(Table::new(columns))
}

// ---------------------------------------------------------------------------
// Spreadsheet loader (.xls / .xlsx)
// ---------------------------------------------------------------------------

/// Read the first worksheet of an Excel workbook.  The first row is taken as
/// the header; missing header cells get positional names.
fn load_spreadsheet(path: &Path) -> Result<Table, EngineError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| EngineError::Malformed(format!("opening workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| EngineError::Malformed("workbook has no sheets".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| EngineError::Malformed(format!("reading sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => format!("column_{i}"),
                other => other.to_string().trim().to_string(),
            })
            .collect(),
        None => return Err(EngineError::Malformed("sheet is empty".into())),
    };

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            let value = row.get(col_idx).unwrap_or(&Data::Empty);
            column.push(spreadsheet_cell(value));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::from_values(name, values))
        .collect();

    Ok(Table::new(columns))
}

fn spreadsheet_cell(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => CellValue::Timestamp(ts),
            None => CellValue::Null,
        },
        Data::DateTimeIso(s) => match parse_temporal(s) {
            (Some(ts), _) => CellValue::Timestamp(ts),
            _ => CellValue::Text(s.clone()),
        },
        Data::String(s) => guess_cell(s),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{e:?}")),
    }
}
