//! Loading row records from spreadsheet, CSV or JSON files.
//!
//! The first row of a worksheet or CSV file is the header. JSON input is an
//! array of objects.

use crate::error::AppError;
use crate::record::{CellValue, Record};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub fn load_records(path: &Path) -> Result<Vec<Record>, AppError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let records = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => {
            return Err(AppError::InputError(format!(
                "{}: unsupported file type '{}'",
                path.display(),
                other
            )))
        }
    };

    log::info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

fn input_error(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::InputError(format!("{}: {}", path.display(), e))
}

// ============================================================================
// Workbooks
// ============================================================================

fn load_workbook(path: &Path) -> Result<Vec<Record>, AppError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| input_error(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| input_error(path, "workbook has no worksheets"))?
        .map_err(|e| input_error(path, e))?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let records = rows
        .map(|row| -> Record {
            header
                .iter()
                .zip(row.iter())
                .filter(|(column, _)| !column.is_empty())
                .map(|(column, cell)| (column.clone(), cell_from_data(cell)))
                .collect()
        })
        .collect();

    Ok(records)
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty | Data::Error(_) => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ============================================================================
// CSV
// ============================================================================

fn load_csv(path: &Path) -> Result<Vec<Record>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| input_error(path, e))?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| input_error(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| input_error(path, e))?;
        let mut record = Record::new();
        for (i, column) in header.iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            let value = match row.get(i) {
                Some(text) if !text.is_empty() => CellValue::Text(text.to_string()),
                _ => CellValue::Missing,
            };
            record.insert(column.clone(), value);
        }
        records.push(record);
    }

    Ok(records)
}

// ============================================================================
// JSON
// ============================================================================

fn load_json(path: &Path) -> Result<Vec<Record>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| input_error(path, e))?;
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&content)
        .map_err(|e| input_error(path, format!("Invalid JSON: {}", e)))?;

    Ok(rows
        .into_iter()
        .map(|row| -> Record {
            row.into_iter()
                .map(|(column, value)| (column, cell_from_json(value)))
                .collect()
        })
        .collect())
}

fn cell_from_json(value: serde_json::Value) -> CellValue {
    use serde_json::Value;

    match value {
        Value::Null => CellValue::Missing,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Int(i),
            None => n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Missing),
        },
        Value::String(s) => CellValue::Text(s),
        other => CellValue::Text(other.to_string()),
    }
}
