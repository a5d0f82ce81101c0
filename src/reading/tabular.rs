//! Delimited processor-output tables.
//!
//! These files carry a fixed count of descriptive lines before the column
//! header, sometimes a units line directly under it, and use a numeric code
//! for absent measurements.

use std::path::Path;

use crate::error::{FluxError, Result};
use crate::table::FreqTable;

/// Physical layout of a delimited file.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedFormat {
    /// Lines to discard before the column-header line.
    pub header_skip_rows: usize,
    /// Annotation lines (units) to discard directly after the header.
    pub units_rows: usize,
    /// Numeric code rewritten to missing.
    pub missing_code: f64,
}

/// Loads a delimited file into a table keyed by `key_column`.
///
/// Fields equal to the missing code, empty, or non-numeric become missing.
/// Rows where any column in `required_non_missing` is missing are dropped,
/// as are rows whose key cannot be placed on the index.
pub fn load_delimited(
    path: &Path,
    format: &DelimitedFormat,
    key_column: &str,
    required_non_missing: &[&str],
) -> Result<FreqTable> {
    let (header, rows) = read_records(path, format)?;

    let key_pos = position(&header, key_column)?;
    let required_pos = required_non_missing
        .iter()
        .map(|name| position(&header, name))
        .collect::<Result<Vec<_>>>()?;

    let mut index = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); header.len()];

    'row: for record in &rows {
        let cells: Vec<Option<f64>> = (0..header.len())
            .map(|i| parse_cell(record.get(i), format.missing_code))
            .collect();
        for &pos in &required_pos {
            if cells[pos].is_none() {
                continue 'row;
            }
        }
        let Some(key) = cells[key_pos] else {
            continue;
        };
        index.push(key);
        for (pos, cell) in cells.into_iter().enumerate() {
            columns[pos].push(cell);
        }
    }

    let mut table = FreqTable::with_index(key_column, index);
    for (pos, name) in header.iter().enumerate() {
        if pos == key_pos {
            continue;
        }
        table.add_column(name.clone(), std::mem::take(&mut columns[pos]));
    }
    Ok(table)
}

/// Quality-control selection: keeps rows where `filter_column` parses to
/// exactly `filter_value` and returns their raw `select_column` fields in
/// source row order.
pub fn matching_rows(
    path: &Path,
    format: &DelimitedFormat,
    filter_column: &str,
    filter_value: f64,
    select_column: &str,
) -> Result<Vec<String>> {
    let (header, rows) = read_records(path, format)?;
    let filter_pos = position(&header, filter_column)?;
    let select_pos = position(&header, select_column)?;

    let mut selected = Vec::new();
    for record in &rows {
        if parse_cell(record.get(filter_pos), format.missing_code) == Some(filter_value) {
            if let Some(field) = record.get(select_pos) {
                selected.push(field.trim().to_string());
            }
        }
    }
    Ok(selected)
}

/// Column names of a delimited file.
pub fn header_columns(path: &Path, format: &DelimitedFormat) -> Result<Vec<String>> {
    let (header, _) = read_records(path, format)?;
    Ok(header)
}

fn read_records(
    path: &Path,
    format: &DelimitedFormat,
) -> Result<(Vec<String>, Vec<csv::StringRecord>)> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| FluxError::file_format(path, e))?;

    let mut records = reader.into_records();
    for _ in 0..format.header_skip_rows {
        match records.next() {
            Some(record) => {
                record.map_err(|e| FluxError::file_format(path, e))?;
            }
            None => {
                return Err(FluxError::file_format(
                    path,
                    format!("file has fewer than {} lines", format.header_skip_rows),
                ))
            }
        }
    }

    let header: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| FluxError::file_format(path, e))?
            .iter()
            .map(|field| field.trim().to_string())
            .collect(),
        None => {
            return Err(FluxError::file_format(
                path,
                "no header line after the skipped rows",
            ))
        }
    };

    for _ in 0..format.units_rows {
        if let Some(record) = records.next() {
            record.map_err(|e| FluxError::file_format(path, e))?;
        }
    }

    let mut rows = Vec::new();
    for record in records {
        rows.push(record.map_err(|e| FluxError::file_format(path, e))?);
    }
    Ok((header, rows))
}

fn position(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|column| column == name)
        .ok_or_else(|| FluxError::MissingColumn(name.to_string()))
}

fn parse_cell(field: Option<&str>, missing_code: f64) -> Option<f64> {
    let text = field?.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(value) if value == missing_code => None,
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

// -- Tests ----------------------------------------------------------------------------
