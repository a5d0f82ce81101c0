//! Time-binned ensemble cospectra.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::export;
use crate::reading::{header_columns, load_delimited, DelimitedFormat, MISSING_VALUE};
use crate::table::FreqTable;

use super::make_output_file_name;

/// The ensemble file keeps three description lines above its header.
const ENSEMBLE_FORMAT: DelimitedFormat = DelimitedFormat {
    header_skip_rows: 3,
    units_rows: 0,
    missing_code: MISSING_VALUE,
};

pub fn ensemble(file: &Path, cospectra: &str, out: Option<PathBuf>) -> Result<PathBuf> {
    let table = load_ensemble(file, cospectra)?;
    if table.columns().is_empty() {
        eprintln!(
            "warning: no columns matched `{}` in {}",
            cospectra,
            file.display()
        );
    }

    let out = out.unwrap_or_else(|| make_output_file_name("ensemble", "csv"));
    export::write_table_csv(&table, &out)?;
    Ok(out)
}

/// Loads the ensemble table, keyed by its leading frequency column, and
/// keeps the time-bin columns carrying the requested cospectra label.
fn load_ensemble(file: &Path, cospectra: &str) -> Result<FreqTable> {
    let header = header_columns(file, &ENSEMBLE_FORMAT)?;
    let key = header
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("empty header in {}", file.display()))?;
    let table = load_delimited(file, &ENSEMBLE_FORMAT, &key, &[])?;

    let mut selected = FreqTable::with_index(table.index_name(), table.index().to_vec());
    for column in table.columns() {
        if column.name.contains(cospectra) {
            selected.add_column(column.name.clone(), column.values.clone());
        }
    }
    Ok(selected)
}

// -- Tests -------------------------------------------------------------------
