//! Ogive accumulation curves merged across runs.

use std::path::{Path, PathBuf};

use anyhow::Result;
use glob::glob;

use crate::cli::create_progress_bar;
use crate::export;
use crate::reading::{load_delimited, DelimitedFormat, MISSING_VALUE};
use crate::summary::quantile_band;
use crate::table::SeriesCollection;

use super::make_output_file_name;

const OGIVE_PATTERN: &str = "*binned_ogives*.csv";
const FREQUENCY_COLUMN: &str = "natural_frequency";

/// Binned ogive files carry eleven descriptive lines before the header.
const OGIVE_FORMAT: DelimitedFormat = DelimitedFormat {
    header_skip_rows: 11,
    units_rows: 0,
    missing_code: MISSING_VALUE,
};

pub fn ogives(
    dir: &Path,
    ogive: &str,
    low: f64,
    high: f64,
    out: Option<PathBuf>,
) -> Result<PathBuf> {
    let collection = build_collection(dir, ogive)?;
    if collection.is_empty() {
        eprintln!("warning: no ogive files found in {}", dir.display());
    }

    let band = quantile_band(&collection, low, high)?;

    let out = out.unwrap_or_else(|| make_output_file_name("ogives", "csv"));
    export::write_band_csv(&band, FREQUENCY_COLUMN, &out)?;
    Ok(out)
}

/// Merges the requested ogive column of every binned-ogives file, one run
/// per file labelled with its observation timestamp.
fn build_collection(dir: &Path, ogive: &str) -> Result<SeriesCollection> {
    let pattern = dir.join(OGIVE_PATTERN);
    let paths: Vec<PathBuf> =
        glob(&pattern.to_string_lossy())?.collect::<Result<_, _>>()?;

    let mut collection = SeriesCollection::new();
    let bar = create_progress_bar(paths.len() as u64, "Merging ogive files".to_string());
    for path in &paths {
        let table = load_delimited(path, &OGIVE_FORMAT, FREQUENCY_COLUMN, &[ogive])?;
        collection.insert(run_label(path), table.points(ogive)?);
        bar.inc(1);
    }
    bar.finish_with_message("Ogive files merged");

    Ok(collection)
}

/// Run label: the observation-timestamp prefix of the file stem.
fn run_label(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    stem.chars().take(13).collect()
}

// -- Tests -------------------------------------------------------------------
