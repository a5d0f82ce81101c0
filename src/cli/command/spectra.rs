//! Spectral and cospectral medians over quality-controlled runs.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use glob::glob;

use crate::cli::{create_progress_bar, create_spinner};
use crate::export;
use crate::reading::{load_delimited, matching_rows, DelimitedFormat, MISSING_VALUE};
use crate::summary::median_series;
use crate::table::SeriesCollection;

use super::make_output_file_name;

const QC_COLUMN: &str = "qc_co2_flux";
const FILENAME_COLUMN: &str = "filename";
const FREQUENCY_COLUMN: &str = "natural_frequency";
const SPECTRUM_COLUMN: &str = "f_nat*spec(ts)";
const COSPECTRUM_COLUMN: &str = "f_nat*cospec(w_ts)";
const COSPECTRA_DIR: &str = "eddypro_full_cospectra";

/// The full_output table keeps a units line directly under its header.
const FULL_OUTPUT_FORMAT: DelimitedFormat = DelimitedFormat {
    header_skip_rows: 1,
    units_rows: 1,
    missing_code: MISSING_VALUE,
};

/// Full cospectra files carry twelve descriptive lines before the header.
const COSPECTRA_FORMAT: DelimitedFormat = DelimitedFormat {
    header_skip_rows: 12,
    units_rows: 0,
    missing_code: MISSING_VALUE,
};

pub fn spectra(dir: &Path, out: Option<PathBuf>) -> Result<PathBuf> {
    let good = good_files(dir)?;
    let (spectra, cospectra) = merge_good_files(dir, &good)?;

    let mut medians = SeriesCollection::new();
    medians.insert("spectra_median", median_series(&spectra));
    medians.insert("cospectra_median", median_series(&cospectra));

    let out = out.unwrap_or_else(|| make_output_file_name("spectra", "csv"));
    export::write_collection_csv(&medians, FREQUENCY_COLUMN, &out)?;
    Ok(out)
}

/// Raw-file names of the runs whose CO2 flux passed quality control.
fn good_files(dir: &Path) -> Result<Vec<String>> {
    let pattern = dir.join("*full_output*.csv");
    let full_output = glob(&pattern.to_string_lossy())?
        .next()
        .ok_or_else(|| anyhow!("no full_output file in {}", dir.display()))??;

    let bar = create_spinner("Selecting quality-controlled runs...".to_string());
    let selected = matching_rows(
        &full_output,
        &FULL_OUTPUT_FORMAT,
        QC_COLUMN,
        0.0,
        FILENAME_COLUMN,
    )?;
    bar.finish_with_message(format!("{} quality-controlled runs", selected.len()));

    Ok(selected)
}

/// Loads the cospectra file of every good run and merges the spectrum and
/// cospectrum columns, one run per observation stamp. Runs without a
/// cospectra file are skipped.
fn merge_good_files(
    dir: &Path,
    good: &[String],
) -> Result<(SeriesCollection, SeriesCollection)> {
    let mut spectra = SeriesCollection::new();
    let mut cospectra = SeriesCollection::new();
    let required = [SPECTRUM_COLUMN, COSPECTRUM_COLUMN];

    let bar = create_progress_bar(good.len() as u64, "Merging cospectra files".to_string());
    for raw_name in good {
        bar.inc(1);
        let Some(stamp) = observation_stamp(raw_name) else {
            continue;
        };
        let pattern = dir.join(COSPECTRA_DIR).join(format!("*{stamp}*.csv"));
        let Some(path) = glob(&pattern.to_string_lossy())?.next().transpose()? else {
            continue;
        };

        let table = load_delimited(&path, &COSPECTRA_FORMAT, FREQUENCY_COLUMN, &required)?;
        spectra.insert(stamp.clone(), table.points(SPECTRUM_COLUMN)?);
        cospectra.insert(stamp, table.points(COSPECTRUM_COLUMN)?);
    }
    bar.finish_with_message("Cospectra files merged");

    Ok((spectra, cospectra))
}

/// Derives the `YYYYMMDD-HHMM` stamp embedded in a raw 10 Hz file name,
/// e.g. `site_20190708-1430.csv` gives `20190708-1430`.
fn observation_stamp(raw_name: &str) -> Option<String> {
    let date = raw_name.get(5..13)?;
    let time_start = raw_name.len().checked_sub(8)?;
    let time = raw_name.get(time_start..raw_name.len() - 4)?;
    Some(format!("{date}-{time}"))
}

// -- Tests -------------------------------------------------------------------
