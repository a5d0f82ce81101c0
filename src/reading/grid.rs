//! Gridded netCDF time-series archives.
//!
//! An archive must carry a `time` dimension and a CF-style `time`
//! coordinate variable (`units = "<unit> since <epoch>"`). Every other
//! dimension is treated as spatial and flattened away: the loaded table has
//! one row per (time, cell) pair, and spatial coordinates come along as
//! ordinary columns.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use glob::glob;

use crate::cli::create_progress_bar;
use crate::error::{FluxError, Result};
use crate::table::TimeTable;

use super::MISSING_VALUE;

/// Loads one archive into a flat time-keyed table.
pub fn load_grid(path: &Path) -> Result<TimeTable> {
    let file = netcdf::open(path).map_err(|e| FluxError::file_format(path, e))?;

    if file.dimension("time").is_none() {
        return Err(FluxError::file_format(path, "no `time` dimension"));
    }
    let times = read_time_axis(&file, path)?;
    let time_len = times.len();

    let spatial = spatial_dims(&file);
    let cells: usize = spatial.iter().map(|(_, len)| len).product();

    // One row per (time, cell) pair, time-major like the on-disk layout.
    let mut index = Vec::with_capacity(time_len * cells);
    for &t in &times {
        index.extend(std::iter::repeat(t).take(cells));
    }
    let mut table = TimeTable::with_index("time", index);

    // Spatial coordinates become plain columns, repeated for every timestamp.
    for (pos, (dim_name, dim_len)) in spatial.iter().enumerate() {
        let Some(var) = file.variable(dim_name) else {
            continue;
        };
        let Ok(coords) = var.get_values::<f64, _>(..) else {
            continue;
        };
        if coords.len() != *dim_len {
            continue;
        }
        let stride: usize = spatial[pos + 1..].iter().map(|(_, len)| len).product();
        let values = (0..time_len * cells)
            .map(|row| clean(coords[(row % cells / stride) % dim_len]))
            .collect();
        table.add_column(dim_name.clone(), values);
    }

    for var in file.variables() {
        let name = var.name();
        if name == "time" || spatial.iter().any(|(dim, _)| *dim == name) {
            continue;
        }
        let dims = var.dimensions();
        if dims.first().map(|d| d.name()).as_deref() != Some("time") {
            continue;
        }
        let gridded = dims.len() == spatial.len() + 1
            && dims
                .iter()
                .skip(1)
                .zip(&spatial)
                .all(|(d, (dim, len))| d.name() == *dim && d.len() == *len);
        if dims.len() != 1 && !gridded {
            return Err(FluxError::file_format(
                path,
                format!("variable `{name}` has unexpected dimensions"),
            ));
        }
        let Ok(raw) = var.get_values::<f64, _>(..) else {
            continue; // non-numeric variable
        };
        let values: Vec<Option<f64>> = if dims.len() == 1 {
            // dimensioned by time alone: repeat across cells
            raw.iter()
                .flat_map(|&v| std::iter::repeat(clean(v)).take(cells))
                .collect()
        } else {
            raw.iter().map(|&v| clean(v)).collect()
        };
        if values.len() != time_len * cells {
            return Err(FluxError::file_format(
                path,
                format!("variable `{name}` has unexpected length"),
            ));
        }
        table.add_column(name, values);
    }

    Ok(table)
}

/// Loads every archive matching `pattern` under `dir` and concatenates them
/// into one table sorted ascending by timestamp. Glob enumeration order is
/// filesystem dependent, so the sort is what establishes chronology; equal
/// timestamps keep the order the files arrived in.
pub fn concat_grids(dir: &Path, pattern: &str) -> Result<TimeTable> {
    let full_pattern = dir.join(pattern);
    let paths: Vec<_> =
        glob(&full_pattern.to_string_lossy())?.collect::<Result<Vec<_>, _>>()?;

    let mut table = TimeTable::new("time");
    let bar = create_progress_bar(paths.len() as u64, "Loading archives".to_string());
    for path in &paths {
        table.append(load_grid(path)?);
        bar.inc(1);
    }
    bar.finish_with_message("Archives loaded");

    table.sort_by_index();
    Ok(table)
}

fn clean(value: f64) -> Option<f64> {
    if value == MISSING_VALUE || !value.is_finite() {
        None
    } else {
        Some(value)
    }
}

/// Non-time dimensions of the file's time-series variables, in order of
/// first appearance.
fn spatial_dims(file: &netcdf::File) -> Vec<(String, usize)> {
    let mut spatial: Vec<(String, usize)> = Vec::new();
    for var in file.variables() {
        let dims = var.dimensions();
        if dims.first().map(|d| d.name()).as_deref() != Some("time") {
            continue;
        }
        for dim in dims.iter().skip(1) {
            let name = dim.name();
            if spatial.iter().all(|(existing, _)| *existing != name) {
                spatial.push((name, dim.len()));
            }
        }
    }
    spatial
}

fn read_time_axis(file: &netcdf::File, path: &Path) -> Result<Vec<NaiveDateTime>> {
    let var = file
        .variable("time")
        .ok_or_else(|| FluxError::file_format(path, "no `time` coordinate variable"))?;
    let units = match var.attribute("units").map(|a| a.value()) {
        Some(Ok(netcdf::AttributeValue::Str(units))) => units,
        _ => {
            return Err(FluxError::file_format(
                path,
                "time variable has no string `units` attribute",
            ))
        }
    };
    let (step_secs, epoch) = parse_time_units(&units)
        .ok_or_else(|| FluxError::file_format(path, format!("unsupported time units `{units}`")))?;
    let offsets = var
        .get_values::<f64, _>(..)
        .map_err(|e| FluxError::file_format(path, e))?;

    Ok(offsets
        .into_iter()
        .map(|v| epoch + TimeDelta::milliseconds((v * step_secs * 1_000.0).round() as i64))
        .collect())
}

/// Parses a CF time-units attribute like `days since 1800-01-01 00:00:00`,
/// returning the step length in seconds and the epoch.
fn parse_time_units(units: &str) -> Option<(f64, NaiveDateTime)> {
    let (unit, epoch) = units.split_once(" since ")?;
    let step_secs = match unit.trim() {
        "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
        "minutes" | "minute" | "mins" | "min" => 60.0,
        "hours" | "hour" | "hrs" | "hr" | "h" => 3_600.0,
        "days" | "day" | "d" => 86_400.0,
        _ => return None,
    };
    let epoch = epoch.trim();
    let epoch = NaiveDateTime::parse_from_str(epoch, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(epoch, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| {
            NaiveDate::parse_from_str(epoch, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok()?;
    Some((step_secs, epoch))
}

// -- Tests ----------------------------------------------------------------------------
