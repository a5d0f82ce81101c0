//! Median and quantile-band summaries across runs sharing an index.

use crate::error::{FluxError, Result};
use crate::table::SeriesCollection;

/// One summarized index slot: the median of the runs holding a value there
/// plus a lower/upper quantile band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPoint {
    pub index: f64,
    pub median: f64,
    pub low: f64,
    pub high: f64,
}

/// Summarizes every index value covered by at least one run, ascending by
/// index. Only the runs holding a value at a slot contribute to it; slots
/// nobody covers are omitted rather than emitted as missing.
pub fn quantile_band(
    collection: &SeriesCollection,
    low_q: f64,
    high_q: f64,
) -> Result<Vec<BandPoint>> {
    if !(0.0..=1.0).contains(&low_q) || !(0.0..=1.0).contains(&high_q) || low_q > high_q {
        return Err(FluxError::InvalidQuantile {
            low: low_q,
            high: high_q,
        });
    }

    Ok(grouped_values(collection)
        .into_iter()
        .map(|(index, mut values)| {
            values.sort_unstable_by(f64::total_cmp);
            BandPoint {
                index,
                median: quantile_sorted(&values, 0.5),
                low: quantile_sorted(&values, low_q),
                high: quantile_sorted(&values, high_q),
            }
        })
        .collect())
}

/// Per-index median across runs, ascending by index.
pub fn median_series(collection: &SeriesCollection) -> Vec<(f64, f64)> {
    grouped_values(collection)
        .into_iter()
        .map(|(index, mut values)| {
            values.sort_unstable_by(f64::total_cmp);
            (index, quantile_sorted(&values, 0.5))
        })
        .collect()
}

/// Collects, for each distinct index value, the values of every run that
/// covers it. Indexes compare by exact value; runs produced by the same
/// processor share bit-identical frequency bins.
fn grouped_values(collection: &SeriesCollection) -> Vec<(f64, Vec<f64>)> {
    let mut points: Vec<(f64, f64)> = collection
        .runs()
        .iter()
        .flat_map(|run| run.points.iter().copied())
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut grouped: Vec<(f64, Vec<f64>)> = Vec::new();
    for (index, value) in points {
        match grouped.last_mut() {
            Some((last, values)) if last.total_cmp(&index).is_eq() => values.push(value),
            _ => grouped.push((index, vec![value])),
        }
    }
    grouped
}

/// Quantile by linear interpolation between order statistics (the R-7
/// estimator, the default in R, NumPy and pandas): `h = (n - 1) q`,
/// interpolating between `x[floor(h)]` and `x[floor(h) + 1]`.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * q;
    let j = h.floor() as usize;
    let g = h - h.floor();
    if j + 1 >= n {
        sorted[n - 1]
    } else {
        (1.0 - g) * sorted[j] + g * sorted[j + 1]
    }
}

// -- Tests ----------------------------------------------------------------------------
