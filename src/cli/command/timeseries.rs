//! Daily time series of the derived carbon fluxes.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::export;
use crate::reading::concat_grids;
use crate::resample::{daily_aggregate, rolling_mean, DailySeries, DailyStat};
use crate::table::TimeTable;

use super::make_output_file_name;

const FLUXES: [&str; 3] = ["GPP", "NEE", "ER"];
const METHODS: [&str; 3] = ["SOLO", "LL", "LT"];

pub fn timeseries(
    data_dir: &Path,
    pattern: &str,
    window: usize,
    out: Option<PathBuf>,
) -> Result<PathBuf> {
    let table = concat_grids(data_dir, pattern)?;
    if table.is_empty() {
        eprintln!(
            "warning: no files matched `{}` in {}",
            pattern,
            data_dir.display()
        );
    }

    let columns = if table.is_empty() {
        Vec::new()
    } else {
        smoothed_flux_columns(&table, window)?
    };

    let out = out.unwrap_or_else(|| make_output_file_name("timeseries", "parquet"));
    export::save_daily(&columns, &out)?;
    Ok(out)
}

/// Daily mean then centered running mean for every flux/method pair.
fn smoothed_flux_columns(
    table: &TimeTable,
    window: usize,
) -> Result<Vec<(String, DailySeries)>> {
    let mut columns = Vec::new();
    for flux in FLUXES {
        for method in METHODS {
            let name = format!("{flux}_{method}");
            let series = table.series(&name)?;
            let daily = daily_aggregate(&series, DailyStat::Mean);
            columns.push((name, rolling_mean(&daily, window, true)?));
        }
    }
    Ok(columns)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {

    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn should_build_one_column_per_flux_and_method() {
        let index: Vec<NaiveDateTime> = (1..=5).map(|d| at(d, 12)).collect();
        let mut table = TimeTable::with_index("time", index);
        for flux in FLUXES {
            for method in METHODS {
                let values = (0..5).map(|i| Some(i as f64)).collect();
                table.add_column(format!("{flux}_{method}"), values);
            }
        }

        let columns = smoothed_flux_columns(&table, 3).unwrap();

        assert_eq!(columns.len(), 9);
        assert_eq!(columns[0].0, "GPP_SOLO");
        // centered window of 3 over 0..5, edges voided
        assert_eq!(
            columns[0].1.values,
            vec![None, Some(1.0), Some(2.0), Some(3.0), None]
        );
    }

    #[test]
    fn should_fail_when_a_flux_column_is_absent() {
        let table = TimeTable::with_index("time", vec![at(1, 0)]);
        assert!(smoothed_flux_columns(&table, 3).is_err());
    }
}
