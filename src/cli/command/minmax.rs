//! Daily minimum, maximum and mean of vapour-pressure deficit and air
//! temperature.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::export;
use crate::reading::concat_grids;
use crate::resample::{daily_aggregate, rolling_mean, DailySeries, DailyStat};
use crate::table::TimeTable;

use super::make_output_file_name;

const VARIABLES: [&str; 2] = ["VPD", "Ta"];
const STATS: [(DailyStat, &str); 3] = [
    (DailyStat::Min, "min"),
    (DailyStat::Max, "max"),
    (DailyStat::Mean, "mean"),
];

pub fn minmax(
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
        summary_columns(&table, window)?
    };

    let out = out.unwrap_or_else(|| make_output_file_name("minmax", "parquet"));
    export::save_daily(&columns, &out)?;
    Ok(out)
}

/// Raw daily statistic plus its trailing running mean, per variable.
fn summary_columns(table: &TimeTable, window: usize) -> Result<Vec<(String, DailySeries)>> {
    let mut columns = Vec::new();
    for variable in VARIABLES {
        let series = table.series(variable)?;
        for (stat, label) in STATS {
            let daily = daily_aggregate(&series, stat);
            let smoothed = rolling_mean(&daily, window, false)?;
            columns.push((format!("{variable}_{label}"), daily));
            columns.push((format!("{variable}_{label}_smooth"), smoothed));
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
    fn should_build_raw_and_smoothed_columns() {
        let index = vec![at(1, 0), at(1, 12), at(2, 0), at(2, 12)];
        let mut table = TimeTable::with_index("time", index);
        table.add_column("VPD", vec![Some(0.2), Some(0.8), Some(0.4), Some(1.0)]);
        table.add_column("Ta", vec![Some(10.0), Some(20.0), Some(12.0), Some(22.0)]);

        let columns = summary_columns(&table, 2).unwrap();

        assert_eq!(columns.len(), 12);
        let names: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
        assert!(names.contains(&"VPD_min"));
        assert!(names.contains(&"VPD_min_smooth"));
        assert!(names.contains(&"Ta_mean_smooth"));

        let vpd_max = &columns.iter().find(|(n, _)| n == "VPD_max").unwrap().1;
        assert_eq!(vpd_max.values, vec![Some(0.8), Some(1.0)]);

        let vpd_max_smooth = &columns
            .iter()
            .find(|(n, _)| n == "VPD_max_smooth")
            .unwrap()
            .1;
        // trailing window of 2: first day has no predecessor
        assert_eq!(vpd_max_smooth.values, vec![None, Some(0.9)]);
    }
}
