//! Daily resampling and rolling-window smoothing.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{FluxError, Result};
use crate::table::TimeSeries;

/// Statistic applied within each daily bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyStat {
    Min,
    Max,
    Mean,
}

/// A series aggregated to one value per calendar day, covering the
/// continuous range from the first to the last observed date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub days: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// Buckets `series` by calendar date and applies `stat` within each day.
/// Missing entries never contribute; a day with no non-missing entries,
/// including days absent from the input entirely, aggregates to missing.
pub fn daily_aggregate(series: &TimeSeries, stat: DailyStat) -> DailySeries {
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for (time, value) in series.times.iter().zip(&series.values) {
        let bucket = buckets.entry(time.date()).or_default();
        if let Some(v) = *value {
            bucket.push(v);
        }
    }

    let (Some(&first), Some(&last)) = (
        buckets.keys().next(),
        buckets.keys().next_back(),
    ) else {
        return DailySeries {
            days: Vec::new(),
            values: Vec::new(),
        };
    };

    let mut days = Vec::new();
    let mut values = Vec::new();
    let mut day = first;
    loop {
        values.push(buckets.get(&day).and_then(|bucket| apply(stat, bucket)));
        days.push(day);
        if day == last {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    DailySeries { days, values }
}

/// Rolling mean over daily buckets. `window` counts buckets, not a
/// duration. Trailing windows cover `[i - window + 1, i]`; centered windows
/// cover `[i - window/2, i - window/2 + window - 1]`, putting the extra
/// bucket of an even window before the label. Every bucket in the window
/// must exist and be non-missing for the output point to exist.
pub fn rolling_mean(series: &DailySeries, window: usize, center: bool) -> Result<DailySeries> {
    if window < 1 {
        return Err(FluxError::InvalidWindow(window));
    }

    let len = series.values.len();
    let mut values = vec![None; len];
    for i in 0..len {
        let reach_back = if center { window / 2 } else { window - 1 };
        let Some(start) = i.checked_sub(reach_back) else {
            continue;
        };
        let end = start + window;
        if end > len {
            continue;
        }
        let slice = &series.values[start..end];
        if slice.iter().all(|v| v.is_some()) {
            let sum: f64 = slice.iter().flatten().sum();
            values[i] = Some(sum / window as f64);
        }
    }
    Ok(DailySeries {
        days: series.days.clone(),
        values,
    })
}

fn apply(stat: DailyStat, values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    match stat {
        DailyStat::Min => values.iter().copied().reduce(f64::min),
        DailyStat::Max => values.iter().copied().reduce(f64::max),
        DailyStat::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
    }
}

// -- Tests ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use chrono::NaiveDateTime;

    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, day).unwrap()
    }

    fn one_per_day(values: &[Option<f64>]) -> DailySeries {
        let series = TimeSeries {
            times: (0..values.len()).map(|i| at(i as u32 + 1, 0)).collect(),
            values: values.to_vec(),
        };
        daily_aggregate(&series, DailyStat::Mean)
    }

    #[test]
    fn should_exclude_missing_from_daily_mean() {
        let series = TimeSeries {
            times: vec![at(1, 0), at(1, 8), at(1, 16)],
            values: vec![Some(1.0), None, Some(3.0)],
        };
        let daily = daily_aggregate(&series, DailyStat::Mean);

        assert_eq!(daily.days, vec![date(1)]);
        assert_eq!(daily.values, vec![Some(2.0)]);
    }

    #[test]
    fn should_yield_missing_for_all_missing_day() {
        let series = TimeSeries {
            times: vec![at(1, 0), at(1, 8)],
            values: vec![None, None],
        };
        let daily = daily_aggregate(&series, DailyStat::Mean);
        assert_eq!(daily.values, vec![None]);
    }

    #[test]
    fn should_fill_gap_days_with_missing() {
        let series = TimeSeries {
            times: vec![at(1, 0), at(3, 0)],
            values: vec![Some(1.0), Some(3.0)],
        };
        let daily = daily_aggregate(&series, DailyStat::Mean);

        assert_eq!(daily.days, vec![date(1), date(2), date(3)]);
        assert_eq!(daily.values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn should_aggregate_min_and_max() {
        let series = TimeSeries {
            times: vec![at(1, 0), at(1, 8), at(1, 16)],
            values: vec![Some(2.0), Some(-1.0), Some(5.0)],
        };
        assert_eq!(
            daily_aggregate(&series, DailyStat::Min).values,
            vec![Some(-1.0)]
        );
        assert_eq!(
            daily_aggregate(&series, DailyStat::Max).values,
            vec![Some(5.0)]
        );
    }

    #[test]
    fn should_return_empty_for_empty_series() {
        let series = TimeSeries {
            times: Vec::new(),
            values: Vec::new(),
        };
        let daily = daily_aggregate(&series, DailyStat::Mean);
        assert!(daily.days.is_empty());
        assert!(daily.values.is_empty());
    }

    #[test]
    fn should_center_odd_window() {
        let daily = one_per_day(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
        let smoothed = rolling_mean(&daily, 3, true).unwrap();
        assert_eq!(
            smoothed.values,
            vec![None, Some(2.0), Some(3.0), Some(4.0), None]
        );
    }

    #[test]
    fn should_take_extra_bucket_before_label_for_even_window() {
        let daily = one_per_day(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
        let smoothed = rolling_mean(&daily, 4, true).unwrap();
        assert_eq!(
            smoothed.values,
            vec![None, None, Some(2.5), Some(3.5), None]
        );
    }

    #[test]
    fn should_trail_when_not_centered() {
        let daily = one_per_day(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
        let smoothed = rolling_mean(&daily, 2, false).unwrap();
        assert_eq!(
            smoothed.values,
            vec![None, Some(1.5), Some(2.5), Some(3.5), Some(4.5)]
        );
    }

    #[test]
    fn should_void_windows_containing_missing_buckets() {
        let daily = one_per_day(&[Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)]);
        let smoothed = rolling_mean(&daily, 3, true).unwrap();
        assert_eq!(
            smoothed.values,
            vec![None, None, None, Some(4.0), None]
        );
    }

    #[test]
    fn should_reject_zero_window() {
        let daily = one_per_day(&[Some(1.0)]);
        let err = rolling_mean(&daily, 0, true).unwrap_err();
        assert!(matches!(err, FluxError::InvalidWindow(0)));
    }
}
