//! In-memory data model: an index column plus named nullable numeric columns.

use chrono::NaiveDateTime;

use crate::error::{FluxError, Result};

/// An ordered table keyed by an index column. Every column holds one value
/// per index entry; absent measurements are `None`.
#[derive(Debug, Clone)]
pub struct DataTable<K> {
    index_name: String,
    index: Vec<K>,
    columns: Vec<Column>,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Table keyed by timestamp, as loaded from gridded archives.
pub type TimeTable = DataTable<NaiveDateTime>;

/// Table keyed by a numeric index (frequency bins), as loaded from
/// delimited processor output.
pub type FreqTable = DataTable<f64>;

impl<K> DataTable<K> {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self::with_index(index_name, Vec::new())
    }

    pub fn with_index(index_name: impl Into<String>, index: Vec<K>) -> Self {
        DataTable {
            index_name: index_name.into(),
            index,
            columns: Vec::new(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index(&self) -> &[K] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Adds a column. Its length must match the index.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        assert_eq!(values.len(), self.index.len(), "column length mismatch");
        self.columns.push(Column {
            name: name.into(),
            values,
        });
    }

    /// Appends another table's rows, unioning the column sets. Rows that
    /// lack a column present on the other side are filled with missing
    /// values.
    pub fn append(&mut self, other: DataTable<K>) {
        let DataTable { index, columns, .. } = other;
        let old_len = self.index.len();
        let added = index.len();
        self.index.extend(index);

        for col in &mut self.columns {
            match columns.iter().find(|c| c.name == col.name) {
                Some(theirs) => col.values.extend(theirs.values.iter().copied()),
                None => col.values.extend(std::iter::repeat(None).take(added)),
            }
        }
        for theirs in columns {
            if self.columns.iter().all(|c| c.name != theirs.name) {
                let mut values = vec![None; old_len];
                values.extend(theirs.values);
                self.columns.push(Column {
                    name: theirs.name,
                    values,
                });
            }
        }
    }
}

impl<K: Ord + Copy> DataTable<K> {
    /// Stable sort of the rows ascending by index; rows with equal index
    /// keep their arrival order.
    pub fn sort_by_index(&mut self) {
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_key(|&i| self.index[i]);
        if order.iter().enumerate().all(|(pos, &i)| pos == i) {
            return;
        }
        let index = order.iter().map(|&i| self.index[i]).collect();
        self.index = index;
        for col in &mut self.columns {
            let values = order.iter().map(|&i| col.values[i]).collect();
            col.values = values;
        }
    }
}

/// One time-keyed column pulled out of a [`TimeTable`].
#[derive(Debug, Clone)]
pub struct TimeSeries {
    pub times: Vec<NaiveDateTime>,
    pub values: Vec<Option<f64>>,
}

impl TimeTable {
    /// Extracts one column together with the table's timestamps.
    pub fn series(&self, name: &str) -> Result<TimeSeries> {
        let col = self
            .column(name)
            .ok_or_else(|| FluxError::MissingColumn(name.to_string()))?;
        Ok(TimeSeries {
            times: self.index.clone(),
            values: col.values.clone(),
        })
    }
}

impl FreqTable {
    /// Non-missing (index, value) pairs of one column.
    pub fn points(&self, name: &str) -> Result<Vec<(f64, f64)>> {
        let col = self
            .column(name)
            .ok_or_else(|| FluxError::MissingColumn(name.to_string()))?;
        Ok(self
            .index
            .iter()
            .zip(&col.values)
            .filter_map(|(&index, value)| value.map(|v| (index, v)))
            .collect())
    }
}

/// Several runs' measurements over a shared numeric index, keyed by a run
/// label. Each run keeps only its non-missing points and may cover a
/// different part of the index than its peers.
#[derive(Debug, Clone, Default)]
pub struct SeriesCollection {
    runs: Vec<NamedSeries>,
}

#[derive(Debug, Clone)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl SeriesCollection {
    pub fn new() -> Self {
        SeriesCollection::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, points: Vec<(f64, f64)>) {
        self.runs.push(NamedSeries {
            name: name.into(),
            points,
        });
    }

    pub fn runs(&self) -> &[NamedSeries] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

// -- Tests ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn should_union_columns_on_append() {
        let mut first = TimeTable::with_index("time", vec![at(1, 0), at(1, 1)]);
        first.add_column("NEE", vec![Some(1.0), Some(2.0)]);

        let mut second = TimeTable::with_index("time", vec![at(2, 0)]);
        second.add_column("GPP", vec![Some(9.0)]);

        first.append(second);

        assert_eq!(first.len(), 3);
        assert_eq!(
            first.column("NEE").unwrap().values,
            vec![Some(1.0), Some(2.0), None]
        );
        assert_eq!(
            first.column("GPP").unwrap().values,
            vec![None, None, Some(9.0)]
        );
    }

    #[test]
    fn should_keep_arrival_order_for_equal_timestamps() {
        let mut table = TimeTable::with_index("time", vec![at(2, 0), at(1, 0)]);
        table.add_column("v", vec![Some(20.0), Some(10.0)]);

        let mut dup = TimeTable::with_index("time", vec![at(1, 0)]);
        dup.add_column("v", vec![Some(11.0)]);
        table.append(dup);

        table.sort_by_index();

        assert_eq!(table.index(), &[at(1, 0), at(1, 0), at(2, 0)]);
        assert_eq!(
            table.column("v").unwrap().values,
            vec![Some(10.0), Some(11.0), Some(20.0)]
        );
    }

    #[test]
    fn should_fail_on_unknown_column() {
        let table = TimeTable::with_index("time", vec![at(1, 0)]);
        let err = table.series("VPD").unwrap_err();
        assert!(matches!(err, FluxError::MissingColumn(name) if name == "VPD"));
    }

    #[test]
    fn should_extract_non_missing_points() {
        let mut table = FreqTable::with_index("natural_frequency", vec![0.001, 0.002, 0.004]);
        table.add_column("og(w_ts)", vec![Some(0.1), None, Some(0.3)]);

        let points = table.points("og(w_ts)").unwrap();
        assert_eq!(points, vec![(0.001, 0.1), (0.004, 0.3)]);
    }
}
