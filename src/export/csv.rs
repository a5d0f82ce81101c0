//! CSV output for frequency-domain summaries. Missing cells are written
//! empty, which the tabular loader reads back as missing.

use std::path::Path;

use anyhow::Result;

use crate::summary::BandPoint;
use crate::table::{FreqTable, SeriesCollection};

/// Writes a table back out with its index as the leading column.
pub fn write_table_csv(table: &FreqTable, file_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)?;

    let mut header = vec![table.index_name().to_string()];
    header.extend(table.columns().iter().map(|column| column.name.clone()));
    writer.write_record(&header)?;

    for (row, key) in table.index().iter().enumerate() {
        let mut record = vec![key.to_string()];
        for column in table.columns() {
            record.push(cell(column.values[row]));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes one column per run over the union of the runs' indexes.
pub fn write_collection_csv(
    collection: &SeriesCollection,
    index_name: &str,
    file_path: &Path,
) -> Result<()> {
    let mut indexes: Vec<f64> = collection
        .runs()
        .iter()
        .flat_map(|run| run.points.iter().map(|&(index, _)| index))
        .collect();
    indexes.sort_by(f64::total_cmp);
    indexes.dedup_by(|a, b| a.total_cmp(b).is_eq());

    let mut writer = csv::Writer::from_path(file_path)?;
    let mut header = vec![index_name.to_string()];
    header.extend(collection.runs().iter().map(|run| run.name.clone()));
    writer.write_record(&header)?;

    for &index in &indexes {
        let mut record = vec![index.to_string()];
        for run in collection.runs() {
            let value = run
                .points
                .iter()
                .find(|&&(i, _)| i.total_cmp(&index).is_eq())
                .map(|&(_, v)| v);
            record.push(cell(value));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a band summary: index, median, low, high.
pub fn write_band_csv(band: &[BandPoint], index_name: &str, file_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)?;
    writer.write_record([index_name, "median", "low", "high"])?;
    for point in band {
        writer.write_record([
            point.index.to_string(),
            point.median.to_string(),
            point.low.to_string(),
            point.high.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {

    use std::fs;

    use tempfile::TempDir;

    use crate::reading::{load_delimited, DelimitedFormat, MISSING_VALUE};

    use super::*;

    #[test]
    fn should_reload_filtered_table_without_dropping_rows() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("20190708-1430_binned_ogives.csv");

        // eleven descriptive lines before the header
        let mut text = String::new();
        for line in 0..11 {
            text.push_str(&format!("file info {line}\n"));
        }
        text.push_str(
            "natural_frequency,og(w_u),og(w_ts)\n\
             0.001,-9999,0.10\n\
             0.002,0.5,-9999\n\
             0.004,0.7,0.30\n",
        );
        fs::write(&source, text).unwrap();

        let format = DelimitedFormat {
            header_skip_rows: 11,
            units_rows: 0,
            missing_code: MISSING_VALUE,
        };
        let filtered =
            load_delimited(&source, &format, "natural_frequency", &["og(w_ts)"]).unwrap();
        assert_eq!(filtered.len(), 2);

        let rewritten = dir.path().join("filtered.csv");
        write_table_csv(&filtered, &rewritten).unwrap();

        let plain = DelimitedFormat {
            header_skip_rows: 0,
            units_rows: 0,
            missing_code: MISSING_VALUE,
        };
        let reloaded =
            load_delimited(&rewritten, &plain, "natural_frequency", &["og(w_ts)"]).unwrap();

        assert_eq!(reloaded.len(), filtered.len());
        assert_eq!(reloaded.index(), filtered.index());
        assert_eq!(
            reloaded.column("og(w_u)").unwrap().values,
            filtered.column("og(w_u)").unwrap().values
        );
    }

    #[test]
    fn should_union_run_indexes_with_empty_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("medians.csv");

        let mut collection = SeriesCollection::new();
        collection.insert("spectra_median", vec![(0.001, 1.0), (0.002, 2.0)]);
        collection.insert("cospectra_median", vec![(0.002, 5.0), (0.004, 6.0)]);

        write_collection_csv(&collection, "natural_frequency", &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "natural_frequency,spectra_median,cospectra_median");
        assert_eq!(lines[1], "0.001,1,");
        assert_eq!(lines[2], "0.002,2,5");
        assert_eq!(lines[3], "0.004,,6");
    }

    #[test]
    fn should_write_band_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("band.csv");

        let band = vec![BandPoint {
            index: 0.001,
            median: 2.0,
            low: 1.1,
            high: 2.9,
        }];
        write_band_csv(&band, "natural_frequency", &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "natural_frequency,median,low,high");
        assert_eq!(lines[1], "0.001,2,1.1,2.9");
    }
}
