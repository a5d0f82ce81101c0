//! Saves daily summary tables in the _parquet_ file format.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Date32Builder, Float64Builder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::{Datelike, NaiveDate};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::resample::DailySeries;

/// Writes a date-indexed summary table: one `date` column plus one nullable
/// float column per series. All series must cover the same day range.
pub fn save_daily(columns: &[(String, DailySeries)], file_path: &Path) -> Result<()> {
    let days: &[NaiveDate] = columns
        .first()
        .map(|(_, series)| series.days.as_slice())
        .unwrap_or(&[]);

    let mut fields = vec![Field::new("date", DataType::Date32, false)];
    for (name, series) in columns {
        assert_eq!(
            series.days.len(),
            days.len(),
            "summary columns cover different day ranges"
        );
        fields.push(Field::new(name.clone(), DataType::Float64, true));
    }
    let schema = Arc::new(Schema::new(fields));

    let epoch_offset = NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .num_days_from_ce();

    let mut date_builder = Date32Builder::with_capacity(days.len());
    for day in days {
        date_builder.append_value(day.num_days_from_ce() - epoch_offset);
    }
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(date_builder.finish())];
    for (_, series) in columns {
        let mut builder = Float64Builder::with_capacity(series.values.len());
        for value in &series.values {
            builder.append_option(*value);
        }
        arrays.push(Arc::new(builder.finish()));
    }

    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::ZSTD(
            parquet::basic::ZstdLevel::default(),
        ))
        .set_dictionary_enabled(true)
        .build();

    let file = File::create(file_path)?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

// -- Tests -------------------------------------------------------------------
