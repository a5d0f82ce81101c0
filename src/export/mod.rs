//! Writes derived tables to disk for the charting tools to pick up.

pub mod csv;
pub mod parquet;

pub use self::csv::{write_band_csv, write_collection_csv, write_table_csv};
pub use self::parquet::save_daily;
