//! Loaders for the two flux-tower input formats: gridded netCDF archives
//! and delimited processor-output tables.

pub mod grid;
pub mod tabular;

pub use grid::{concat_grids, load_grid};
pub use tabular::{header_columns, load_delimited, matching_rows, DelimitedFormat};

/// Numeric code both input formats use for absent measurements.
pub const MISSING_VALUE: f64 = -9999.0;
