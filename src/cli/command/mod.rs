pub mod ensemble;
pub mod minmax;
pub mod ogives;
pub mod spectra;
pub mod timeseries;

use std::path::PathBuf;

use chrono::{Datelike, Local};
pub use ensemble::ensemble;
pub use minmax::minmax;
pub use ogives::ogives;
pub use spectra::spectra;
pub use timeseries::timeseries;

pub fn make_output_file_name(kind: &str, extension: &str) -> PathBuf {
    let today = Local::now();
    let file_name = format!(
        "fluxprep-{}-{}-{:02}-{:02}.{}",
        kind,
        today.year(),
        today.month(),
        today.day(),
        extension
    );

    dirs::home_dir().unwrap().join(file_name)
}

// -- Tests -------------------------------------------------------------------
