//! Command line interface.

pub mod command;

use std::path::PathBuf;
use std::time::Duration;

use clap::{command, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Daily carbon-flux time series (GPP/NEE/ER by SOLO/LL/LT)
    Timeseries {
        /// Directory holding the L6 netCDF archives
        #[arg(long)]
        data_dir: PathBuf,
        /// Filename pattern selecting the archives
        #[arg(long, default_value = "*L6.nc")]
        pattern: String,
        /// Days in the centered running mean
        #[arg(long, default_value_t = 7)]
        window: usize,
        /// Output file (defaults to the home directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Daily min/max/mean of VPD and air temperature
    Minmax {
        /// Directory holding the L6 netCDF archives
        #[arg(long)]
        data_dir: PathBuf,
        /// Filename pattern selecting the archives
        #[arg(long, default_value = "*L6.nc")]
        pattern: String,
        /// Days in the running mean
        #[arg(long, default_value_t = 7)]
        window: usize,
        /// Output file (defaults to the home directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Median and quantile band across binned ogive files
    Ogives {
        /// Directory holding the binned ogive files
        #[arg(long)]
        dir: PathBuf,
        /// Ogive column to merge
        #[arg(long, default_value = "og(w_ts)")]
        ogive: String,
        /// Lower band quantile
        #[arg(long, default_value_t = 0.05)]
        low: f64,
        /// Upper band quantile
        #[arg(long, default_value_t = 0.95)]
        high: f64,
        /// Output file (defaults to the home directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Median spectra and cospectra over quality-controlled runs
    Spectra {
        /// Flux-processor output directory
        #[arg(long)]
        dir: PathBuf,
        /// Output file (defaults to the home directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Time-binned ensemble cospectra columns
    Ensemble {
        /// Ensemble cospectra file
        #[arg(long)]
        file: PathBuf,
        /// Label selecting the cospectra columns
        #[arg(long, default_value = "w/T")]
        cospectra: String,
        /// Output file (defaults to the home directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
