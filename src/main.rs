mod cli;
mod error;
mod export;
mod reading;
mod resample;
mod summary;
mod table;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli::{command, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Timeseries {
            data_dir,
            pattern,
            window,
            out,
        } => report(command::timeseries(data_dir, pattern, *window, out.clone())),
        Commands::Minmax {
            data_dir,
            pattern,
            window,
            out,
        } => report(command::minmax(data_dir, pattern, *window, out.clone())),
        Commands::Ogives {
            dir,
            ogive,
            low,
            high,
            out,
        } => report(command::ogives(dir, ogive, *low, *high, out.clone())),
        Commands::Spectra { dir, out } => report(command::spectra(dir, out.clone())),
        Commands::Ensemble {
            file,
            cospectra,
            out,
        } => report(command::ensemble(file, cospectra, out.clone())),
    }

    Ok(())
}

fn report(result: Result<PathBuf>) {
    match result {
        Ok(path) => println!("File saved to `{}`", path.display()),
        Err(e) => eprintln!("Error: {}", e),
    }
}
