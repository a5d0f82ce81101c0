//! Crate error taxonomy.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = FluxError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FluxError {
    /// The input file does not have the structure its loader expects.
    #[error("{}: {reason}", .path.display())]
    FileFormat { path: PathBuf, reason: String },

    /// A named key, required or predicate column is absent.
    #[error("column `{0}` not found")]
    MissingColumn(String),

    /// A rolling window must cover at least one bucket.
    #[error("rolling window must be at least 1, got {0}")]
    InvalidWindow(usize),

    /// Quantile bounds must satisfy 0 <= low <= high <= 1.
    #[error("invalid quantile bounds: low {low}, high {high}")]
    InvalidQuantile { low: f64, high: f64 },

    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Glob(#[from] glob::GlobError),
}

impl FluxError {
    pub fn file_format(path: &Path, reason: impl ToString) -> Self {
        FluxError::FileFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
