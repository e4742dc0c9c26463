//! Error types for dataset acquisition and loading.

use std::path::PathBuf;

use bank_model::ModelError;
use thiserror::Error;

/// Errors that can occur while fetching, extracting or parsing the dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Acquisition Errors ===
    /// HTTP request failed or returned an error status.
    #[error("failed to download {url}: {message}")]
    Network { url: String, message: String },

    /// Failed to read or write a local file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archive could not be opened or an entry could not be extracted.
    #[error("failed to extract {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Archive did not contain the expected dataset file.
    #[error("entry '{entry}' not found in archive {archive}")]
    MissingEntry { archive: PathBuf, entry: String },

    /// Downloaded archive does not match the pinned digest.
    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// No rows left after loading.
    #[error("no rows loaded from {path}")]
    EmptyTable { path: PathBuf },

    // === Schema Errors ===
    /// Column dtype is neither text nor numeric.
    #[error("column '{column}' has unsupported type {dtype}")]
    UnsupportedColumn { column: String, dtype: String },

    /// Column still holds nulls after the drop pass.
    #[error("column '{column}' contains missing values")]
    UnexpectedNull { column: String },

    /// Table assembly failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::MissingEntry {
            archive: PathBuf::from("data/data.zip"),
            entry: "bank-full.csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "entry 'bank-full.csv' not found in archive data/data.zip"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("age".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
