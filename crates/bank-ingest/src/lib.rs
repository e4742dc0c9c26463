//! Dataset acquisition for the bank marketing analysis.
//!
//! # Features
//!
//! - **Download**: Fetch the remote ZIP archive into a cache directory
//! - **Checksum**: Log the archive SHA256 and optionally verify a pinned digest
//! - **Extraction**: Unpack every entry, overwriting previous runs
//! - **CSV Loading**: Parse with Polars, drop null rows, tag text columns categorical
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use bank_ingest::{DatasetSource, DEFAULT_DELIMITER, fetch_and_extract, load_table};
//!
//! let csv = fetch_and_extract(&DatasetSource::default(), Path::new("data"))?;
//! let table = load_table(&csv, DEFAULT_DELIMITER)?;
//! ```

mod checksum;
mod error;
mod extract;
mod fetch;
mod loader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Acquisition ===
pub use checksum::{archive_digest, check_pinned_digest};
pub use extract::extract_archive;
pub use fetch::{
    DEFAULT_ARCHIVE_NAME, DEFAULT_DATASET_NAME, DEFAULT_DATASET_URL, DatasetSource, download,
    fetch_and_extract, unpack_dataset,
};

// === CSV Loading ===
pub use loader::{DEFAULT_DELIMITER, load_table, table_from_frame};
