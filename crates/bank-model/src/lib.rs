//! Data model for the bank marketing analysis.
//!
//! - [`Table`]: the loaded dataset, immutable after loading
//! - [`SummarySeries`]: label → value series produced by statistics and drawn by charts
//! - [`BANK_COLUMNS`]: expected layout of `bank-full.csv`

pub mod error;
pub mod schema;
pub mod series;
pub mod table;

pub use error::{ModelError, Result};
pub use schema::{BANK_COLUMNS, validate_bank_schema};
pub use series::SummarySeries;
pub use table::{CategoricalColumn, Column, ColumnData, ColumnKind, Table};
