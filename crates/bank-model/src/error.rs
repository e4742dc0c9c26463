//! Error types for the table model.

use thiserror::Error;

use crate::table::ColumnKind;

/// Schema and lookup errors raised by [`Table`](crate::Table) operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Column not present in the table.
    #[error("column '{column}' not found in table")]
    ColumnNotFound { column: String },

    /// Column exists but has a different kind than the caller expected.
    #[error("column '{column}' is {found}, expected {expected}")]
    ColumnKind {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    /// Column length differs from the table height.
    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Two columns share a name.
    #[error("duplicate column '{column}'")]
    DuplicateColumn { column: String },

    /// Label is not one of the categories of a column.
    #[error("label '{label}' is not a category of column '{column}'")]
    LabelNotFound { column: String, label: String },

    /// Label missing from a summary series.
    #[error("label '{label}' not present in series")]
    MissingSeriesLabel { label: String },

    /// Row mask length does not match the table height.
    #[error("row mask has {found} entries, table has {expected} rows")]
    MaskLength { expected: usize, found: usize },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::ColumnKind {
            column: "age".to_string(),
            expected: ColumnKind::Categorical,
            found: ColumnKind::Numeric,
        };
        assert_eq!(err.to_string(), "column 'age' is numeric, expected categorical");
    }
}
