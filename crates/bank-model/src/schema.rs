//! Known column layout of the bank marketing dataset.

use crate::error::{ModelError, Result};
use crate::table::{ColumnKind, Table};

/// Expected columns of `bank-full.csv`, in file order.
pub const BANK_COLUMNS: [(&str, ColumnKind); 17] = [
    ("age", ColumnKind::Numeric),
    ("job", ColumnKind::Categorical),
    ("marital", ColumnKind::Categorical),
    ("education", ColumnKind::Categorical),
    ("default", ColumnKind::Categorical),
    ("balance", ColumnKind::Numeric),
    ("housing", ColumnKind::Categorical),
    ("loan", ColumnKind::Categorical),
    ("contact", ColumnKind::Categorical),
    ("day", ColumnKind::Numeric),
    ("month", ColumnKind::Categorical),
    ("duration", ColumnKind::Numeric),
    ("campaign", ColumnKind::Numeric),
    ("pdays", ColumnKind::Numeric),
    ("previous", ColumnKind::Numeric),
    ("poutcome", ColumnKind::Categorical),
    ("y", ColumnKind::Categorical),
];

/// Check that every expected column is present with the expected kind.
///
/// Extra columns are allowed.
pub fn validate_bank_schema(table: &Table) -> Result<()> {
    for (name, expected) in BANK_COLUMNS {
        let found = table.column(name)?.kind();
        if found != expected {
            return Err(ModelError::ColumnKind {
                column: name.to_string(),
                expected,
                found,
            });
        }
    }
    Ok(())
}
