//! In-memory column store for the loaded dataset.
//!
//! A [`Table`] is built once by the loader and read by every analysis step.
//! Text columns are held as [`CategoricalColumn`]s (sorted category list plus
//! one code per row), everything else as `f64` values.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ModelError, Result};

/// Kind tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Values drawn from a finite, unordered label set.
    Categorical,
    /// Integer or continuous values.
    Numeric,
}

impl ColumnKind {
    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Categorical => "categorical",
            Self::Numeric => "numeric",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Categorical values encoded against a sorted category list.
///
/// Codes index into [`categories`](Self::categories). Categories stay in place
/// when rows are filtered out, so a subset may hold zero-count categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalColumn {
    categories: Vec<String>,
    codes: Vec<u32>,
}

impl CategoricalColumn {
    /// Encode a sequence of labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<S> = labels.into_iter().collect();
        let categories: Vec<String> = values
            .iter()
            .map(|value| value.as_ref())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let codes = values
            .iter()
            .map(|value| {
                categories
                    .binary_search_by(|category| category.as_str().cmp(value.as_ref()))
                    .map_or(0, |idx| idx as u32)
            })
            .collect();
        Self { categories, codes }
    }

    /// Sorted, de-duplicated category labels.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Per-row integer codes.
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Label stored at `row`.
    pub fn label(&self, row: usize) -> Option<&str> {
        let code = *self.codes.get(row)?;
        self.categories.get(code as usize).map(String::as_str)
    }

    /// Code assigned to `label`, if it is a category of this column.
    pub fn code_of(&self, label: &str) -> Option<u32> {
        self.categories
            .binary_search_by(|category| category.as_str().cmp(label))
            .ok()
            .map(|idx| idx as u32)
    }

    /// Row labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.codes
            .iter()
            .map(|&code| self.categories[code as usize].as_str())
    }

    /// Per-row equality with `label`.
    pub fn mask_eq(&self, label: &str) -> Vec<bool> {
        match self.code_of(label) {
            Some(target) => self.codes.iter().map(|&code| code == target).collect(),
            None => vec![false; self.codes.len()],
        }
    }

    fn take(&self, rows: &[usize]) -> Self {
        Self {
            categories: self.categories.clone(),
            codes: rows.iter().map(|&row| self.codes[row]).collect(),
        }
    }
}

/// Storage of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Categorical(CategoricalColumn),
    Numeric(Vec<f64>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Categorical(_) => ColumnKind::Categorical,
            Self::Numeric(_) => ColumnKind::Numeric,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Categorical(column) => column.len(),
            Self::Numeric(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take(&self, rows: &[usize]) -> Self {
        match self {
            Self::Categorical(column) => Self::Categorical(column.take(rows)),
            Self::Numeric(values) => Self::Numeric(rows.iter().map(|&row| values[row]).collect()),
        }
    }
}

/// Named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Build a categorical column from raw labels.
    pub fn categorical<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            name,
            ColumnData::Categorical(CategoricalColumn::from_labels(labels)),
        )
    }

    /// Build a numeric column.
    pub fn numeric(name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the column as categorical, failing on a kind mismatch.
    pub fn as_categorical(&self) -> Result<&CategoricalColumn> {
        match &self.data {
            ColumnData::Categorical(column) => Ok(column),
            ColumnData::Numeric(_) => Err(self.kind_error(ColumnKind::Categorical)),
        }
    }

    /// Borrow the column as numeric values, failing on a kind mismatch.
    pub fn as_numeric(&self) -> Result<&[f64]> {
        match &self.data {
            ColumnData::Numeric(values) => Ok(values),
            ColumnData::Categorical(_) => Err(self.kind_error(ColumnKind::Numeric)),
        }
    }

    fn kind_error(&self, expected: ColumnKind) -> ModelError {
        ModelError::ColumnKind {
            column: self.name.clone(),
            expected,
            found: self.kind(),
        }
    }
}

/// Immutable, column-oriented table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Assemble a table, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map_or(0, Column::len);
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ModelError::DuplicateColumn {
                    column: column.name().to_string(),
                });
            }
            if column.len() != height {
                return Err(ModelError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: height,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns, height })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.name() == name)
            .ok_or_else(|| ModelError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    pub fn categorical(&self, name: &str) -> Result<&CategoricalColumn> {
        self.column(name)?.as_categorical()
    }

    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        self.column(name)?.as_numeric()
    }

    /// Rows where categorical column `name` equals `label`.
    ///
    /// A label that is not a category matches no row.
    pub fn mask_eq(&self, name: &str, label: &str) -> Result<Vec<bool>> {
        Ok(self.categorical(name)?.mask_eq(label))
    }

    /// Keep the rows selected by `mask`.
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        let rows = self.selected_rows(mask)?;
        let columns = self
            .columns
            .iter()
            .map(|column| Column::new(column.name(), column.data().take(&rows)))
            .collect();
        Ok(Self {
            columns,
            height: rows.len(),
        })
    }

    /// Values of numeric column `name` on the rows selected by `mask`.
    pub fn numeric_where(&self, name: &str, mask: &[bool]) -> Result<Vec<f64>> {
        let values = self.numeric(name)?;
        let rows = self.selected_rows(mask)?;
        Ok(rows.into_iter().map(|row| values[row]).collect())
    }

    fn selected_rows(&self, mask: &[bool]) -> Result<Vec<usize>> {
        if mask.len() != self.height {
            return Err(ModelError::MaskLength {
                expected: self.height,
                found: mask.len(),
            });
        }
        Ok(mask
            .iter()
            .enumerate()
            .filter_map(|(row, &keep)| keep.then_some(row))
            .collect())
    }
}
