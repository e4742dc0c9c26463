//! Error types for statistical computations.

use bank_model::ModelError;
use thiserror::Error;

/// Precondition failures of the metric functions.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    /// Column lookup or kind error.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A computation received no values.
    #[error("{what} is empty")]
    EmptySample { what: String },

    /// Expected count of zero makes the chi-square statistic undefined.
    #[error("expected count for '{label}' is zero")]
    ZeroExpected { label: String },

    /// Observed and expected series do not share the same labels.
    #[error("label '{label}' is not present in both series")]
    LabelMismatch { label: String },

    /// Chi-square test needs at least two categories.
    #[error("chi-square test needs at least 2 categories, found {found}")]
    TooFewCategories { found: usize },

    /// Histogram asked for zero bins.
    #[error("histogram needs at least one bin")]
    InvalidBins,

    /// Quantile outside [0, 1].
    #[error("quantile {q} is outside [0, 1]")]
    InvalidQuantile { q: f64 },

    /// Target column has fewer than two observed classes.
    #[error("target '{column}' has {classes} class(es), need at least 2")]
    TooFewClasses { column: String, classes: usize },

    /// Feature selection called without candidate columns.
    #[error("no feature columns to score")]
    NoFeatures,
}

/// Result type for statistical operations.
pub type Result<T> = std::result::Result<T, StatsError>;

impl StatsError {
    pub(crate) fn empty(what: impl Into<String>) -> Self {
        Self::EmptySample { what: what.into() }
    }
}
