//! Chart rendering errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Output directory or image file could not be written.
    #[error("failed to write chart to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Plotting backend failed while drawing.
    #[error("failed to draw chart: {0}")]
    Drawing(String),

    /// Input series cannot be drawn.
    #[error("invalid chart data: {0}")]
    InvalidData(String),
}

/// Result type for chart rendering.
pub type Result<T> = std::result::Result<T, ChartError>;

impl ChartError {
    pub(crate) fn drawing(err: impl std::fmt::Display) -> Self {
        Self::Drawing(err.to_string())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }
}
