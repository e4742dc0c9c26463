//! Chart rendering for the bank marketing analysis.
//!
//! All charts go through one [`ChartRenderer`], parameterized by a
//! [`ChartShape`] and described by a [`ChartSpec`]. Output is PNG.

mod error;
mod render;
mod shape;

pub use error::{ChartError, Result};
pub use render::{ChartRenderer, DEFAULT_SIZE};
pub use shape::{ChartShape, ChartSpec};
