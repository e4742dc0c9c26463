//! Library side of the `bank-insights` binary.

pub mod logging;
pub mod pipeline;
pub mod questions;
pub mod report;
