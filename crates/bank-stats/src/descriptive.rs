//! Location statistics over plain samples.

use crate::error::{Result, StatsError};

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(StatsError::empty("sample"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; the mean of the two middle values for an even count.
pub fn median(values: &[f64]) -> Result<f64> {
    quantile(values, 0.5)
}

/// Quantile `q` with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(StatsError::InvalidQuantile { q });
    }
    if values.is_empty() {
        return Err(StatsError::empty("sample"));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Medians of two samples and how far each crosses the other's centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdStats {
    /// Median of the first sample.
    pub median_a: f64,
    /// Median of the second sample, used as the threshold.
    pub threshold: f64,
    /// Percentage of the first sample strictly above the threshold.
    pub pct_a_above: f64,
    /// Percentage of the second sample strictly below the threshold.
    pub pct_b_below: f64,
}

/// Compare two samples around the median of `series_b`.
pub fn median_and_threshold_stats(series_a: &[f64], series_b: &[f64]) -> Result<ThresholdStats> {
    let median_a = median(series_a)?;
    let threshold = median(series_b)?;
    let share = |values: &[f64], keep: &dyn Fn(f64) -> bool| {
        values.iter().filter(|&&value| keep(value)).count() as f64 / values.len() as f64 * 100.0
    };
    Ok(ThresholdStats {
        median_a,
        threshold,
        pct_a_above: share(series_a, &|value| value > threshold),
        pct_b_below: share(series_b, &|value| value < threshold),
    })
}
