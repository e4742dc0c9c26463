//! Equal-width histograms and cumulative distributions.
//!
//! Binning follows the usual numerical convention: `n` equal-width bins over
//! `[min, max]`, every bin half-open except the last, which also holds `max`.
//! A degenerate range is widened to `[value - 0.5, value + 0.5]`.

use bank_model::Table;

use crate::error::{Result, StatsError};

/// How many bins to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bins {
    /// Fixed number of bins.
    Count(usize),
    /// One bin per distinct value in the sample.
    Distinct,
}

impl Bins {
    /// Number of bins for `values`.
    pub fn resolve(&self, values: &[f64]) -> Result<usize> {
        let count = match self {
            Self::Count(count) => *count,
            Self::Distinct => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                sorted.dedup();
                sorted.len()
            }
        };
        if count == 0 {
            return Err(StatsError::InvalidBins);
        }
        Ok(count)
    }
}

/// Bin counts over equal-width edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` over their own range.
    pub fn new(values: &[f64], bins: Bins) -> Result<Self> {
        let (min, max) = value_range(values)?;
        Self::with_range(values, bins, (min, max))
    }

    /// Bin `values` over `range`; values outside it are not counted.
    pub fn with_range(values: &[f64], bins: Bins, range: (f64, f64)) -> Result<Self> {
        if values.is_empty() {
            return Err(StatsError::empty("histogram sample"));
        }
        let count = bins.resolve(values)?;
        let (mut low, mut high) = range;
        if low == high {
            low -= 0.5;
            high += 0.5;
        }

        let step = (high - low) / count as f64;
        let mut edges: Vec<f64> = (0..=count).map(|i| i as f64 * step + low).collect();
        edges[count] = high;

        let mut counts = vec![0usize; count];
        for &value in values {
            if let Some(bin) = locate(&edges, value) {
                counts[bin] += 1;
            }
        }
        Ok(Self { edges, counts })
    }

    /// `bins + 1` edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of values that fell inside the range.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Probability density per bin; integrates to 1 over the range.
    pub fn density(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .zip(self.edges.windows(2))
            .map(|(&count, edge)| count as f64 / (total * (edge[1] - edge[0])))
            .collect()
    }

    /// Running share of values up to the end of each bin.
    pub fn cumulative(&self) -> Vec<f64> {
        let total = self.total() as f64;
        let mut running = 0usize;
        self.counts
            .iter()
            .map(|&count| {
                running += count;
                running as f64 / total
            })
            .collect()
    }
}

/// Bin edges paired with the cumulative probability at the end of each bin.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeDistribution {
    pub edges: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl CumulativeDistribution {
    pub fn from_values(values: &[f64], bins: Bins) -> Result<Self> {
        let histogram = Histogram::new(values, bins)?;
        Ok(Self {
            cumulative: histogram.cumulative(),
            edges: histogram.edges,
        })
    }
}

/// Cumulative distribution of numeric `value_col` over the rows selected by
/// `mask`. The sequence is non-decreasing and ends at 1.0.
pub fn cumulative_distribution(
    table: &Table,
    value_col: &str,
    mask: &[bool],
    bins: Bins,
) -> Result<CumulativeDistribution> {
    let values = table.numeric_where(value_col, mask)?;
    CumulativeDistribution::from_values(&values, bins)
}

fn value_range(values: &[f64]) -> Result<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter
        .next()
        .ok_or_else(|| StatsError::empty("histogram sample"))?;
    Ok(iter.fold((first, first), |(min, max), value| {
        (min.min(value), max.max(value))
    }))
}

fn locate(edges: &[f64], value: f64) -> Option<usize> {
    let bins = edges.len() - 1;
    let (low, high) = (edges[0], edges[bins]);
    if !(low..=high).contains(&value) {
        return None;
    }
    if value == high {
        return Some(bins - 1);
    }
    let mut bin = (((value - low) / (high - low)) * bins as f64) as usize;
    bin = bin.min(bins - 1);
    // Correct floating-point drift against the stored edges.
    if value < edges[bin] {
        bin -= 1;
    } else if value >= edges[bin + 1] && bin + 1 < bins {
        bin += 1;
    }
    Some(bin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_model::Column;

    #[test]
    fn five_bins_over_contact_counts() {
        let histogram = Histogram::new(&[1.0, 1.0, 2.0, 3.0, 5.0], Bins::Count(5)).unwrap();
        assert_eq!(histogram.counts(), &[2, 1, 1, 0, 1]);
        assert_eq!(histogram.edges().first(), Some(&1.0));
        assert_eq!(histogram.edges().last(), Some(&5.0));
        assert_eq!(histogram.cumulative(), vec![0.4, 0.6, 0.8, 0.8, 1.0]);
    }

    #[test]
    fn edges_step_from_the_low_end() {
        // 11 * (50 / 22) rounds just above 25, so 25 stays in the lower bin.
        let histogram = Histogram::new(&[0.0, 25.0, 50.0], Bins::Count(22)).unwrap();
        assert_eq!(histogram.edges()[11], 11.0 * (50.0 / 22.0));
        assert!(histogram.edges()[11] > 25.0);
        assert_eq!(histogram.counts()[10], 1);
        assert_eq!(histogram.counts()[11], 0);
    }

    #[test]
    fn distinct_bins_follow_cardinality() {
        assert_eq!(Bins::Distinct.resolve(&[3.0, 1.0, 3.0, 2.0]).unwrap(), 3);
        assert_eq!(Bins::Count(0).resolve(&[1.0]), Err(StatsError::InvalidBins));
    }

    #[test]
    fn degenerate_range_is_widened() {
        let histogram = Histogram::new(&[4.0, 4.0], Bins::Count(2)).unwrap();
        assert_eq!(histogram.edges(), &[3.5, 4.0, 4.5]);
        assert_eq!(histogram.counts(), &[0, 2]);
    }

    #[test]
    fn density_integrates_to_one() {
        let values = [-3.0, 0.0, 0.5, 1.0, 2.0, 10.0];
        let histogram = Histogram::new(&values, Bins::Count(4)).unwrap();
        let area: f64 = histogram
            .density()
            .iter()
            .zip(histogram.edges().windows(2))
            .map(|(density, edge)| density * (edge[1] - edge[0]))
            .sum();
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn range_excludes_outliers() {
        let histogram =
            Histogram::with_range(&[-10.0, 0.0, 1.0, 50.0], Bins::Count(2), (0.0, 2.0)).unwrap();
        assert_eq!(histogram.total(), 2);
    }

    #[test]
    fn cumulative_distribution_filters_rows() {
        let table = Table::new(vec![
            Column::numeric("campaign", vec![1.0, 9.0, 2.0]),
            Column::categorical("y", ["yes", "no", "yes"]),
        ])
        .unwrap();
        let mask = table.mask_eq("y", "yes").unwrap();
        let distribution = cumulative_distribution(&table, "campaign", &mask, Bins::Distinct).unwrap();
        assert_eq!(distribution.edges, vec![1.0, 1.5, 2.0]);
        assert_eq!(distribution.cumulative, vec![0.5, 1.0]);
    }

    #[test]
    fn empty_sample_is_an_error() {
        assert!(matches!(
            Histogram::new(&[], Bins::Count(3)),
            Err(StatsError::EmptySample { .. })
        ));
    }
}
