//! Pearson chi-square goodness-of-fit between a subset and the population.

use bank_model::SummarySeries;
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::special::chi_square_sf;

/// Result of [`chi_square_independence`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquare {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
}

/// Conventional significance level for the goodness-of-fit tests.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

impl ChiSquare {
    /// Whether the null hypothesis is rejected at `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Counts expected for `observed` if it followed the `overall` distribution.
///
/// `expected[label] = total_observed * overall[label] / overall_total`,
/// returned in `overall` order.
pub fn expected_counts(observed: &SummarySeries, overall: &SummarySeries) -> Result<SummarySeries> {
    let overall_total = overall.total();
    if overall_total == 0.0 {
        return Err(StatsError::empty("overall distribution"));
    }
    let observed_total = observed.total();
    Ok(overall
        .iter()
        .map(|(label, count)| (label, observed_total * count / overall_total))
        .collect())
}

/// Pearson chi-square statistic of `observed` against `expected`, with the
/// p-value from the chi-square distribution on `k - 1` degrees of freedom.
///
/// Labels are matched by key and summed in sorted label order, so reordering
/// both inputs consistently yields the same result.
pub fn chi_square_independence(
    observed: &SummarySeries,
    expected: &SummarySeries,
) -> Result<ChiSquare> {
    let mut labels = observed.labels();
    labels.sort_unstable();

    if let Some(extra) = expected
        .labels()
        .into_iter()
        .find(|label| observed.get(label).is_none())
    {
        return Err(StatsError::LabelMismatch {
            label: extra.to_string(),
        });
    }
    if labels.len() < 2 {
        return Err(StatsError::TooFewCategories {
            found: labels.len(),
        });
    }

    let mut statistic = 0.0;
    for label in &labels {
        let expected_count = expected.get(label).ok_or_else(|| StatsError::LabelMismatch {
            label: label.to_string(),
        })?;
        if expected_count == 0.0 {
            return Err(StatsError::ZeroExpected {
                label: label.to_string(),
            });
        }
        let observed_count = observed.get(label).unwrap_or_default();
        statistic += (observed_count - expected_count).powi(2) / expected_count;
    }

    let degrees_of_freedom = labels.len() - 1;
    let p_value = chi_square_sf(statistic, degrees_of_freedom);
    debug!(statistic, p_value, degrees_of_freedom, "chi-square test");

    Ok(ChiSquare {
        statistic,
        p_value,
        degrees_of_freedom,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: &[(&str, f64)]) -> SummarySeries {
        entries.iter().map(|&(label, value)| (label, value)).collect()
    }

    #[test]
    fn expected_counts_scale_overall_shares() {
        let observed = series(&[("no", 30.0), ("yes", 10.0)]);
        let overall = series(&[("no", 800.0), ("yes", 200.0)]);
        let expected = expected_counts(&observed, &overall).unwrap();
        assert_eq!(expected.values(), vec![32.0, 8.0]);
    }

    #[test]
    fn matching_distribution_is_not_significant() {
        let observed = series(&[("no", 80.0), ("yes", 20.0)]);
        let expected = series(&[("no", 80.0), ("yes", 20.0)]);
        let result = chi_square_independence(&observed, &expected).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert!((result.p_value - 1.0).abs() < 1e-12);
        assert_eq!(result.degrees_of_freedom, 1);
    }

    #[test]
    fn skewed_distribution_is_significant() {
        let observed = series(&[("no", 50.0), ("yes", 50.0)]);
        let expected = series(&[("no", 84.0), ("yes", 16.0)]);
        let result = chi_square_independence(&observed, &expected).unwrap();
        let statistic = 34.0f64.powi(2) / 84.0 + 34.0f64.powi(2) / 16.0;
        assert!((result.statistic - statistic).abs() < 1e-9);
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn zero_expected_count_is_rejected() {
        let observed = series(&[("no", 5.0), ("yes", 1.0)]);
        let expected = series(&[("no", 6.0), ("yes", 0.0)]);
        assert_eq!(
            chi_square_independence(&observed, &expected),
            Err(StatsError::ZeroExpected {
                label: "yes".to_string()
            })
        );
    }

    #[test]
    fn label_sets_must_agree() {
        let observed = series(&[("no", 5.0), ("yes", 1.0)]);
        let expected = series(&[("no", 3.0), ("maybe", 3.0)]);
        assert!(matches!(
            chi_square_independence(&observed, &expected),
            Err(StatsError::LabelMismatch { .. })
        ));
    }

    #[test]
    fn single_category_is_rejected() {
        let observed = series(&[("no", 5.0)]);
        assert_eq!(
            chi_square_independence(&observed, &observed),
            Err(StatsError::TooFewCategories { found: 1 })
        );
    }
}
