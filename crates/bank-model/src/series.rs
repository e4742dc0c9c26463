//! Ordered label → value series exchanged between statistics and charts.

use std::cmp::Ordering;

use crate::error::{ModelError, Result};

/// Ordered mapping from a label to a statistic value.
///
/// Series are never mutated in place: every transformation returns a new
/// series, so a series handed to a chart is exactly what was computed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummarySeries {
    entries: Vec<(String, f64)>,
}

impl SummarySeries {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, f64)> + '_ {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), *value))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map(|(_, value)| *value)
    }

    /// Like [`get`](Self::get) but a missing label is an error.
    pub fn value(&self, label: &str) -> Result<f64> {
        self.get(label).ok_or_else(|| ModelError::MissingSeriesLabel {
            label: label.to_string(),
        })
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }

    /// Multiply every value by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::from_entries(
            self.entries
                .iter()
                .map(|(label, value)| (label.clone(), value * factor)),
        )
    }

    /// Express every value as a percentage of the series total.
    #[must_use]
    pub fn percentages(&self) -> Self {
        let total = self.total();
        self.scaled(100.0 / total)
    }

    /// Stable sort by value, largest first. Undefined values go last.
    #[must_use]
    pub fn sorted_descending(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by(|(_, a), (_, b)| match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
        });
        Self { entries }
    }

    /// Reorder to `labels`; every label must be present.
    pub fn reindex(&self, labels: &[&str]) -> Result<Self> {
        labels
            .iter()
            .map(|label| Ok((label.to_string(), self.value(label)?)))
            .collect::<Result<Vec<_>>>()
            .map(|entries| Self { entries })
    }

    /// Labels whose value is NaN or infinite.
    pub fn undefined_labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_finite())
            .map(|(label, _)| label.as_str())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SummarySeries {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> SummarySeries {
        SummarySeries::from_entries([("admin.", 2.0), ("blue-collar", 6.0), ("student", 2.0)])
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let pct = counts().percentages();
        assert_eq!(pct.values(), vec![20.0, 60.0, 20.0]);
        assert!((pct.total() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn sorted_descending_is_stable() {
        let sorted = counts().sorted_descending();
        assert_eq!(sorted.labels(), vec!["blue-collar", "admin.", "student"]);
    }

    #[test]
    fn sorted_descending_puts_nan_last() {
        let series = SummarySeries::from_entries([("a", f64::NAN), ("b", 1.0), ("c", 3.0)]);
        assert_eq!(series.sorted_descending().labels(), vec!["c", "b", "a"]);
        assert_eq!(series.undefined_labels(), vec!["a"]);
    }

    #[test]
    fn reindex_requires_every_label() {
        let series = counts();
        let reordered = series.reindex(&["student", "admin."]).unwrap();
        assert_eq!(reordered.labels(), vec!["student", "admin."]);
        assert_eq!(
            series.reindex(&["retired"]),
            Err(ModelError::MissingSeriesLabel {
                label: "retired".to_string()
            })
        );
    }
}
