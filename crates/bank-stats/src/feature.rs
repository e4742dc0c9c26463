//! Univariate feature relevance scoring against a categorical target.
//!
//! Categorical features are encoded as their integer category codes, numeric
//! features are used as-is. Each feature is scored independently; the highest
//! scores win.

use std::cmp::Ordering;
use std::fmt;

use bank_model::{ColumnData, Table};
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::special::digamma;

/// Neighbour count used by the nearest-neighbour mutual information estimate.
pub const MI_NEIGHBORS: usize = 3;

/// How a feature is scored against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringFn {
    /// One-way ANOVA F statistic across target classes.
    AnovaF,
    /// Mutual information between feature and target, in nats.
    MutualInformation,
}

impl ScoringFn {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AnovaF => "ANOVA F-value",
            Self::MutualInformation => "Mutual information",
        }
    }

    fn score(&self, feature: &EncodedFeature, target: &EncodedTarget) -> f64 {
        match self {
            Self::AnovaF => anova_f(&feature.values, target),
            Self::MutualInformation if feature.discrete => {
                mutual_information_discrete(&feature.values, target)
            }
            Self::MutualInformation => mutual_information_knn(&feature.values, target, MI_NEIGHBORS),
        }
    }
}

impl fmt::Display for ScoringFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A feature column as numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeature {
    pub name: String,
    pub values: Vec<f64>,
    /// Values are category codes rather than measurements.
    pub discrete: bool,
}

/// Target classes as dense indices `0..classes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTarget {
    pub classes: Vec<usize>,
    pub class_count: usize,
}

impl EncodedTarget {
    fn class_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.class_count];
        for &class in &self.classes {
            sizes[class] += 1;
        }
        sizes
    }
}

/// Score of one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScore {
    pub name: String,
    pub score: f64,
}

pub fn encode_feature(table: &Table, column: &str) -> Result<EncodedFeature> {
    let (values, discrete) = match table.column(column)?.data() {
        ColumnData::Categorical(data) => {
            let codes = data.codes().iter().map(|&code| f64::from(code)).collect();
            (codes, true)
        }
        ColumnData::Numeric(values) => (values.clone(), false),
    };
    Ok(EncodedFeature {
        name: column.to_string(),
        values,
        discrete,
    })
}

/// Encode `column` as dense class indices over the classes actually present.
pub fn encode_target(table: &Table, column: &str) -> Result<EncodedTarget> {
    let raw: Vec<f64> = encode_feature(table, column)?.values;
    let mut distinct = raw.clone();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    if distinct.len() < 2 {
        return Err(StatsError::TooFewClasses {
            column: column.to_string(),
            classes: distinct.len(),
        });
    }
    let classes = raw
        .iter()
        .map(|value| distinct.partition_point(|candidate| candidate < value))
        .collect();
    Ok(EncodedTarget {
        classes,
        class_count: distinct.len(),
    })
}

/// Score every feature, highest first. Ties keep declared order; NaN last.
pub fn rank_features(
    table: &Table,
    feature_cols: &[&str],
    target_col: &str,
    scoring: ScoringFn,
) -> Result<Vec<FeatureScore>> {
    if feature_cols.is_empty() {
        return Err(StatsError::NoFeatures);
    }
    let target = encode_target(table, target_col)?;
    let mut scores = feature_cols
        .iter()
        .map(|column| {
            let feature = encode_feature(table, column)?;
            let score = scoring.score(&feature, &target);
            debug!(feature = %column, target_column = target_col, scoring = %scoring, score, "scored feature");
            Ok(FeatureScore {
                name: feature.name,
                score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    scores.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
    });
    Ok(scores)
}

/// Names of the `k` best-scoring features.
pub fn select_top_feature(
    table: &Table,
    feature_cols: &[&str],
    target_col: &str,
    scoring: ScoringFn,
    k: usize,
) -> Result<Vec<String>> {
    Ok(rank_features(table, feature_cols, target_col, scoring)?
        .into_iter()
        .take(k)
        .map(|score| score.name)
        .collect())
}

fn anova_f(values: &[f64], target: &EncodedTarget) -> f64 {
    let n = values.len();
    let k = target.class_count;
    if n <= k {
        return f64::NAN;
    }
    let sizes = target.class_sizes();
    let mut sums = vec![0.0; k];
    for (&value, &class) in values.iter().zip(&target.classes) {
        sums[class] += value;
    }
    let grand_mean = sums.iter().sum::<f64>() / n as f64;
    let class_means: Vec<f64> = sums
        .iter()
        .zip(&sizes)
        .map(|(&sum, &size)| if size == 0 { 0.0 } else { sum / size as f64 })
        .collect();

    let between: f64 = class_means
        .iter()
        .zip(&sizes)
        .map(|(&mean, &size)| size as f64 * (mean - grand_mean).powi(2))
        .sum();
    let within: f64 = values
        .iter()
        .zip(&target.classes)
        .map(|(&value, &class)| (value - class_means[class]).powi(2))
        .sum();

    let groups = sizes.iter().filter(|&&size| size > 0).count();
    if groups < 2 {
        return f64::NAN;
    }
    let between = between / (groups - 1) as f64;
    let within = within / (n - groups) as f64;
    if within == 0.0 {
        return if between == 0.0 { f64::NAN } else { f64::INFINITY };
    }
    between / within
}

/// Plug-in mutual information from the joint contingency table.
fn mutual_information_discrete(values: &[f64], target: &EncodedTarget) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }
    let mut levels = values.to_vec();
    levels.sort_by(f64::total_cmp);
    levels.dedup();

    let mut joint = vec![vec![0usize; target.class_count]; levels.len()];
    for (value, &class) in values.iter().zip(&target.classes) {
        let level = levels.partition_point(|candidate| candidate < value);
        joint[level][class] += 1;
    }
    let class_sizes = target.class_sizes();

    let n = n as f64;
    let mut mi = 0.0;
    for row in &joint {
        let row_total: usize = row.iter().sum();
        for (&count, &class_size) in row.iter().zip(&class_sizes) {
            if count == 0 {
                continue;
            }
            let count = count as f64;
            mi += count / n * (count * n / (row_total as f64 * class_size as f64)).ln();
        }
    }
    mi.max(0.0)
}

/// Nearest-neighbour mutual information between a continuous feature and a
/// discrete target.
///
/// For each point the radius is the distance to its `k`-th neighbour within
/// its own class; neighbours are then counted inclusively within that radius
/// in the class and in the whole sample. Classes with a single member carry
/// no neighbour information and are left out.
fn mutual_information_knn(values: &[f64], target: &EncodedTarget, k: usize) -> f64 {
    let class_sizes = target.class_sizes();

    let mut by_class: Vec<Vec<f64>> = vec![Vec::new(); target.class_count];
    let mut kept = Vec::new();
    for (&value, &class) in values.iter().zip(&target.classes) {
        if class_sizes[class] > 1 {
            by_class[class].push(value);
            kept.push((value, class));
        }
    }
    if kept.is_empty() {
        return f64::NAN;
    }
    for class_values in &mut by_class {
        class_values.sort_by(f64::total_cmp);
    }
    let mut all: Vec<f64> = kept.iter().map(|&(value, _)| value).collect();
    all.sort_by(f64::total_cmp);

    let n = kept.len();
    let mut sum_k = 0.0;
    let mut sum_m = 0.0;
    let mut sum_class = 0.0;
    for &(value, class) in &kept {
        let class_values = &by_class[class];
        let neighbors = k.min(class_values.len() - 1);
        let radius = kth_neighbor_distance(class_values, value, neighbors);

        // Both counts exclude the point itself.
        let k_i = count_within(class_values, value, radius) - 1;
        let m_i = count_within(&all, value, radius) - 1;
        sum_k += digamma(k_i as f64);
        sum_m += digamma(m_i as f64);
        sum_class += digamma(class_values.len() as f64);
    }

    let n_f = n as f64;
    let mi = digamma(n_f) + (sum_k - sum_class - sum_m) / n_f;
    mi.max(0.0)
}

/// Distance from `value` to its `k`-th nearest neighbour in sorted `values`,
/// which must contain `value` itself.
fn kth_neighbor_distance(sorted: &[f64], value: f64, k: usize) -> f64 {
    let position = sorted.partition_point(|&candidate| candidate < value);
    // Walk outward from the point's own slot, skipping it.
    let (mut left, mut right) = (position, position + 1);
    let mut distance = 0.0;
    for _ in 0..k {
        let left_gap = left.checked_sub(1).map(|idx| value - sorted[idx]);
        let right_gap = sorted.get(right).map(|&other| other - value);
        match (left_gap, right_gap) {
            (Some(l), Some(r)) if l <= r => {
                distance = l;
                left -= 1;
            }
            (Some(l), None) => {
                distance = l;
                left -= 1;
            }
            (_, Some(r)) => {
                distance = r;
                right += 1;
            }
            (None, None) => break,
        }
    }
    distance
}

fn count_within(sorted: &[f64], value: f64, radius: f64) -> usize {
    let low = sorted.partition_point(|&candidate| candidate < value - radius);
    let high = sorted.partition_point(|&candidate| candidate <= value + radius);
    high - low
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_model::Column;

    fn clients() -> Table {
        Table::new(vec![
            Column::numeric("balance", vec![10.0, 12.0, 11.0, 90.0, 95.0, 92.0, 13.0, 91.0]),
            Column::numeric("day", vec![5.0, 6.0, 5.0, 6.0, 5.0, 6.0, 5.0, 6.0]),
            Column::categorical("loan", ["no", "no", "no", "yes", "yes", "yes", "no", "yes"]),
            Column::categorical(
                "marital",
                ["single", "married", "single", "married", "single", "married", "single", "married"],
            ),
            Column::categorical("default", ["no", "no", "no", "yes", "yes", "yes", "no", "yes"]),
        ])
        .unwrap()
    }

    #[test]
    fn anova_prefers_separating_feature() {
        let features = ["day", "balance", "marital"];
        let top = select_top_feature(&clients(), &features, "default", ScoringFn::AnovaF, 1).unwrap();
        assert_eq!(top, vec!["balance"]);
    }

    #[test]
    fn mutual_information_prefers_separating_feature() {
        let ranked = rank_features(
            &clients(),
            &["marital", "loan", "day"],
            "default",
            ScoringFn::MutualInformation,
        )
        .unwrap();
        assert_eq!(ranked[0].name, "loan");
        assert!((ranked[0].score - std::f64::consts::LN_2).abs() < 1e-12);
        assert!(ranked.iter().all(|score| score.score >= 0.0));
    }

    #[test]
    fn knn_estimate_detects_separated_classes() {
        let table = clients();
        let target = encode_target(&table, "default").unwrap();
        let balance = encode_feature(&table, "balance").unwrap();
        let day = encode_feature(&table, "day").unwrap();
        let separated = mutual_information_knn(&balance.values, &target, MI_NEIGHBORS);
        let mixed = mutual_information_knn(&day.values, &target, MI_NEIGHBORS);
        assert!(separated > mixed);
        assert!(separated > 0.0);
    }

    #[test]
    fn single_class_target_is_rejected() {
        let table = Table::new(vec![
            Column::numeric("age", vec![30.0, 40.0]),
            Column::categorical("default", ["no", "no"]),
        ])
        .unwrap();
        assert!(matches!(
            select_top_feature(&table, &["age"], "default", ScoringFn::AnovaF, 1),
            Err(StatsError::TooFewClasses { classes: 1, .. })
        ));
    }

    #[test]
    fn empty_feature_list_is_rejected() {
        assert_eq!(
            select_top_feature(&clients(), &[], "default", ScoringFn::AnovaF, 1),
            Err(StatsError::NoFeatures)
        );
    }

    #[test]
    fn constant_feature_scores_nan_and_ranks_last() {
        let table = Table::new(vec![
            Column::numeric("constant", vec![1.0, 1.0, 1.0, 1.0]),
            Column::numeric("signal", vec![1.0, 2.0, 8.0, 9.0]),
            Column::categorical("y", ["no", "no", "yes", "yes"]),
        ])
        .unwrap();
        let ranked = rank_features(&table, &["constant", "signal"], "y", ScoringFn::AnovaF).unwrap();
        assert_eq!(ranked[0].name, "signal");
        assert!(ranked[1].score.is_nan());
    }

    #[test]
    fn kth_neighbor_walks_both_sides() {
        let sorted = [1.0, 2.0, 4.0, 7.0];
        assert_eq!(kth_neighbor_distance(&sorted, 2.0, 1), 1.0);
        assert_eq!(kth_neighbor_distance(&sorted, 2.0, 2), 2.0);
        assert_eq!(kth_neighbor_distance(&sorted, 2.0, 3), 5.0);
        assert_eq!(count_within(&sorted, 2.0, 2.0), 3);
    }
}
