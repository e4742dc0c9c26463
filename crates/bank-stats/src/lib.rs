//! Metric computations for the bank marketing analysis.
//!
//! Every function takes an immutable [`bank_model::Table`] (or plain samples)
//! and returns fresh [`bank_model::SummarySeries`] or small result structs.
//! Precondition failures surface as [`StatsError`].

mod chi_square;
mod counts;
mod descriptive;
mod error;
mod feature;
mod histogram;
mod proportion;
pub mod special;

pub use chi_square::{ChiSquare, SIGNIFICANCE_LEVEL, chi_square_independence, expected_counts};
pub use counts::{count_where, distribution, group_rows, numeric_label, value_counts};
pub use descriptive::{ThresholdStats, mean, median, median_and_threshold_stats, quantile};
pub use error::{Result, StatsError};
pub use feature::{
    EncodedFeature, EncodedTarget, FeatureScore, MI_NEIGHBORS, ScoringFn, encode_feature,
    encode_target, rank_features, select_top_feature,
};
pub use histogram::{Bins, CumulativeDistribution, Histogram, cumulative_distribution};
pub use proportion::{GroupProportions, proportion_by_group};
