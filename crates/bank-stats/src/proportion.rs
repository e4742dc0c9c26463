//! Per-group share of rows satisfying a predicate.

use bank_model::{SummarySeries, Table};
use tracing::debug;

use crate::counts::group_rows;
use crate::error::Result;

/// Outcome of [`proportion_by_group`].
///
/// `matching` and `complement` are percentages of each group's row count and
/// add up to 100 for every defined group. Groups without rows hold NaN in
/// both series; see [`undefined_groups`](Self::undefined_groups).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupProportions {
    pub group_column: String,
    pub matching: SummarySeries,
    pub complement: SummarySeries,
    pub matching_counts: SummarySeries,
    pub totals: SummarySeries,
}

impl GroupProportions {
    /// Groups whose percentage is undefined because they have no rows.
    pub fn undefined_groups(&self) -> Vec<&str> {
        self.matching.undefined_labels()
    }

    /// Reorder every series by descending matching percentage.
    ///
    /// Ties keep natural group order; undefined groups go last.
    pub fn ranked(&self) -> Result<Self> {
        let matching = self.matching.sorted_descending();
        let order = matching.labels();
        Ok(Self {
            group_column: self.group_column.clone(),
            complement: self.complement.reindex(&order)?,
            matching_counts: self.matching_counts.reindex(&order)?,
            totals: self.totals.reindex(&order)?,
            matching,
        })
    }

    /// Group with the highest matching percentage.
    pub fn top(&self) -> Option<(&str, f64)> {
        self.matching
            .iter()
            .filter(|(_, value)| value.is_finite())
            .fold(None, |best, (label, value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((label, value)),
            })
    }
}

/// For each group of `group_col`, the percentage of rows where any of
/// `predicate_cols` equals `target_value`.
///
/// Groups come in natural order: sorted categories for a categorical column,
/// ascending values for a numeric one. Use [`GroupProportions::ranked`] for
/// descending order.
pub fn proportion_by_group(
    table: &Table,
    group_col: &str,
    predicate_cols: &[&str],
    target_value: &str,
) -> Result<GroupProportions> {
    let mut predicate = vec![false; table.height()];
    for column in predicate_cols {
        let mask = table.mask_eq(column, target_value)?;
        for (any, matches) in predicate.iter_mut().zip(mask) {
            *any |= matches;
        }
    }

    let groups = group_rows(table, group_col)?;
    let mut matching = Vec::with_capacity(groups.len());
    let mut complement = Vec::with_capacity(groups.len());
    let mut matching_counts = Vec::with_capacity(groups.len());
    let mut totals = Vec::with_capacity(groups.len());

    for (label, rows) in groups {
        let total = rows.len();
        let hits = rows.iter().filter(|&&row| predicate[row]).count();
        let (share, rest) = if total == 0 {
            (f64::NAN, f64::NAN)
        } else {
            let total = total as f64;
            (
                hits as f64 / total * 100.0,
                (total - hits as f64) / total * 100.0,
            )
        };
        matching.push((label.clone(), share));
        complement.push((label.clone(), rest));
        matching_counts.push((label.clone(), hits as f64));
        totals.push((label, total as f64));
    }

    debug!(
        group_column = group_col,
        groups = totals.len(),
        "computed group proportions"
    );

    Ok(GroupProportions {
        group_column: group_col.to_string(),
        matching: SummarySeries::from_entries(matching),
        complement: SummarySeries::from_entries(complement),
        matching_counts: SummarySeries::from_entries(matching_counts),
        totals: SummarySeries::from_entries(totals),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_model::Column;

    fn loans() -> Table {
        Table::new(vec![
            Column::categorical("job", ["blue-collar", "blue-collar", "management"]),
            Column::categorical("housing", ["yes", "no", "yes"]),
            Column::categorical("loan", ["no", "no", "yes"]),
        ])
        .unwrap()
    }

    #[test]
    fn any_predicate_column_counts_once() {
        let result = proportion_by_group(&loans(), "job", &["housing", "loan"], "yes").unwrap();
        assert_eq!(result.matching.get("blue-collar"), Some(50.0));
        assert_eq!(result.matching.get("management"), Some(100.0));
        assert_eq!(result.complement.get("blue-collar"), Some(50.0));
        assert_eq!(result.matching_counts.get("management"), Some(1.0));
        assert_eq!(result.totals.get("blue-collar"), Some(2.0));
    }

    #[test]
    fn ranked_orders_by_share() {
        let result = proportion_by_group(&loans(), "job", &["housing", "loan"], "yes")
            .unwrap()
            .ranked()
            .unwrap();
        assert_eq!(result.matching.labels(), vec!["management", "blue-collar"]);
        assert_eq!(result.complement.labels(), vec!["management", "blue-collar"]);
        assert_eq!(result.top(), Some(("management", 100.0)));
    }

    #[test]
    fn empty_groups_are_reported_as_undefined() {
        let table = loans();
        let subset = table
            .filter(&table.mask_eq("job", "management").unwrap())
            .unwrap();
        let result = proportion_by_group(&subset, "job", &["loan"], "yes").unwrap();
        assert_eq!(result.undefined_groups(), vec!["blue-collar"]);
        assert_eq!(result.top(), Some(("management", 100.0)));
    }
}
