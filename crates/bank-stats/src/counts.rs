//! Frequency counts over table slices.

use bank_model::{CategoricalColumn, ColumnData, ModelError, SummarySeries, Table};

use crate::error::{Result, StatsError};

/// Label used for a numeric group value.
///
/// Integral values print without a fractional part so contact counts read
/// `3`, not `3.0`.
pub fn numeric_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Rows of `group_col` bucketed by group, in natural group order.
///
/// Categorical columns yield every category in sorted order (zero-row
/// categories included); numeric columns yield ascending distinct values.
pub fn group_rows(table: &Table, group_col: &str) -> Result<Vec<(String, Vec<usize>)>> {
    match table.column(group_col)?.data() {
        ColumnData::Categorical(column) => {
            let mut groups: Vec<(String, Vec<usize>)> = column
                .categories()
                .iter()
                .map(|label| (label.clone(), Vec::new()))
                .collect();
            for (row, &code) in column.codes().iter().enumerate() {
                groups[code as usize].1.push(row);
            }
            Ok(groups)
        }
        ColumnData::Numeric(values) => {
            let mut order: Vec<usize> = (0..values.len()).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));
            let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
            for row in order {
                match groups.last_mut() {
                    Some((value, rows)) if *value == values[row] => rows.push(row),
                    _ => groups.push((values[row], vec![row])),
                }
            }
            Ok(groups
                .into_iter()
                .map(|(value, rows)| (numeric_label(value), rows))
                .collect())
        }
    }
}

/// Occurrences of each category, optionally restricted to masked rows.
///
/// Every category appears, in sorted order, even with a count of zero.
pub fn value_counts(column: &CategoricalColumn, mask: Option<&[bool]>) -> Result<SummarySeries> {
    if let Some(mask) = mask
        && mask.len() != column.len()
    {
        return Err(ModelError::MaskLength {
            expected: column.len(),
            found: mask.len(),
        }
        .into());
    }

    let mut counts = vec![0usize; column.categories().len()];
    for (row, &code) in column.codes().iter().enumerate() {
        if mask.is_none_or(|mask| mask[row]) {
            counts[code as usize] += 1;
        }
    }
    Ok(column
        .categories()
        .iter()
        .zip(counts)
        .map(|(label, count)| (label.clone(), count as f64))
        .collect())
}

/// Percentage of each `outcome_col` label among the rows selected by `mask`.
pub fn distribution(table: &Table, outcome_col: &str, mask: &[bool]) -> Result<SummarySeries> {
    let counts = value_counts(table.categorical(outcome_col)?, Some(mask))?;
    if counts.total() == 0.0 {
        return Err(StatsError::empty(format!("selection for '{outcome_col}'")));
    }
    Ok(counts.percentages())
}

/// Number of rows where every `(column, label)` condition holds.
pub fn count_where(table: &Table, conditions: &[(&str, &str)]) -> Result<usize> {
    let mut selected = vec![true; table.height()];
    for (column, label) in conditions {
        let mask = table.mask_eq(column, label)?;
        for (keep, matches) in selected.iter_mut().zip(mask) {
            *keep &= matches;
        }
    }
    Ok(selected.into_iter().filter(|&keep| keep).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_model::Column;

    fn table() -> Table {
        Table::new(vec![
            Column::categorical("job", ["blue-collar", "admin.", "blue-collar", "student"]),
            Column::categorical("housing", ["yes", "no", "no", "yes"]),
            Column::numeric("campaign", vec![3.0, 1.0, 3.0, 2.5]),
        ])
        .unwrap()
    }

    #[test]
    fn numeric_labels_drop_integral_fraction() {
        assert_eq!(numeric_label(3.0), "3");
        assert_eq!(numeric_label(-1.0), "-1");
        assert_eq!(numeric_label(2.5), "2.5");
    }

    #[test]
    fn numeric_groups_are_ascending() {
        let groups = group_rows(&table(), "campaign").unwrap();
        assert_eq!(
            groups,
            vec![
                ("1".to_string(), vec![1]),
                ("2.5".to_string(), vec![3]),
                ("3".to_string(), vec![0, 2]),
            ]
        );
    }

    #[test]
    fn value_counts_keep_zero_categories() {
        let table = table();
        let jobs = table.categorical("job").unwrap();
        let mask = table.mask_eq("housing", "no").unwrap();
        let counts = value_counts(jobs, Some(&mask)).unwrap();
        assert_eq!(counts.labels(), vec!["admin.", "blue-collar", "student"]);
        assert_eq!(counts.values(), vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn distribution_of_empty_selection_is_an_error() {
        let table = table();
        let result = distribution(&table, "housing", &[false; 4]);
        assert!(matches!(result, Err(StatsError::EmptySample { .. })));
    }

    #[test]
    fn count_where_combines_conditions() {
        let table = table();
        let count = count_where(&table, &[("job", "blue-collar"), ("housing", "yes")]).unwrap();
        assert_eq!(count, 1);
    }
}
