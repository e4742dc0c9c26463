//! Integration tests for the table model.

use bank_model::{Column, SummarySeries, Table};
use proptest::prelude::*;

const LABELS: [&str; 4] = ["no", "yes", "unknown", "other"];

fn table_from(labels: &[usize], values: &[f64]) -> Table {
    Table::new(vec![
        Column::categorical("outcome", labels.iter().map(|&idx| LABELS[idx])),
        Column::numeric("value", values.to_vec()),
    ])
    .unwrap()
}

proptest! {
    #[test]
    fn filter_preserves_row_alignment(
        rows in prop::collection::vec((0usize..4, -100.0f64..100.0, any::<bool>()), 0..64)
    ) {
        let labels: Vec<usize> = rows.iter().map(|row| row.0).collect();
        let values: Vec<f64> = rows.iter().map(|row| row.1).collect();
        let mask: Vec<bool> = rows.iter().map(|row| row.2).collect();
        let table = table_from(&labels, &values);

        let subset = table.filter(&mask).unwrap();
        let kept = mask.iter().filter(|&&keep| keep).count();
        prop_assert_eq!(subset.height(), kept);

        let expected: Vec<(&str, f64)> = rows
            .iter()
            .filter(|row| row.2)
            .map(|row| (LABELS[row.0], row.1))
            .collect();
        let outcome = subset.categorical("outcome").unwrap();
        let actual: Vec<(&str, f64)> = outcome
            .labels()
            .zip(subset.numeric("value").unwrap().iter().copied())
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(
            outcome.categories(),
            table.categorical("outcome").unwrap().categories()
        );
    }

    #[test]
    fn percentages_total_hundred(values in prop::collection::vec(1.0f64..1_000.0, 1..32)) {
        let series: SummarySeries = values
            .iter()
            .enumerate()
            .map(|(idx, value)| (idx.to_string(), *value))
            .collect();
        prop_assert!((series.percentages().total() - 100.0).abs() < 1e-9);
    }
}

#[test]
fn mask_eq_on_numeric_column_is_a_kind_error() {
    let table = table_from(&[0, 1], &[1.0, 2.0]);
    assert!(table.mask_eq("value", "yes").is_err());
}
