//! End-of-run summary: dataset shape, saved charts and total run time.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bank_cli::pipeline::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("Dataset: {}", summary.dataset.display());
    println!("Rows: {} ({} columns)", summary.rows, summary.columns);
    println!("{}", charts_table(summary));
    println!(
        "Answered {} questions in {:.2}s",
        summary.answers.len(),
        summary.duration.as_secs_f64()
    );
}

fn charts_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Question"),
        header_cell("Chart"),
        header_cell("File"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    align_column(&mut table, 0, CellAlignment::Right);

    let mut total = 0usize;
    for (number, chart) in summary.charts() {
        total += 1;
        table.add_row(vec![
            Cell::new(number),
            Cell::new(&chart.title),
            dim_cell(chart.path.display()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{total} charts")).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use bank_cli::report::{Answer, SavedChart};

    use super::*;

    fn chart(file_name: &str) -> SavedChart {
        SavedChart {
            title: format!("Chart {file_name}"),
            file_name: file_name.to_string(),
            path: PathBuf::from("images").join(file_name),
        }
    }

    #[test]
    fn charts_table_lists_every_chart_and_a_total() {
        let mut answer = Answer::new(5, "Credit insurance driver");
        answer.chart(chart("hist_balance.png"));
        answer.chart(chart("bar_chart_prev_curr.png"));
        let summary = RunSummary {
            dataset: PathBuf::from("data/bank-full.csv"),
            rows: 80,
            columns: 17,
            answers: vec![answer],
            duration: Duration::from_millis(1500),
        };

        let rendered = charts_table(&summary).to_string();
        assert!(rendered.contains("hist_balance.png"));
        assert!(rendered.contains("bar_chart_prev_curr.png"));
        assert!(rendered.contains("2 charts"));
    }
}
