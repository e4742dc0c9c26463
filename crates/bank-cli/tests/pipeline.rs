//! End-to-end run over a generated bank-full style CSV.

use std::fs;
use std::path::{Path, PathBuf};

use bank_cli::pipeline::{RunConfig, run};
use bank_cli::report::{Answer, ReportValue};
use tempfile::tempdir;

const HEADER: &str = "\"age\";\"job\";\"marital\";\"education\";\"default\";\"balance\";\"housing\";\"loan\";\"contact\";\"day\";\"month\";\"duration\";\"campaign\";\"pdays\";\"previous\";\"poutcome\";\"y\"";

const JOBS: [&str; 4] = ["admin.", "services", "technician", "management"];
const MARITAL: [&str; 3] = ["married", "single", "divorced"];
const EDUCATION: [&str; 4] = ["primary", "secondary", "tertiary", "unknown"];

const CHARTS: [&str; 8] = [
    "bar_chart_loan_housing.png",
    "bar_chart_calls_success.png",
    "hist_cumu_call_success.png",
    "bar_chart_prev_curr.png",
    "hist_balance.png",
    "bar_chart_housing_job.png",
    "hist_cumu_age_housing.png",
    "bar_chart_education_housing.png",
];

fn row(i: usize) -> String {
    let poutcome = match i % 8 {
        0 => "success",
        1 => "failure",
        _ => "unknown",
    };
    let (pdays, previous) = if poutcome == "unknown" { (-1, 0) } else { (90, 1) };
    let subscribed = (i % 8 == 0 && i % 3 != 0) || i % 7 == 2;
    let balance = (i * 137 % 3000) as i64 - 200;
    format!(
        "{age};\"{job}\";\"{marital}\";\"{education}\";\"{default}\";{balance};\"{housing}\";\"{loan}\";\"cellular\";{day};\"may\";{duration};{campaign};{pdays};{previous};\"{poutcome}\";\"{y}\"",
        age = 25 + i * 7 % 40,
        job = JOBS[i % 4],
        marital = MARITAL[i % 3],
        education = EDUCATION[i / 2 % 4],
        default = if i % 10 == 3 { "yes" } else { "no" },
        housing = if i % 3 == 0 { "no" } else { "yes" },
        loan = if i % 5 == 0 { "yes" } else { "no" },
        day = 1 + i % 28,
        duration = 100 + i,
        campaign = 1 + i % 6,
        y = if subscribed { "yes" } else { "no" },
    )
}

fn write_dataset(dir: &Path, rows: usize) -> PathBuf {
    let mut lines = vec![HEADER.to_string()];
    lines.extend((0..rows).map(row));
    let path = dir.join("bank-full.csv");
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

fn config(dir: &Path, input: PathBuf) -> RunConfig {
    RunConfig {
        cache_dir: dir.join("data"),
        output_dir: dir.join("images"),
        input: Some(input),
        ..RunConfig::default()
    }
}

fn assert_percent(value: Option<&ReportValue>, expected: f64) {
    match value {
        Some(ReportValue::Percent(actual)) => assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}%, got {actual}%"
        ),
        other => panic!("expected a percentage, got {other:?}"),
    }
}

fn assert_number(value: Option<&ReportValue>, expected: f64) {
    match value {
        Some(ReportValue::Number { value, .. }) => assert!(
            (value - expected).abs() < 1e-9,
            "expected {expected}, got {value}"
        ),
        other => panic!("expected a number, got {other:?}"),
    }
}

fn text(value: &str) -> ReportValue {
    ReportValue::Text(value.to_string())
}

fn fixture_answers() -> Vec<Answer> {
    let dir = tempdir().unwrap();
    let input = write_dataset(dir.path(), 80);
    let config = config(dir.path(), input);
    run(&config, &mut Vec::new()).unwrap().answers
}

#[test]
fn run_answers_every_question_and_saves_charts() {
    let dir = tempdir().unwrap();
    let input = write_dataset(dir.path(), 80);
    let config = config(dir.path(), input.clone());

    let mut out = Vec::new();
    let summary = run(&config, &mut out).unwrap();
    let printed = String::from_utf8(out).unwrap();

    assert_eq!(summary.dataset, input);
    assert_eq!(summary.rows, 80);
    assert_eq!(summary.columns, 17);
    assert_eq!(summary.answers.len(), 6);
    for (idx, answer) in summary.answers.iter().enumerate() {
        assert_eq!(usize::from(answer.number), idx + 1);
        assert!(printed.contains(&format!(" Question {}: {} ", answer.number, answer.title)));
    }

    for name in CHARTS {
        let path = config.output_dir.join(name);
        assert!(path.is_file(), "missing chart {name}");
        assert!(printed.contains(&format!("-> {name}")));
    }
    assert_eq!(summary.charts().count(), CHARTS.len());
    // Nothing is downloaded when a local file is given.
    assert!(!config.cache_dir.exists());
}

#[test]
fn loan_tendency_breaks_ties_by_job_name() {
    let answers = fixture_answers();
    let loans = &answers[0];

    // admin., management and services all reach 75%; technician has 70%.
    assert_eq!(
        loans.value("Job most likely to hold a loan"),
        Some(&text("admin."))
    );
    assert_percent(loans.value("Share with any loan"), 75.0);
    assert_eq!(loans.value("Housing loans"), Some(&ReportValue::Count(13)));
    assert_eq!(loans.value("Personal loans"), Some(&ReportValue::Count(4)));
    assert_eq!(loans.value("Prevailing loan type"), Some(&text("housing")));
}

#[test]
fn contact_counts_follow_the_generated_data() {
    let answers = fixture_answers();
    let contacts = &answers[1];

    assert_eq!(
        contacts.value("Distinct contact counts"),
        Some(&ReportValue::Count(6))
    );
    assert_eq!(
        contacts.value("Contact count with the highest success rate"),
        Some(&text("3 (38.46%)"))
    );
    assert_eq!(
        contacts.value("Largest contact count with a success"),
        Some(&text("6"))
    );

    let calls = &answers[2];
    assert_number(calls.value("Mean number of calls"), 61.0 / 17.0);
    for label in ["95th", "99th"] {
        assert_number(
            calls.value(&format!("Calls at the {label} percentile of successes")),
            6.0,
        );
    }
    assert_percent(calls.value("Successes within 6 calls"), 100.0);
}

#[test]
fn previous_outcome_and_default_follow_the_generated_data() {
    let answers = fixture_answers();

    // poutcome == success on every eighth row: 10 clients.
    let previous = &answers[3];
    assert_eq!(
        previous.value("Clients with a previous success"),
        Some(&ReportValue::Count(10))
    );
    // Rows 0 and 24 and 48 are divisible by 3 and do not subscribe.
    assert_percent(previous.value("Current success after a previous success"), 70.0);

    // Every defaulter (i % 10 == 3) has i % 5 == 3, so none hold a personal loan.
    let insurance = &answers[4];
    assert_percent(insurance.value("Defaulters with a personal loan"), 0.0);
    assert_percent(insurance.value("Defaulters without a personal loan"), 100.0);
    assert_eq!(
        insurance.value("Median balance in default"),
        Some(&ReportValue::Currency(1191.0))
    );
    assert_eq!(
        insurance.value("Median balance not in default"),
        Some(&ReportValue::Currency(1122.5))
    );
    assert_percent(
        insurance.value("In default with balance above €1122.50"),
        50.0,
    );
    assert_percent(
        insurance.value("Not in default with balance below €1122.50"),
        50.0,
    );
}

#[test]
fn housing_profile_follows_the_generated_data() {
    let answers = fixture_answers();
    let housing = &answers[5];

    assert_number(housing.value("Mean age with a housing loan"), 2394.0 / 53.0);
    assert_number(housing.value("Mean age without a housing loan"), 1166.0 / 27.0);
    assert_percent(
        housing.value("Highest housing loan share (job = services)"),
        70.0,
    );
    assert_percent(
        housing.value("Highest housing loan share (education = tertiary)"),
        70.0,
    );
}

#[test]
fn schema_mismatch_stops_before_any_chart() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bank-full.csv");
    fs::write(&input, "\"age\";\"job\"\n30;\"admin.\"\n41;\"services\"\n").unwrap();
    let config = config(dir.path(), input);

    let mut out = Vec::new();
    let error = run(&config, &mut out).unwrap_err();

    assert!(format!("{error:#}").contains("bank marketing schema"));
    assert!(out.is_empty());
    assert!(!config.output_dir.exists());
}
