//! End-to-end run: load the dataset, answer every question, collect charts.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bank_chart::ChartRenderer;
use bank_ingest::{DEFAULT_DELIMITER, DatasetSource, fetch_and_extract, load_table};
use bank_model::{Table, validate_bank_schema};
use tracing::{info, info_span};

use crate::questions::{QUESTIONS, QuestionContext};
use crate::report::{Answer, SavedChart, write_answer};

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: DatasetSource,
    /// Holds the downloaded archive and its extracted entries.
    pub cache_dir: PathBuf,
    /// Receives the rendered PNG charts.
    pub output_dir: PathBuf,
    /// Local CSV to load instead of downloading.
    pub input: Option<PathBuf>,
    pub delimiter: u8,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: DatasetSource::default(),
            cache_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("images"),
            input: None,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub dataset: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub answers: Vec<Answer>,
    pub duration: Duration,
}

impl RunSummary {
    /// Every saved chart with the number of the question that produced it.
    pub fn charts(&self) -> impl Iterator<Item = (u8, &SavedChart)> {
        self.answers
            .iter()
            .flat_map(|answer| answer.charts().map(move |chart| (answer.number, chart)))
    }
}

/// Load the dataset and answer every question, writing answers to `out`.
pub fn run<W: Write>(config: &RunConfig, out: &mut W) -> Result<RunSummary> {
    let run_start = Instant::now();

    let load_span = info_span!("load", cache_dir = %config.cache_dir.display());
    let load_start = Instant::now();
    let (dataset, table) = load_span.in_scope(|| load_stage(config))?;
    info!(
        path = %dataset.display(),
        rows = table.height(),
        columns = table.width(),
        duration_ms = load_start.elapsed().as_millis(),
        "load complete"
    );

    let renderer = ChartRenderer::new(&config.output_dir);
    let answers = answer_questions(&table, &renderer, out)?;

    let duration = run_start.elapsed();
    info!(
        questions = answers.len(),
        duration_ms = duration.as_millis(),
        "run complete"
    );
    Ok(RunSummary {
        dataset,
        rows: table.height(),
        columns: table.width(),
        answers,
        duration,
    })
}

/// Resolve the dataset file and load it as a validated bank table.
pub fn load_stage(config: &RunConfig) -> Result<(PathBuf, Table)> {
    let dataset = match &config.input {
        Some(path) => path.clone(),
        None => fetch_and_extract(&config.source, &config.cache_dir)
            .with_context(|| format!("failed to fetch dataset from {}", config.source.url))?,
    };
    let table = load(&dataset, config.delimiter)?;
    Ok((dataset, table))
}

fn load(path: &Path, delimiter: u8) -> Result<Table> {
    let table = load_table(path, delimiter)
        .with_context(|| format!("failed to load {}", path.display()))?;
    validate_bank_schema(&table).context("dataset does not match the bank marketing schema")?;
    Ok(table)
}

/// Answer the questions in order, printing each answer as soon as it is ready.
pub fn answer_questions<W: Write>(
    table: &Table,
    renderer: &ChartRenderer,
    out: &mut W,
) -> Result<Vec<Answer>> {
    let ctx = QuestionContext { table, renderer };
    let mut answers = Vec::with_capacity(QUESTIONS.len());
    for (idx, question) in QUESTIONS.iter().enumerate() {
        let number = idx + 1;
        let span = info_span!("question", number);
        let answer = span.in_scope(|| -> Result<Answer> {
            let start = Instant::now();
            let answer = question(&ctx).with_context(|| format!("question {number} failed"))?;
            info!(
                charts = answer.charts().count(),
                duration_ms = start.elapsed().as_millis(),
                "question answered"
            );
            Ok(answer)
        })?;
        write_answer(out, &answer).context("failed to write answer")?;
        answers.push(answer);
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_relative_directories() {
        let config = RunConfig::default();
        assert_eq!(config.cache_dir, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from("images"));
        assert_eq!(config.delimiter, b';');
        assert!(config.input.is_none());
        assert_eq!(config.source.dataset_name, "bank-full.csv");
    }

    #[test]
    fn missing_input_file_fails_the_load_stage() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            input: Some(dir.path().join("bank-full.csv")),
            ..RunConfig::default()
        };
        let err = load_stage(&config).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }
}
