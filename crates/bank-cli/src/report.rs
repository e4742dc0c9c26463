//! Console formatting of question answers.
//!
//! Formatting is pure: every function returns strings, and [`write_answer`]
//! only forwards them to a writer.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

const RULE_WIDTH: usize = 70;

/// A typed value printed next to a label.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportValue {
    Count(usize),
    /// Already scaled to 0..100.
    Percent(f64),
    Number {
        value: f64,
        decimals: usize,
        unit: &'static str,
    },
    /// Euro amount.
    Currency(f64),
    PValue(f64),
    Text(String),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Percent(value) => write!(f, "{value:.2}%"),
            Self::Number {
                value,
                decimals,
                unit,
            } => {
                write!(f, "{value:.decimals$}")?;
                if !unit.is_empty() {
                    write!(f, " {unit}")?;
                }
                Ok(())
            }
            Self::Currency(value) => write!(f, "€{value:.2}"),
            Self::PValue(value) => write!(f, "{value:.4}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One `label: value` line of an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub label: String,
    pub value: ReportValue,
}

impl ReportLine {
    pub fn new(label: impl Into<String>, value: ReportValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn count(label: impl Into<String>, count: usize) -> Self {
        Self::new(label, ReportValue::Count(count))
    }

    pub fn percent(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, ReportValue::Percent(value))
    }

    pub fn number(label: impl Into<String>, value: f64, decimals: usize) -> Self {
        Self::new(
            label,
            ReportValue::Number {
                value,
                decimals,
                unit: "",
            },
        )
    }

    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(label, ReportValue::Text(text.into()))
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// A chart written while answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedChart {
    pub title: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Answer content in print order.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerItem {
    Line(ReportLine),
    Chart(SavedChart),
}

/// The printed answer to one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub number: u8,
    pub title: &'static str,
    pub items: Vec<AnswerItem>,
}

impl Answer {
    pub fn new(number: u8, title: &'static str) -> Self {
        Self {
            number,
            title,
            items: Vec::new(),
        }
    }

    pub fn line(&mut self, line: ReportLine) {
        self.items.push(AnswerItem::Line(line));
    }

    pub fn chart(&mut self, chart: SavedChart) {
        self.items.push(AnswerItem::Chart(chart));
    }

    pub fn lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.items.iter().filter_map(|item| match item {
            AnswerItem::Line(line) => Some(line),
            AnswerItem::Chart(_) => None,
        })
    }

    pub fn charts(&self) -> impl Iterator<Item = &SavedChart> {
        self.items.iter().filter_map(|item| match item {
            AnswerItem::Chart(chart) => Some(chart),
            AnswerItem::Line(_) => None,
        })
    }

    /// Value of the first line with `label`.
    pub fn value(&self, label: &str) -> Option<&ReportValue> {
        self.lines()
            .find(|line| line.label == label)
            .map(|line| &line.value)
    }
}

/// Three-line banner opening a question.
pub fn banner(number: u8, title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let heading = format!(" Question {number}: {title} ");
    format!("{rule}\n{heading:=^RULE_WIDTH$}\n{rule}")
}

pub fn saved_chart_line(chart: &SavedChart) -> String {
    format!("Saved chart: {} -> {}", chart.title, chart.file_name)
}

/// Full text of an answer, banner included.
pub fn format_answer(answer: &Answer) -> String {
    let mut lines = vec![banner(answer.number, answer.title)];
    for item in &answer.items {
        lines.push(match item {
            AnswerItem::Line(line) => line.to_string(),
            AnswerItem::Chart(chart) => saved_chart_line(chart),
        });
    }
    lines.join("\n")
}

pub fn write_answer<W: Write>(out: &mut W, answer: &Answer) -> io::Result<()> {
    writeln!(out, "{}", format_answer(answer))
}
