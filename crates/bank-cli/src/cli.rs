//! CLI argument definitions for bank-insights.

use std::path::PathBuf;

use bank_ingest::{DEFAULT_ARCHIVE_NAME, DEFAULT_DATASET_NAME, DEFAULT_DATASET_URL};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bank-insights",
    version,
    about = "Answer six marketing questions about the UCI Bank Marketing dataset",
    long_about = "Download the UCI Bank Marketing dataset, answer six questions about \
                  loans, call counts and campaign outcomes, and save the supporting \
                  charts as PNG files.\n\n\
                  Answers are printed to stdout; logs go to stderr."
)]
pub struct Cli {
    /// URL of the zipped dataset.
    #[arg(long = "url", value_name = "URL", default_value = DEFAULT_DATASET_URL)]
    pub url: String,

    /// File name the downloaded archive is stored under.
    #[arg(long = "archive-name", value_name = "NAME", default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    /// CSV entry to load from the archive.
    #[arg(long = "dataset-name", value_name = "NAME", default_value = DEFAULT_DATASET_NAME)]
    pub dataset_name: String,

    /// Expected SHA-256 of the download (hex). Skipped when absent.
    #[arg(long = "sha256", value_name = "HEX")]
    pub sha256: Option<String>,

    /// Directory holding the download and extracted files.
    #[arg(long = "cache-dir", value_name = "DIR", default_value = "data")]
    pub cache_dir: PathBuf,

    /// Directory receiving the PNG charts.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "images")]
    pub output_dir: PathBuf,

    /// Read this CSV instead of downloading the dataset.
    #[arg(long = "input", value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Field delimiter of the CSV.
    #[arg(long = "delimiter", value_name = "CHAR", default_value_t = ';')]
    pub delimiter: char,

    /// Skip the run summary table printed after the answers.
    #[arg(long = "no-summary")]
    pub no_summary: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
