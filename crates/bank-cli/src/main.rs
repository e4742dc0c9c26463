//! bank-insights CLI.

use std::io::{self, IsTerminal};

use anyhow::{Result, bail};
use bank_cli::logging::{LogConfig, LogFormat, init_logging};
use bank_cli::pipeline::{RunConfig, run};
use bank_ingest::DatasetSource;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run_from_cli(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_from_cli(cli: &Cli) -> Result<()> {
    let config = run_config_from_cli(cli)?;
    let stdout = io::stdout();
    let summary = run(&config, &mut stdout.lock())?;
    if !cli.no_summary {
        print_summary(&summary);
    }
    Ok(())
}

fn run_config_from_cli(cli: &Cli) -> Result<RunConfig> {
    if !cli.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got {:?}", cli.delimiter);
    }
    Ok(RunConfig {
        source: DatasetSource {
            url: cli.url.clone(),
            archive_name: cli.archive_name.clone(),
            dataset_name: cli.dataset_name.clone(),
            sha256: cli.sha256.clone(),
        },
        cache_dir: cli.cache_dir.clone(),
        output_dir: cli.output_dir.clone(),
        input: cli.input.clone(),
        delimiter: cli.delimiter as u8,
    })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
