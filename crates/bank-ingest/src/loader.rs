//! CSV loading into a typed [`Table`].

use std::path::Path;
use std::time::Instant;

use bank_model::{Column, Table};
use polars::prelude::{Column as FrameColumn, CsvReadOptions, DataFrame, DataType, SerReader};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};

/// Column delimiter of `bank-full.csv`.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Rows sampled for schema inference.
const INFER_SCHEMA_ROWS: usize = 1000;

/// Reads a delimited file into a [`Table`].
///
/// Rows holding any missing value are dropped. String columns become
/// categorical, integer and float columns numeric; any other dtype is
/// rejected.
pub fn load_table(path: &Path, delimiter: u8) -> Result<Table> {
    let start = Instant::now();
    let df = read_frame(path, delimiter)?;

    let rows_read = df.height();
    let df = df.drop_nulls::<String>(None)?;
    let dropped = rows_read - df.height();
    if dropped > 0 {
        warn!(path = %path.display(), dropped, "dropped rows with missing values");
    }
    if df.height() == 0 {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let table = table_from_frame(&df)?;
    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        duration_ms = start.elapsed().as_millis(),
        "dataset loaded"
    );
    Ok(table)
}

/// Converts a null-free DataFrame into a [`Table`].
pub fn table_from_frame(df: &DataFrame) -> Result<Table> {
    let columns = df
        .get_columns()
        .iter()
        .map(convert_column)
        .collect::<Result<Vec<_>>>()?;
    Ok(Table::new(columns)?)
}

fn read_frame(path: &Path, delimiter: u8) -> Result<DataFrame> {
    let parse_error = |e: polars::prelude::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|options| options.with_separator(delimiter))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)
}

fn convert_column(column: &FrameColumn) -> Result<Column> {
    let name = column.name().to_string();
    let dtype = column.dtype();
    let series = column.as_materialized_series();

    if matches!(dtype, DataType::String) {
        let labels = series
            .str()?
            .iter()
            .map(|value| value.ok_or_else(|| null_error(&name)))
            .collect::<Result<Vec<&str>>>()?;
        debug!(column = %name, "tagged categorical");
        Ok(Column::categorical(name, labels))
    } else if dtype.is_integer() || dtype.is_float() {
        let casted = series.cast(&DataType::Float64)?;
        let values = casted
            .f64()?
            .iter()
            .map(|value| value.ok_or_else(|| null_error(&name)))
            .collect::<Result<Vec<f64>>>()?;
        Ok(Column::numeric(name, values))
    } else {
        Err(IngestError::UnsupportedColumn {
            column: name,
            dtype: dtype.to_string(),
        })
    }
}

fn null_error(column: &str) -> IngestError {
    IngestError::UnexpectedNull {
        column: column.to_string(),
    }
}
