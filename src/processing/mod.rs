// Processing module for derived views and queries over a table
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod filter;
mod merge;
mod sort;
mod stats;

pub use aggregate::*;
pub use filter::*;
pub use merge::*;
pub use sort::*;
pub use stats::*;

use thiserror::Error;

use crate::data::{DataError, Table, Value};

/// Represents an error in the processing module
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Cannot interpret '{value}' as a number{}", in_column(.column))]
    NumericCoercion {
        value: String,
        column: Option<String>,
    },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn in_column(column: &Option<String>) -> String {
    column
        .as_deref()
        .map(|c| format!(" in column '{}'", c))
        .unwrap_or_default()
}

/// Find a column by name
pub(crate) fn resolve_column(table: &Table, name: &str) -> Result<usize, ProcessingError> {
    table
        .column_index(name)
        .ok_or_else(|| ProcessingError::ColumnNotFound(name.to_string()))
}

/// Coerce one cell to a number, naming the cell in the error
pub(crate) fn coerce(value: &Value, column: Option<&str>) -> Result<f64, ProcessingError> {
    value.to_f64().ok_or_else(|| ProcessingError::NumericCoercion {
        value: value.to_text(),
        column: column.map(str::to_string),
    })
}
