// Data module for the table model and its source formats
// Author: Gabriel Demetrios Lafis

mod csv;
mod json;
mod registry;
mod schema;
mod sqlite;
mod xlsx;

pub use self::csv::*;
pub use self::json::*;
pub use self::registry::*;
pub use self::schema::*;
pub use self::sqlite::*;
pub use self::xlsx::*;

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Parses one source file into a [`Table`]
#[cfg_attr(test, mockall::automock)]
pub trait TableParser: Send + Sync {
    /// Read the whole source at `path` into memory
    fn parse(&self, path: &Path) -> Result<Table, DataError>;

    /// Get the source format handled by this parser
    fn format(&self) -> SourceFormat;
}

/// The source kinds the viewer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    DelimitedText,
    RecordArray,
    Spreadsheet,
    QueryResult,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SourceFormat::DelimitedText => "delimited text",
            SourceFormat::RecordArray => "record array",
            SourceFormat::Spreadsheet => "spreadsheet",
            SourceFormat::QueryResult => "query result",
        };
        f.write_str(name)
    }
}

/// An ordered set of named columns and the rows beneath them.
///
/// Every row holds exactly one value per column. A table is built once,
/// by a parser or by the merger, and is never mutated after it is handed
/// to a [`crate::session::Session`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from columns and rows, checking every row's width
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, DataError> {
        let mut table = Table::new(columns);
        table.rows.reserve(rows.len());
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// Append a row, rejecting it if its width differs from the column count
    pub fn add_row(&mut self, row: Row) -> Result<(), DataError> {
        if row.len() != self.columns.len() {
            return Err(DataError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }

        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of rows in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Find the position of the first column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get a reference to a row by index
    pub fn get_row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Iterate over one column's cells in row order
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Split the table back into its columns and rows
    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }
}

/// A single row of cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    /// Create a new row with the given values
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    /// Get a reference to a value by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

/// A dynamically typed cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value the way it is shown in a cell and matched by search
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Binary(b) => base64::encode(b),
        }
    }

    /// Interpret the value as a finite real number.
    ///
    /// Integers and floats convert directly. Strings are trimmed and parsed;
    /// `NaN` and infinities are rejected. Nulls, booleans and binary data
    /// never convert.
    pub fn to_f64(&self) -> Option<f64> {
        let number = match self {
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            Value::Null | Value::Boolean(_) | Value::Binary(_) => return None,
        };

        if number.is_finite() {
            Some(number)
        } else {
            None
        }
    }

    /// Total order used for sorting cells.
    ///
    /// Cells rank by class first: nulls, then anything that reads as a
    /// number, then everything else. Numbers compare numerically and the
    /// rest by their textual rendering.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self.sort_class(), other.sort_class()) {
            (SortClass::Null, SortClass::Null) => Ordering::Equal,
            (SortClass::Number(a), SortClass::Number(b)) => a.total_cmp(&b),
            (SortClass::Text, SortClass::Text) => self.to_text().cmp(&other.to_text()),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn sort_class(&self) -> SortClass {
        match self {
            Value::Null => SortClass::Null,
            _ => self.to_f64().map_or(SortClass::Text, SortClass::Number),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SortClass {
    Null,
    Number(f64),
    Text,
}

impl SortClass {
    fn rank(self) -> u8 {
        match self {
            SortClass::Null => 0,
            SortClass::Number(_) => 1,
            SortClass::Text => 2,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Errors raised while reading a source into a table
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Unsupported file format '{extension}' for {path}")]
    UnsupportedFormat { path: String, extension: String },

    #[error("Failed to parse {name}: {message}")]
    Parse { name: String, message: String },

    #[error("Database query failed for {path}: {message}")]
    DatabaseQuery { path: String, message: String },

    #[error("Row {row} has {found} values but the table has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        DataError::Parse {
            name: path.display().to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_row_rejects_wrong_width() {
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        table.add_row(Row::new(vec![Value::from(1), Value::from(2)])).unwrap();

        let err = table.add_row(Row::new(vec![Value::from(3)])).unwrap_err();
        assert!(matches!(err, DataError::RowWidth { row: 1, expected: 2, found: 1 }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_value_to_f64() {
        assert_eq!(Value::from(" 2.5 ").to_f64(), Some(2.5));
        assert_eq!(Value::Integer(4).to_f64(), Some(4.0));
        assert_eq!(Value::from("x").to_f64(), None);
        assert_eq!(Value::from("NaN").to_f64(), None);
        assert_eq!(Value::from("inf").to_f64(), None);
        assert_eq!(Value::Null.to_f64(), None);
        assert_eq!(Value::Boolean(true).to_f64(), None);
    }

    #[test]
    fn test_value_compare() {
        assert_eq!(Value::from("10").compare(&Value::from("9")), Ordering::Greater);
        assert_eq!(Value::Integer(2).compare(&Value::from("2.0")), Ordering::Equal);
        assert_eq!(Value::from("apple").compare(&Value::from("banana")), Ordering::Less);
        assert_eq!(Value::Null.compare(&Value::Integer(-5)), Ordering::Less);
    }

    #[test]
    fn test_value_compare_ranks_numbers_before_text() {
        let id = Value::from("1a");

        assert_eq!(id.compare(&Value::from("9")), Ordering::Greater);
        assert_eq!(id.compare(&Value::from("10")), Ordering::Greater);
        assert_eq!(Value::from("9").compare(&Value::from("10")), Ordering::Less);
        assert_eq!(Value::Boolean(true).compare(&Value::Float(1e9)), Ordering::Greater);
        assert_eq!(Value::Null.compare(&id), Ordering::Less);
        assert_eq!(id.compare(&Value::from("1b")), Ordering::Less);
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Float(2.5).to_text(), "2.5");
        assert_eq!(Value::Boolean(false).to_text(), "false");
        assert_eq!(Value::Binary(vec![0xff, 0x00]).to_text(), "/wA=");
    }
}
