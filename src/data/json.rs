// JSON record array source implementation
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;
use serde_json::Value as JsonValue;

use super::{DataError, Row, SourceFormat, Table, TableParser, Value};

/// Parser for a JSON array of objects. The first object defines the columns.
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        JsonParser
    }

    /// Convert a JSON value to a cell value
    fn json_to_value(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::String(String::new()),
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or_else(|| Value::String(n.to_string()), Value::Float),
            },
            JsonValue::String(s) => Value::String(s.clone()),
            // Nested structures are shown as their JSON text
            JsonValue::Array(_) | JsonValue::Object(_) => Value::String(json.to_string()),
        }
    }

    /// Parse a record array from any reader. `name` identifies the source in errors.
    pub fn parse_reader<R: Read>(&self, reader: R, name: &Path) -> Result<Table, DataError> {
        let json: JsonValue =
            serde_json::from_reader(reader).map_err(|e| DataError::parse(name, e.to_string()))?;

        let records = json
            .as_array()
            .ok_or_else(|| DataError::parse(name, "JSON root is not an array of records"))?;

        let first = match records.first() {
            Some(first) => first
                .as_object()
                .ok_or_else(|| DataError::parse(name, "record 0 is not an object"))?,
            None => return Ok(Table::default()),
        };

        let columns: Vec<String> = first.keys().cloned().collect();
        let mut table = Table::new(columns);

        for (index, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or_else(|| {
                DataError::parse(name, format!("record {} is not an object", index))
            })?;

            let values: Vec<Value> = table
                .columns()
                .iter()
                .map(|column| {
                    obj.get(column)
                        .map_or_else(|| Value::String(String::new()), Self::json_to_value)
                })
                .collect();

            table.add_row(Row::new(values))?;
        }

        Ok(table)
    }
}

impl TableParser for JsonParser {
    fn parse(&self, path: &Path) -> Result<Table, DataError> {
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let table = self.parse_reader(BufReader::new(file), path)?;

        debug!(
            "Parsed {} records x {} keys from {}",
            table.len(),
            table.column_count(),
            path.display()
        );

        Ok(table)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::RecordArray
    }
}
