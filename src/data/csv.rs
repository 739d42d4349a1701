// Delimited text source implementation
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::{DataError, Row, SourceFormat, Table, TableParser, Value};

/// Delimited text parser. The first record is the header.
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    /// Create a new parser splitting fields on the byte `delimiter`
    pub fn new(delimiter: u8) -> Self {
        CsvParser { delimiter }
    }

    /// Create a parser from a character delimiter, which must be ASCII
    pub fn from_char(delimiter: char) -> Option<Self> {
        if delimiter.is_ascii() {
            Some(CsvParser::new(delimiter as u8))
        } else {
            None
        }
    }

    /// Parse delimited text from any reader. `name` identifies the source in errors.
    pub fn parse_reader<R: Read>(&self, reader: R, name: &Path) -> Result<Table, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let header = csv_reader
            .headers()
            .map_err(|e| DataError::parse(name, e.to_string()))?
            .clone();

        // A repeated header name keeps its first position but reads the
        // field of its last occurrence.
        let mut columns: Vec<String> = Vec::with_capacity(header.len());
        let mut positions: Vec<usize> = Vec::with_capacity(header.len());
        for (i, field) in header.iter().enumerate() {
            match columns.iter().position(|c| c == field) {
                Some(existing) => positions[existing] = i,
                None => {
                    columns.push(field.to_string());
                    positions.push(i);
                }
            }
        }

        if columns.len() < header.len() {
            debug!(
                "{}: {} duplicate header name(s) collapsed",
                name.display(),
                header.len() - columns.len()
            );
        }

        let mut table = Table::new(columns);

        for result in csv_reader.records() {
            let record = result.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                DataError::parse(name, format!("line {}: {}", line, e))
            })?;

            let values: Vec<Value> = positions
                .iter()
                .map(|&i| Value::String(record.get(i).unwrap_or_default().to_string()))
                .collect();

            table.add_row(Row::new(values))?;
        }

        Ok(table)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        CsvParser::new(b',')
    }
}

impl TableParser for CsvParser {
    fn parse(&self, path: &Path) -> Result<Table, DataError> {
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let table = self.parse_reader(BufReader::new(file), path)?;

        debug!(
            "Parsed {} rows x {} columns from {}",
            table.len(),
            table.column_count(),
            path.display()
        );

        Ok(table)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::DelimitedText
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Table, DataError> {
        CsvParser::default().parse_reader(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_header_and_row() {
        let table = parse("a,b\n1,2\n").unwrap();

        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].values, vec![Value::from("1"), Value::from("2")]);
    }

    #[test]
    fn test_field_count_mismatch_is_parse_error() {
        let err = parse("a,b\n1,2\n3\n").unwrap_err();

        match err {
            DataError::Parse { name, message } => {
                assert_eq!(name, "test.csv");
                assert!(message.contains("line 3"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_header_reads_last_field() {
        let table = parse("a,b,a\n1,2,3\n").unwrap();

        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.rows()[0].values, vec![Value::from("3"), Value::from("2")]);
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        let table = parse("").unwrap();

        assert_eq!(table.column_count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_custom_delimiter() {
        let table = CsvParser::new(b';')
            .parse_reader("x;y\nfoo;bar\n".as_bytes(), Path::new("semi.csv"))
            .unwrap();

        assert_eq!(table.rows()[0].values, vec![Value::from("foo"), Value::from("bar")]);
    }

    #[test]
    fn test_char_delimiter_must_be_ascii() {
        assert!(CsvParser::from_char('é').is_none());
        assert!(CsvParser::from_char('\u{13b}').is_none());

        let table = CsvParser::from_char('\t')
            .unwrap()
            .parse_reader("x\ty\n1\t2\n".as_bytes(), Path::new("tabs.csv"))
            .unwrap();
        assert_eq!(table.columns(), &["x".to_string(), "y".to_string()]);
    }
}
