// Spreadsheet source implementation
// Author: Gabriel Demetrios Lafis

use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use log::debug;

use super::{DataError, Row, SourceFormat, Table, TableParser, Value};

/// Reads the first sheet of an `.xlsx` workbook.
///
/// Absolute row 0 is the header. Every row after it, up to the last
/// populated row, must hold at least one value.
#[derive(Debug, Clone, Default)]
pub struct XlsxParser;

impl XlsxParser {
    pub fn new() -> Self {
        XlsxParser
    }

    fn cell_to_value(cell: &Data) -> Value {
        match cell {
            Data::Empty => Value::Null,
            Data::Int(i) => Value::Integer(*i),
            Data::Float(f) => Value::Float(*f),
            Data::String(s) => Value::String(s.clone()),
            Data::Bool(b) => Value::Boolean(*b),
            Data::DateTime(dt) => Value::Float(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
            Data::Error(e) => Value::String(e.to_string()),
        }
    }

    fn is_blank(cell: Option<&Data>) -> bool {
        matches!(cell, None | Some(Data::Empty))
    }

    /// Build a table from a sheet range using absolute cell positions
    pub fn table_from_range(&self, range: &Range<Data>, name: &Path) -> Result<Table, DataError> {
        let (end_row, end_col) = range
            .end()
            .ok_or_else(|| DataError::parse(name, "first sheet is empty"))?;

        let header_width = (0..=end_col)
            .rev()
            .find(|&col| !Self::is_blank(range.get_value((0, col))))
            .map(|col| col + 1)
            .ok_or_else(|| DataError::parse(name, "header row 0 is empty"))?;

        let columns: Vec<String> = (0..header_width)
            .map(|col| {
                range
                    .get_value((0, col))
                    .map(|cell| Self::cell_to_value(cell).to_text())
                    .unwrap_or_default()
            })
            .collect();

        let mut table = Table::new(columns);

        for row in 1..=end_row {
            if (0..=end_col).all(|col| Self::is_blank(range.get_value((row, col)))) {
                return Err(DataError::parse(name, format!("sheet row {} is empty", row)));
            }

            let values: Vec<Value> = (0..header_width)
                .map(|col| {
                    range
                        .get_value((row, col))
                        .map_or(Value::Null, Self::cell_to_value)
                })
                .collect();

            table.add_row(Row::new(values))?;
        }

        Ok(table)
    }
}

impl TableParser for XlsxParser {
    fn parse(&self, path: &Path) -> Result<Table, DataError> {
        let mut workbook = open_workbook::<Xlsx<_>, _>(path)
            .map_err(|e: XlsxError| DataError::parse(path, e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataError::parse(path, "workbook has no sheets"))?
            .map_err(|e| DataError::parse(path, e.to_string()))?;

        let table = self.table_from_range(&range, path)?;

        debug!(
            "Parsed {} sheet rows x {} columns from {}",
            table.len(),
            table.column_count(),
            path.display()
        );

        Ok(table)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Spreadsheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[((u32, u32), Data)], end: (u32, u32)) -> Range<Data> {
        let mut range = Range::new((0, 0), end);
        for (pos, value) in cells {
            range.set_value(*pos, value.clone());
        }
        range
    }

    #[test]
    fn test_header_and_rows() {
        let range = sheet(
            &[
                ((0, 0), Data::String("name".to_string())),
                ((0, 1), Data::String("score".to_string())),
                ((1, 0), Data::String("ann".to_string())),
                ((1, 1), Data::Float(9.5)),
                ((2, 0), Data::String("bob".to_string())),
            ],
            (2, 1),
        );

        let table = XlsxParser::new().table_from_range(&range, Path::new("t.xlsx")).unwrap();

        assert_eq!(table.columns(), &["name".to_string(), "score".to_string()]);
        assert_eq!(table.rows()[0].values, vec![Value::from("ann"), Value::Float(9.5)]);
        assert_eq!(table.rows()[1].values, vec![Value::from("bob"), Value::Null]);
    }

    #[test]
    fn test_numeric_header_is_stringified() {
        let range = sheet(
            &[((0, 0), Data::Int(2024)), ((1, 0), Data::Bool(true))],
            (1, 0),
        );

        let table = XlsxParser::new().table_from_range(&range, Path::new("t.xlsx")).unwrap();

        assert_eq!(table.columns(), &["2024".to_string()]);
        assert_eq!(table.rows()[0].values, vec![Value::Boolean(true)]);
    }

    #[test]
    fn test_empty_row_in_range_is_parse_error() {
        let range = sheet(
            &[
                ((0, 0), Data::String("a".to_string())),
                ((1, 0), Data::Int(1)),
                ((3, 0), Data::Int(3)),
            ],
            (3, 0),
        );

        let err = XlsxParser::new()
            .table_from_range(&range, Path::new("t.xlsx"))
            .unwrap_err();

        match err {
            DataError::Parse { message, .. } => assert!(message.contains("row 2"), "{}", message),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_sheet_is_parse_error() {
        let range: Range<Data> = Range::empty();

        assert!(matches!(
            XlsxParser::new().table_from_range(&range, Path::new("t.xlsx")),
            Err(DataError::Parse { .. })
        ));
    }
}
