// SQLite query result source implementation
// Author: Gabriel Demetrios Lafis

use std::path::Path;

use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::{DataError, Row, SourceFormat, Table, TableParser, Value};

/// The table every database source is read from.
pub const QUERY_TABLE_NAME: &str = "table_name";

/// Runs a fixed `SELECT *` against an SQLite database file
#[derive(Debug, Clone, Default)]
pub struct SqliteParser;

impl SqliteParser {
    pub fn new() -> Self {
        SqliteParser
    }

    /// The query executed against every database
    pub fn query() -> String {
        format!("SELECT * FROM {}", QUERY_TABLE_NAME)
    }

    fn cell_to_value(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Float(f),
            ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).to_string()),
            ValueRef::Blob(b) => match std::str::from_utf8(b) {
                Ok(s) => Value::String(s.to_string()),
                Err(_) => Value::Binary(b.to_vec()),
            },
        }
    }

    /// Read the query result from an open connection
    pub fn table_from_connection(&self, conn: &Connection, path: &Path) -> Result<Table, DataError> {
        let query_error = |e: rusqlite::Error| DataError::DatabaseQuery {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut stmt = conn.prepare(&Self::query()).map_err(query_error)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = columns.len();
        let mut table = Table::new(columns);

        let mut rows = stmt.query([]).map_err(query_error)?;
        while let Some(row) = rows.next().map_err(query_error)? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(Self::cell_to_value(row.get_ref(i).map_err(query_error)?));
            }
            table.add_row(Row::new(values))?;
        }

        Ok(table)
    }
}

impl TableParser for SqliteParser {
    fn parse(&self, path: &Path) -> Result<Table, DataError> {
        // Read-only so a missing file fails instead of creating an empty database
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
            |e| DataError::DatabaseQuery {
                path: path.display().to_string(),
                message: format!("failed to open database: {}", e),
            },
        )?;

        let table = self.table_from_connection(&conn, path)?;

        debug!(
            "Read {} rows x {} columns from {} ({})",
            table.len(),
            table.column_count(),
            path.display(),
            QUERY_TABLE_NAME
        );

        Ok(table)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::QueryResult
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db(sql: &str) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(sql).unwrap();
        conn
    }

    #[test]
    fn test_reads_columns_and_rows_in_order() {
        let conn = memory_db(
            "CREATE TABLE table_name (id INTEGER, label TEXT, weight REAL, raw BLOB);
             INSERT INTO table_name VALUES (1, 'one', 1.5, x'ff00');
             INSERT INTO table_name VALUES (2, NULL, 2.0, x'6869');",
        );

        let table = SqliteParser::new()
            .table_from_connection(&conn, Path::new("mem.db"))
            .unwrap();

        assert_eq!(
            table.columns(),
            &["id".to_string(), "label".to_string(), "weight".to_string(), "raw".to_string()]
        );
        assert_eq!(
            table.rows()[0].values,
            vec![
                Value::Integer(1),
                Value::from("one"),
                Value::Float(1.5),
                Value::Binary(vec![0xff, 0x00]),
            ]
        );
        assert_eq!(table.rows()[1].values[1], Value::Null);
        assert_eq!(table.rows()[1].values[3], Value::from("hi"));
    }

    #[test]
    fn test_missing_table_is_query_error() {
        let conn = memory_db("CREATE TABLE other (x INTEGER);");

        let err = SqliteParser::new()
            .table_from_connection(&conn, Path::new("mem.db"))
            .unwrap_err();

        match err {
            DataError::DatabaseQuery { path, message } => {
                assert_eq!(path, "mem.db");
                assert!(message.contains("table_name"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        assert!(matches!(
            SqliteParser::new().parse(&path),
            Err(DataError::DatabaseQuery { .. })
        ));
        assert!(!path.exists());
    }
}
