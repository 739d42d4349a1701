// Schema-consistent merging of tables loaded together
// Author: Gabriel Demetrios Lafis

use log::{debug, warn};

use super::ProcessingError;
use crate::data::{describe_mismatch, Table};

/// Message shown when the files of one load do not share a header
pub const SCHEMA_MISMATCH_WARNING: &str =
    "Headers do not match across files. Displaying the first file only.";

/// The result of merging a multi-file load.
///
/// A mismatch is a degraded success: `table` is the first input alone,
/// `matched` is false and the caller is expected to surface [`MergeOutcome::warning`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: Table,
    pub matched: bool,
    /// Input positions whose columns differ from the first table's
    pub mismatched: Vec<usize>,
}

impl MergeOutcome {
    /// The non-fatal warning to present, if any
    pub fn warning(&self) -> Option<&'static str> {
        if self.matched {
            None
        } else {
            Some(SCHEMA_MISMATCH_WARNING)
        }
    }
}

/// Merge tables that should share one schema.
///
/// When every table has the first table's columns, the rows are
/// concatenated in input order. Otherwise the first table is returned on
/// its own with `matched = false`.
pub fn merge(tables: Vec<Table>) -> Result<MergeOutcome, ProcessingError> {
    let mut tables = tables.into_iter();
    let first = tables
        .next()
        .ok_or_else(|| ProcessingError::InvalidArgument("no tables to merge".to_string()))?;

    let rest: Vec<Table> = tables.collect();
    if rest.is_empty() {
        return Ok(MergeOutcome {
            table: first,
            matched: true,
            mismatched: Vec::new(),
        });
    }

    let mismatched: Vec<usize> = rest
        .iter()
        .enumerate()
        .filter(|(_, table)| table.columns() != first.columns())
        .map(|(i, _)| i + 1)
        .collect();

    if !mismatched.is_empty() {
        for &i in &mismatched {
            warn!(
                "Table {} does not match the first table's columns: {}",
                i,
                describe_mismatch(first.columns(), rest[i - 1].columns())
            );
        }
        return Ok(MergeOutcome {
            table: first,
            matched: false,
            mismatched,
        });
    }

    let total = first.len() + rest.iter().map(Table::len).sum::<usize>();
    let (columns, mut rows) = first.into_parts();
    rows.reserve(total - rows.len());
    for table in rest {
        let (_, more) = table.into_parts();
        rows.extend(more);
    }

    debug!("Merged {} rows across {} columns", rows.len(), columns.len());

    Ok(MergeOutcome {
        table: Table::from_rows(columns, rows)?,
        matched: true,
        mismatched: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Row, Value};

    fn table(columns: &[&str], rows: &[&[i64]]) -> Table {
        Table::from_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| Row::new(r.iter().map(|&v| Value::Integer(v)).collect()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_table_is_identity() {
        let t = table(&["a", "b"], &[&[1, 2]]);

        let outcome = merge(vec![t.clone()]).unwrap();

        assert_eq!(outcome.table, t);
        assert!(outcome.matched);
        assert_eq!(outcome.warning(), None);
    }

    #[test]
    fn test_matching_tables_concatenate_in_order() {
        let t1 = table(&["a", "b"], &[&[1, 2], &[3, 4]]);
        let t2 = table(&["a", "b"], &[&[5, 6]]);
        let t3 = table(&["a", "b"], &[]);

        let outcome = merge(vec![t1.clone(), t2.clone(), t3]).unwrap();

        assert!(outcome.matched);
        let expected: Vec<Row> = t1.rows().iter().chain(t2.rows()).cloned().collect();
        assert_eq!(outcome.table.rows(), expected.as_slice());
        assert_eq!(outcome.table.columns(), t1.columns());
    }

    #[test]
    fn test_mismatch_returns_first_table() {
        let t1 = table(&["a", "b"], &[&[1, 2]]);
        let t2 = table(&["b", "a"], &[&[3, 4]]);
        let t3 = table(&["a", "b"], &[&[5, 6]]);

        let outcome = merge(vec![t1.clone(), t2, t3]).unwrap();

        assert_eq!(outcome.table, t1);
        assert!(!outcome.matched);
        assert_eq!(outcome.mismatched, vec![1]);
        assert_eq!(outcome.warning(), Some(SCHEMA_MISMATCH_WARNING));
    }

    #[test]
    fn test_no_tables_is_invalid_argument() {
        assert!(matches!(merge(Vec::new()), Err(ProcessingError::InvalidArgument(_))));
    }
}
