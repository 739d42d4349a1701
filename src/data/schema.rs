// Schema queries over tables
// Author: Gabriel Demetrios Lafis

use super::Table;

/// The column names of a table, in order.
///
/// This is what the boundary layer calls whenever it refreshes anything
/// derived from the current columns (column pickers, header labels).
pub fn schema_of(table: &Table) -> Vec<String> {
    table.columns().to_vec()
}

/// Whether two tables have exactly the same columns in the same order
pub fn schemas_match(left: &Table, right: &Table) -> bool {
    left.columns() == right.columns()
}

/// Describe how `other` differs from `expected` for a user-facing message
pub fn describe_mismatch(expected: &[String], other: &[String]) -> String {
    let missing: Vec<&str> = expected
        .iter()
        .filter(|c| !other.contains(c))
        .map(String::as_str)
        .collect();
    let extra: Vec<&str> = other
        .iter()
        .filter(|c| !expected.contains(c))
        .map(String::as_str)
        .collect();

    if missing.is_empty() && extra.is_empty() {
        if expected.len() == other.len() {
            return "same columns in a different order".to_string();
        }
        return format!("{} columns instead of {}", other.len(), expected.len());
    }

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing [{}]", missing.join(", ")));
    }
    if !extra.is_empty() {
        parts.push(format!("unexpected [{}]", extra.join(", ")));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_schema_of_keeps_order() {
        let table = Table::new(names(&["b", "a"]));
        assert_eq!(schema_of(&table), names(&["b", "a"]));
    }

    #[test]
    fn test_schemas_match_is_order_sensitive() {
        let ab = Table::new(names(&["a", "b"]));
        let ba = Table::new(names(&["b", "a"]));

        assert!(schemas_match(&ab, &ab.clone()));
        assert!(!schemas_match(&ab, &ba));
    }

    #[test]
    fn test_describe_mismatch() {
        assert_eq!(
            describe_mismatch(&names(&["a", "b"]), &names(&["a", "c"])),
            "missing [b]; unexpected [c]"
        );
        assert_eq!(
            describe_mismatch(&names(&["a", "b"]), &names(&["b", "a"])),
            "same columns in a different order"
        );
        assert_eq!(
            describe_mismatch(&names(&["a"]), &names(&["a", "a"])),
            "2 columns instead of 1"
        );
    }
}
