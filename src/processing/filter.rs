// Search filtering over table rows
// Author: Gabriel Demetrios Lafis

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::data::{Row, Table};

/// Row-visibility predicate derived from the search box text.
///
/// The text is tried as a case-insensitive regular expression first; text
/// that does not compile is matched as a plain case-insensitive substring.
#[derive(Debug, Clone)]
pub enum SearchFilter {
    /// Blank search text, every row is visible
    All,
    Pattern(Regex),
    /// Lowercased needle
    Literal(String),
}

impl SearchFilter {
    pub fn new(text: &str) -> Self {
        if text.trim().is_empty() {
            return SearchFilter::All;
        }

        match RegexBuilder::new(text).case_insensitive(true).build() {
            Ok(regex) => SearchFilter::Pattern(regex),
            Err(err) => {
                debug!("Search text {:?} is not a valid pattern ({}), matching literally", text, err);
                SearchFilter::Literal(text.to_lowercase())
            }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SearchFilter::All)
    }

    /// Whether any cell of the row matches
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Pattern(regex) => row.iter().any(|v| regex.is_match(&v.to_text())),
            SearchFilter::Literal(needle) => row
                .iter()
                .any(|v| v.to_text().to_lowercase().contains(needle.as_str())),
        }
    }
}

impl Default for SearchFilter {
    fn default() -> Self {
        SearchFilter::All
    }
}

/// Build the row predicate for a search string
pub fn build_predicate(text: &str) -> impl Fn(&Row) -> bool + Send + Sync {
    let filter = SearchFilter::new(text);
    move |row| filter.matches(row)
}

/// Indices of the rows accepted by `filter`, in table order
pub fn filter_rows(table: &Table, filter: &SearchFilter) -> Vec<usize> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| filter.matches(row))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn row(cells: &[&str]) -> Row {
        Row::new(cells.iter().map(|&c| Value::from(c)).collect())
    }

    #[test]
    fn test_blank_text_accepts_everything() {
        assert!(SearchFilter::new("").is_all());
        assert!(SearchFilter::new("   ").is_all());
        assert!(build_predicate("")(&row(&[])));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let predicate = build_predicate("ALI");

        assert!(predicate(&row(&["1", "Alice"])));
        assert!(!predicate(&row(&["2", "Bob"])));
    }

    #[test]
    fn test_matches_non_string_cells() {
        let predicate = build_predicate("2.5");

        assert!(predicate(&Row::new(vec![Value::Null, Value::Float(12.5)])));
        assert!(!predicate(&Row::new(vec![Value::Integer(25)])));
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_literal() {
        let filter = SearchFilter::new("f(x");

        assert!(matches!(filter, SearchFilter::Literal(_)));
        assert!(filter.matches(&row(&["F(X) = 1"])));
        assert!(!filter.matches(&row(&["fx"])));
    }

    #[test]
    fn test_filter_rows_keeps_table_order() {
        let table = Table::from_rows(
            vec!["name".to_string()],
            vec![row(&["carol"]), row(&["dave"]), row(&["caroline"])],
        )
        .unwrap();

        assert_eq!(filter_rows(&table, &SearchFilter::new("carol")), vec![0, 2]);
        assert_eq!(filter_rows(&table, &SearchFilter::All), vec![0, 1, 2]);
    }
}
