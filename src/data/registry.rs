// Extension to parser dispatch
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use super::{CsvParser, DataError, JsonParser, SqliteParser, Table, TableParser, XlsxParser};
use crate::utils::LoaderConfig;

/// Maps lowercase file extensions to the parser that reads them
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, Arc<dyn TableParser>>,
}

impl ParserRegistry {
    /// Create a registry with no parsers
    pub fn new() -> Self {
        ParserRegistry {
            parsers: BTreeMap::new(),
        }
    }

    /// Create a registry with the `csv`, `json`, `xlsx` and `db` parsers
    ///
    /// A non-ASCII `csv_delimiter` falls back to a comma with a warning.
    pub fn with_defaults(config: &LoaderConfig) -> Self {
        let csv = CsvParser::from_char(config.csv_delimiter).unwrap_or_else(|| {
            warn!(
                "csv_delimiter {:?} is not ASCII, using ','",
                config.csv_delimiter
            );
            CsvParser::default()
        });

        ParserRegistry::new()
            .with("csv", csv)
            .with("json", JsonParser::new())
            .with("xlsx", XlsxParser::new())
            .with("db", SqliteParser::new())
    }

    /// Builder form of [`ParserRegistry::register`]
    pub fn with<P: TableParser + 'static>(mut self, extension: &str, parser: P) -> Self {
        self.register(extension, parser);
        self
    }

    /// Register a parser for an extension, replacing any previous one
    pub fn register<P: TableParser + 'static>(&mut self, extension: &str, parser: P) {
        self.parsers.insert(extension.to_lowercase(), Arc::new(parser));
    }

    /// Get the parser for a path, failing for unknown extensions
    pub fn parser_for(&self, path: &Path) -> Result<&dyn TableParser, DataError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        self.parsers
            .get(&extension)
            .map(|parser| &**parser)
            .ok_or_else(|| DataError::UnsupportedFormat {
                path: path.display().to_string(),
                extension,
            })
    }

    /// Parse a file with the parser registered for its extension
    pub fn parse_path(&self, path: &Path) -> Result<Table, DataError> {
        let parser = self.parser_for(path)?;
        debug!("Reading {} as {}", path.display(), parser.format());
        parser.parse(path)
    }

    /// The registered extensions, sorted
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.parsers.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("extensions", &self.supported_extensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MockTableParser, Row, SourceFormat, Value};

    #[test]
    fn test_default_extensions() {
        let registry = ParserRegistry::with_defaults(&LoaderConfig::default());

        assert_eq!(registry.supported_extensions(), vec!["csv", "db", "json", "xlsx"]);
    }

    #[test]
    fn test_non_ascii_delimiter_falls_back_to_comma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let config = LoaderConfig { csv_delimiter: 'é' };
        let table = ParserRegistry::with_defaults(&config).parse_path(&path).unwrap();

        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        let mut parser = MockTableParser::new();
        parser.expect_format().return_const(SourceFormat::DelimitedText);
        parser.expect_parse().times(1).returning(|_| {
            Table::from_rows(vec!["a".to_string()], vec![Row::new(vec![Value::from("1")])])
        });

        let registry = ParserRegistry::new().with("csv", parser);
        let table = registry.parse_path(Path::new("DATA.CSV")).unwrap();

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unknown_extension_is_rejected_before_parsing() {
        let mut parser = MockTableParser::new();
        parser.expect_parse().never();

        let registry = ParserRegistry::new().with("csv", parser);

        match registry.parse_path(Path::new("notes.txt")) {
            Err(DataError::UnsupportedFormat { path, extension }) => {
                assert_eq!(path, "notes.txt");
                assert_eq!(extension, "txt");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(matches!(
            registry.parse_path(Path::new("no_extension")),
            Err(DataError::UnsupportedFormat { .. })
        ));
    }
}
