// Session state holding the currently displayed table
// Author: Gabriel Demetrios Lafis

use std::path::Path;

use log::{info, warn};

use crate::data::{schema_of, ParserRegistry, Table};
use crate::processing::{
    build_dataset, column_stats, filter_rows, merge, ChartDataset, ChartKind, ProcessingError,
    SearchFilter, SortState, StatisticsResult,
};
use crate::utils::{AppResult, Config};

/// Summary of a completed load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub files: usize,
    pub rows: usize,
    pub columns: usize,
    /// False when the files disagreed on their header and only the first is shown
    pub matched: bool,
    pub warning: Option<String>,
}

/// The viewer's current state: one table, its sort keys and the search text.
///
/// Loads replace the table wholesale and only after every file parsed,
/// so a failed load leaves the previous table in place.
#[derive(Debug)]
pub struct Session {
    registry: ParserRegistry,
    table: Option<Table>,
    sort: SortState,
    search: String,
    filter: SearchFilter,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Session::with_registry(ParserRegistry::with_defaults(&config.loader))
    }

    pub fn with_registry(registry: ParserRegistry) -> Self {
        Session {
            registry,
            table: None,
            sort: SortState::new(),
            search: String::new(),
            filter: SearchFilter::All,
        }
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Load one or more files as the new current table
    pub fn load_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> AppResult<LoadReport> {
        if paths.is_empty() {
            return Err(ProcessingError::InvalidArgument("no files selected".to_string()).into());
        }

        let mut tables = Vec::with_capacity(paths.len());
        for path in paths {
            tables.push(self.registry.parse_path(path.as_ref())?);
        }

        let outcome = merge(tables)?;
        let warning = outcome.warning().map(str::to_string);
        if let Some(message) = &warning {
            warn!("{}", message);
        }

        let report = LoadReport {
            files: paths.len(),
            rows: outcome.table.len(),
            columns: outcome.table.column_count(),
            matched: outcome.matched,
            warning,
        };

        info!(
            "Loaded {} file(s): {} rows x {} columns",
            report.files, report.rows, report.columns
        );

        self.table = Some(outcome.table);
        Ok(report)
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Current column names, empty before the first load
    pub fn schema(&self) -> Vec<String> {
        self.table.as_ref().map(schema_of).unwrap_or_default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search text and rebuild the row filter
    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
        self.filter = SearchFilter::new(text);
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn sort_state_mut(&mut self) -> &mut SortState {
        &mut self.sort
    }

    /// Header click on `column`
    pub fn toggle_sort(&mut self, column: usize) {
        self.sort.toggle(column);
    }

    /// Indices of the rows to display, filtered then sorted
    pub fn visible_rows(&self) -> Vec<usize> {
        match &self.table {
            Some(table) => {
                let mut rows = filter_rows(table, &self.filter);
                self.sort.sort_indices(table, &mut rows);
                rows
            }
            None => Vec::new(),
        }
    }

    pub fn column_stats(&self, column: &str) -> AppResult<StatisticsResult> {
        Ok(column_stats(self.require_table()?, column)?)
    }

    pub fn chart_dataset(
        &self,
        kind: ChartKind,
        x_column: &str,
        y_column: &str,
    ) -> AppResult<ChartDataset> {
        Ok(build_dataset(self.require_table()?, x_column, y_column, kind)?)
    }

    fn require_table(&self) -> Result<&Table, ProcessingError> {
        self.table
            .as_ref()
            .ok_or_else(|| ProcessingError::InvalidArgument("no data loaded".to_string()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(&Config::default())
    }
}
