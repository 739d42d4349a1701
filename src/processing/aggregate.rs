// Category aggregation for chart rendering
// Author: Gabriel Demetrios Lafis

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use super::{coerce, resolve_column, ProcessingError};
use crate::data::Table;

/// How the chart collaborator draws a dataset. Construction is identical for all kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// Category to value mapping handed to the chart renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    /// Categories in order of first appearance
    pub values: IndexMap<String, f64>,
}

impl ChartDataset {
    pub fn get(&self, category: &str) -> Option<f64> {
        self.values.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Build the chart dataset for an x column and a numeric y column, by name
pub fn build_dataset(
    table: &Table,
    x_column: &str,
    y_column: &str,
    kind: ChartKind,
) -> Result<ChartDataset, ProcessingError> {
    let x = resolve_column(table, x_column)?;
    let y = resolve_column(table, y_column)?;
    build_dataset_by_index(table, x, y, kind)
}

/// Build the chart dataset from column positions.
///
/// Each row contributes `x cell text -> y cell number`. A repeated
/// category takes the later row's value; values are never summed.
pub fn build_dataset_by_index(
    table: &Table,
    x: usize,
    y: usize,
    kind: ChartKind,
) -> Result<ChartDataset, ProcessingError> {
    let width = table.column_count();
    for index in [x, y] {
        if index >= width {
            return Err(ProcessingError::InvalidArgument(format!(
                "column index {} is out of range for {} columns",
                index, width
            )));
        }
    }

    let x_label = table.columns()[x].clone();
    let y_label = table.columns()[y].clone();
    let mut values: IndexMap<String, f64> = IndexMap::with_capacity(table.len());

    for row in table.rows() {
        let category = row.values[x].to_text();
        let value = coerce(&row.values[y], Some(&y_label))?;
        values.insert(category, value);
    }

    if kind == ChartKind::Pie {
        let negatives = values.values().filter(|v| **v < 0.0).count();
        if negatives > 0 {
            warn!(
                "{} negative value(s) in '{}' will not render meaningfully as a pie chart",
                negatives, y_label
            );
        }
    }

    debug!(
        "Built {:?} dataset '{}' by '{}' with {} categories from {} rows",
        kind,
        y_label,
        x_label,
        values.len(),
        table.len()
    );

    Ok(ChartDataset {
        kind,
        x_label,
        y_label,
        values,
    })
}
