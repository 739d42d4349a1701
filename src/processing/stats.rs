// Descriptive statistics for one numeric column
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use super::{coerce, resolve_column, ProcessingError};
use crate::data::{Table, Value};

/// Descriptive statistics for one column, computed fresh on every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsResult {
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    /// Population variance (divides by n)
    pub variance: f64,
    pub std_dev: f64,
    pub count: usize,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for StatisticsResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Count: {}", self.count)?;
        writeln!(f, "Mean: {:.4}", self.mean)?;
        writeln!(f, "Median: {:.4}", self.median)?;
        writeln!(f, "Mode: {:.4}", self.mode)?;
        writeln!(f, "Variance: {:.4}", self.variance)?;
        writeln!(f, "Std Dev: {:.4}", self.std_dev)?;
        writeln!(f, "Min: {:.4}", self.min)?;
        write!(f, "Max: {:.4}", self.max)
    }
}

/// Compute statistics over values that must all read as numbers.
///
/// Every value is coerced before anything is computed, so a bad cell
/// yields an error naming it and no partial result.
pub fn compute_stats(values: &[Value]) -> Result<StatisticsResult, ProcessingError> {
    compute_named(values.iter(), None)
}

/// Compute statistics for the column called `column`
pub fn column_stats(table: &Table, column: &str) -> Result<StatisticsResult, ProcessingError> {
    let index = resolve_column(table, column)?;
    debug!("Computing statistics for column '{}' over {} rows", column, table.len());
    compute_named(table.column_values(index), Some(column))
}

fn compute_named<'a, I>(values: I, column: Option<&str>) -> Result<StatisticsResult, ProcessingError>
where
    I: Iterator<Item = &'a Value>,
{
    let numbers = values
        .map(|v| coerce(v, column))
        .collect::<Result<Vec<f64>, _>>()?;

    if numbers.is_empty() {
        return Err(ProcessingError::InvalidArgument(match column {
            Some(c) => format!("column '{}' has no values", c),
            None => "statistics need at least one value".to_string(),
        }));
    }

    let mean = compute_mean(&numbers);
    let variance = compute_variance(&numbers, mean);

    Ok(StatisticsResult {
        mean,
        median: compute_median(&numbers),
        mode: compute_mode(&numbers),
        variance,
        std_dev: variance.sqrt(),
        count: numbers.len(),
        min: numbers.iter().copied().fold(f64::INFINITY, f64::min),
        max: numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

// Each term is scaled by 1/n before summing so finite inputs cannot overflow.
fn compute_mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    values.iter().map(|&x| x / n).sum()
}

fn compute_median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        sorted[mid - 1] / 2.0 + sorted[mid] / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value; among equally frequent values the one seen first wins
fn compute_mode(values: &[f64]) -> f64 {
    // (value, count) in first-seen order
    let mut counts: Vec<(f64, usize)> = Vec::new();
    let mut slots: HashMap<u64, usize> = HashMap::new();

    for &value in values {
        // -0.0 and 0.0 count as the same value
        let normalized = if value == 0.0 { 0.0 } else { value };
        let slot = *slots.entry(normalized.to_bits()).or_insert_with(|| {
            counts.push((normalized, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    let mut best = counts[0];
    for &candidate in &counts[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }
    best.0
}

// Deviations are taken on halved values, so only a variance that is itself
// beyond the f64 range comes out infinite.
fn compute_variance(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    let half_mean = mean / 2.0;
    4.0 * values
        .iter()
        .map(|&x| (x / 2.0 - half_mean).powi(2) / n)
        .sum::<f64>()
}
