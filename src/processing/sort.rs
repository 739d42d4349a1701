// Multi-key column sorting
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use log::debug;

use crate::data::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One sort criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: usize, direction: SortDirection) -> Self {
        SortKey { column, direction }
    }
}

/// The ordered sort keys toggled from column headers.
///
/// Earlier keys are the primary criteria. Keys are only ever removed
/// explicitly, so they survive a reload even when the new table is narrower.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    pub fn new() -> Self {
        SortState { keys: Vec::new() }
    }

    /// Cycle a column through ascending, descending and unsorted.
    ///
    /// A new key is appended, an ascending key flips to descending in place
    /// and a descending key is removed. Other columns' keys are untouched.
    pub fn toggle(&mut self, column: usize) {
        match self.keys.iter().position(|k| k.column == column) {
            None => self.keys.push(SortKey::new(column, SortDirection::Ascending)),
            Some(i) => match self.keys[i].direction {
                SortDirection::Ascending => self.keys[i].direction = SortDirection::Descending,
                SortDirection::Descending => {
                    self.keys.remove(i);
                }
            },
        }
    }

    /// Drop the key for a column, if any
    pub fn remove(&mut self, column: usize) {
        self.keys.retain(|k| k.column != column);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn direction_of(&self, column: usize) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    /// The row permutation for the table under the current keys
    pub fn resolve_order(&self, table: &Table) -> Vec<usize> {
        let mut order: Vec<usize> = (0..table.len()).collect();
        self.sort_indices(table, &mut order);
        order
    }

    /// Stable-sort a subset of row indices in place
    pub fn sort_indices(&self, table: &Table, indices: &mut [usize]) {
        let width = table.column_count();
        let active: Vec<SortKey> = self
            .keys
            .iter()
            .copied()
            .filter(|k| k.column < width)
            .collect();

        if active.len() < self.keys.len() {
            debug!(
                "Ignoring {} sort key(s) beyond the table's {} columns",
                self.keys.len() - active.len(),
                width
            );
        }
        if active.is_empty() {
            return;
        }

        let rows = table.rows();
        // slice::sort_by is stable, ties keep their original order
        indices.sort_by(|&a, &b| {
            for key in &active {
                let ordering = rows[a].values[key.column].compare(&rows[b].values[key.column]);
                let ordering = match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}
