//! The [`Dataset`] table type.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::DatasetError;

/// Sentinel column name meaning "plot against the row index".
pub const INDEX_COLUMN: &str = "index";

/// An ordered table of `f64` columns sharing a date row index.
///
/// Columns keep their declaration order; [`Dataset::first_column`] is the
/// default left-axis series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    index: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl Dataset {
    /// Build a dataset from an index and `(name, values)` pairs.
    pub fn new(
        index: Vec<NaiveDate>,
        columns: impl IntoIterator<Item = (String, Vec<f64>)>,
    ) -> Result<Self, DatasetError> {
        let mut names = Vec::new();
        let mut values = Vec::new();

        for (name, column) in columns {
            if names.contains(&name) {
                return Err(DatasetError::DuplicateColumn(name));
            }
            if column.len() != index.len() {
                return Err(DatasetError::Shape {
                    column: name,
                    expected: index.len(),
                    actual: column.len(),
                });
            }
            names.push(name);
            values.push(column);
        }

        Ok(Self {
            index,
            columns: names,
            values,
        })
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// First declared column, if any.
    pub fn first_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Values of a named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i].as_slice())
    }

    /// The row index.
    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// One row as `(column, value)` pairs.
    pub fn row(&self, i: usize) -> Option<Vec<(&str, f64)>> {
        if i >= self.len() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .zip(&self.values)
                .map(|(name, column)| (name.as_str(), column[i]))
                .collect(),
        )
    }
}
