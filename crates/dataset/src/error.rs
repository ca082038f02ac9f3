//! Error types for dataset operations.

use types::DatasetId;

/// Errors raised while fetching or building a dataset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// No dataset exists under this id.
    #[error("unknown dataset: {0}")]
    UnknownDataset(DatasetId),

    /// A column's length does not match the row index.
    #[error("column {column} has {actual} values, expected {expected}")]
    Shape {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// The same column name was declared twice.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
}
