//! Dataset providers.
//!
//! # Synthetic data
//!
//! [`SyntheticProvider`] fabricates a table per id: `rows` consecutive days
//! ending on 2013-12-31, fifteen columns `A`..`O`, values uniform in
//! `[0, 10 * id)`. With a seed the same id always yields the same table.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use types::DatasetId;

use crate::error::DatasetError;
use crate::frame::Dataset;

/// Source of named datasets.
pub trait DatasetProvider: Send + Sync {
    /// Fetch the dataset for `id`.
    fn fetch(&self, id: DatasetId) -> Result<Dataset, DatasetError>;
}

/// Column names of synthetic datasets.
pub const SYNTHETIC_COLUMNS: [&str; 15] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
];

/// Default row count of synthetic datasets.
pub const DEFAULT_ROWS: usize = 100;

/// Last day of the synthetic row index.
const INDEX_END: Option<NaiveDate> = NaiveDate::from_ymd_opt(2013, 12, 31);

/// Random dataset generator.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    rows: usize,
    seed: Option<u64>,
    max_id: Option<u32>,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seed: None,
            max_id: None,
        }
    }
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rows per dataset.
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Make generation deterministic.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject ids above `max_id`.
    pub fn max_id(mut self, max_id: u32) -> Self {
        self.max_id = Some(max_id);
        self
    }

    fn index(&self) -> Vec<NaiveDate> {
        let Some(end) = INDEX_END else {
            return Vec::new();
        };
        (0..self.rows)
            .rev()
            .filter_map(|back| end.checked_sub_days(Days::new(back as u64)))
            .collect()
    }
}

impl DatasetProvider for SyntheticProvider {
    fn fetch(&self, id: DatasetId) -> Result<Dataset, DatasetError> {
        if self.max_id.is_some_and(|max| id.0 > max) {
            return Err(DatasetError::UnknownDataset(id));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(id.0))),
            None => StdRng::from_entropy(),
        };
        let scale = 10.0 * f64::from(id.0);
        let index = self.index();
        let rows = index.len();

        let columns = SYNTHETIC_COLUMNS.iter().map(|name| {
            let values = (0..rows).map(|_| rng.r#gen::<f64>() * scale).collect();
            (name.to_string(), values)
        });
        let columns: Vec<_> = columns.collect();

        debug!(dataset = %id, rows, "generated synthetic dataset");
        Dataset::new(index, columns)
    }
}
