//! Column-oriented datasets for the plot server.
//!
//! A [`Dataset`] is immutable once built. The server only ever sees datasets
//! through the [`DatasetProvider`] trait; [`SyntheticProvider`] is the
//! provider the binary ships with.

pub mod error;
pub mod frame;
pub mod provider;

pub use error::DatasetError;
pub use frame::{Dataset, INDEX_COLUMN};
pub use provider::{DatasetProvider, SyntheticProvider};
