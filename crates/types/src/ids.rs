//! Core identifier types for the plot server.
//!
//! Session and connection ids are allocated from monotonic counters owned by
//! the server; dataset ids come from the request path.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Core ID Types
// =============================================================================

/// Unique identifier for a plot session.
///
/// Never reused within a process lifetime.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(SessionId)
    }
}

/// Unique identifier for one persistent browser connection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conn#{}", self.0)
    }
}

/// Identifier of a dataset, as addressed by `/DataFrame{n}`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct DatasetId(pub u32);

impl DatasetId {
    /// Path prefix used by plot pages.
    pub const PATH_PREFIX: &'static str = "DataFrame";

    /// Parse the path segment form, e.g. `DataFrame3`.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        let digits = segment.strip_prefix(Self::PATH_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(DatasetId)
    }

    /// Path segment form of this id.
    pub fn path_segment(&self) -> String {
        format!("{}{}", Self::PATH_PREFIX, self.0)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_parse_and_display() {
        let id: SessionId = "42".parse().unwrap();
        assert_eq!(id, SessionId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_session_id_serializes_as_number() {
        let json = serde_json::to_string(&SessionId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_dataset_id_path_segment() {
        assert_eq!(DatasetId::from_path_segment("DataFrame3"), Some(DatasetId(3)));
        assert_eq!(DatasetId::from_path_segment("DataFrame12"), Some(DatasetId(12)));
        assert_eq!(DatasetId::from_path_segment("DataFrame"), None);
        assert_eq!(DatasetId::from_path_segment("DataFrame-1"), None);
        assert_eq!(DatasetId::from_path_segment("Series3"), None);
        assert_eq!(DatasetId(5).path_segment(), "DataFrame5");
    }
}
