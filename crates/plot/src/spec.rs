//! Plot Spec Builder.
//!
//! Turns a raw column selection into a [`PlotSpecification`].
//!
//! # Normalization rules
//!
//! - `x` submitted as a list keeps only its first element.
//! - `x == "index"` means "plot against the row index" and resolves to `None`.
//! - With neither `left_y` nor `right_y` supplied, `left_y` defaults to the
//!   dataset's first column.
//! - `"index"` inside a y list names no series and is skipped.
//! - Every other named column must exist in the dataset.
//! - A column may sit on both axes.

use dataset::{Dataset, INDEX_COLUMN};
use serde::{Deserialize, Serialize};

/// Rendering style of the plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Line,
    Marker,
}

/// A form field that may arrive once or repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    fn first(&self) -> Option<&str> {
        match self {
            FieldValue::One(value) => Some(value),
            FieldValue::Many(values) => values.first().map(String::as_str),
        }
    }

    fn all(&self) -> Vec<&str> {
        match self {
            FieldValue::One(value) => vec![value.as_str()],
            FieldValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(self, value: String) -> Self {
        match self {
            FieldValue::One(first) => FieldValue::Many(vec![first, value]),
            FieldValue::Many(mut values) => {
                values.push(value);
                FieldValue::Many(values)
            }
        }
    }
}

/// Column selection as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSelection {
    #[serde(default)]
    pub x: Option<FieldValue>,
    #[serde(default)]
    pub left_y: Option<FieldValue>,
    #[serde(default)]
    pub right_y: Option<FieldValue>,
}

impl RawSelection {
    /// Collect repeated `key=value` form pairs.
    ///
    /// Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut selection = RawSelection::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "x" => &mut selection.x,
                "left_y" => &mut selection.left_y,
                "right_y" => &mut selection.right_y,
                _ => continue,
            };
            let value = value.into();
            *slot = Some(match slot.take() {
                None => FieldValue::One(value),
                Some(existing) => existing.push(value),
            });
        }
        selection
    }
}

/// Normalized description of what to plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSpecification {
    /// Column on the x axis; `None` plots against the row index.
    pub x_column: Option<String>,
    pub left_y_columns: Vec<String>,
    pub right_y_columns: Vec<String>,
    pub style: Style,
}

impl PlotSpecification {
    /// Every column the figure needs, x included, without duplicates.
    pub fn columns(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let all = self
            .left_y_columns
            .iter()
            .chain(&self.right_y_columns)
            .chain(self.x_column.iter());
        for column in all {
            if !out.contains(&column.as_str()) {
                out.push(column);
            }
        }
        out
    }
}

/// Invalid plot selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// A selected column is not in the dataset.
    #[error("invalid column '{column}', expected one of: {available}")]
    InvalidColumn { column: String, available: String },

    /// The selection names no y series at all.
    #[error("selection has no y columns")]
    NoSeries,
}

impl SpecError {
    fn invalid(column: &str, dataset: &Dataset) -> Self {
        SpecError::InvalidColumn {
            column: column.to_string(),
            available: dataset.columns().join(", "),
        }
    }
}

/// Build a [`PlotSpecification`] from a raw selection.
pub fn build(dataset: &Dataset, selection: &RawSelection) -> Result<PlotSpecification, SpecError> {
    let x_column = match selection.x.as_ref().and_then(FieldValue::first) {
        None | Some(INDEX_COLUMN) => None,
        Some(name) if dataset.has_column(name) => Some(name.to_string()),
        Some(name) => return Err(SpecError::invalid(name, dataset)),
    };

    let (left_y_columns, right_y_columns) = match (&selection.left_y, &selection.right_y) {
        (None, None) => {
            let first = dataset.first_column().ok_or(SpecError::NoSeries)?;
            (vec![first.to_string()], Vec::new())
        }
        (left, right) => (
            resolve_columns(dataset, left.as_ref())?,
            resolve_columns(dataset, right.as_ref())?,
        ),
    };

    if left_y_columns.is_empty() && right_y_columns.is_empty() {
        return Err(SpecError::NoSeries);
    }

    let style = if x_column.is_none() {
        Style::Marker
    } else {
        Style::Line
    };

    tracing::debug!(
        x = ?x_column,
        left = ?left_y_columns,
        right = ?right_y_columns,
        ?style,
        "built plot specification"
    );

    Ok(PlotSpecification {
        x_column,
        left_y_columns,
        right_y_columns,
        style,
    })
}

fn resolve_columns(
    dataset: &Dataset,
    field: Option<&FieldValue>,
) -> Result<Vec<String>, SpecError> {
    let mut out: Vec<String> = Vec::new();
    let Some(field) = field else {
        return Ok(out);
    };
    for name in field.all() {
        if name == INDEX_COLUMN {
            continue;
        }
        if !dataset.has_column(name) {
            return Err(SpecError::invalid(name, dataset));
        }
        if !out.iter().any(|c| c == name) {
            out.push(name.to_string());
        }
    }
    Ok(out)
}
