//! Figure model: the data a render manager draws.
//!
//! A [`Figure`] is built once from a [`PlotSpecification`] and the dataset it
//! was validated against. It copies the needed columns, so the dataset can be
//! dropped as soon as the figure exists.

use chrono::NaiveDate;
use dataset::Dataset;
use serde::Serialize;

use crate::spec::{PlotSpecification, SpecError, Style};

/// Which y axis a series is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Left,
    Right,
}

/// One plotted y series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub axis: Axis,
    pub values: Vec<f64>,
}

/// The x axis of a figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum XAxis {
    /// Row index; rows sit at positions `0..len`.
    Index { dates: Vec<NaiveDate> },
    /// A named dataset column.
    Column { name: String, values: Vec<f64> },
}

impl XAxis {
    /// Numeric x position of every row.
    pub fn positions(&self) -> Vec<f64> {
        match self {
            XAxis::Index { dates } => (0..dates.len()).map(|i| i as f64).collect(),
            XAxis::Column { values, .. } => values.clone(),
        }
    }

    /// Axis label.
    pub fn label(&self) -> &str {
        match self {
            XAxis::Index { .. } => dataset::INDEX_COLUMN,
            XAxis::Column { name, .. } => name,
        }
    }

    /// Human readable x value, used for cursor readouts.
    pub fn format_value(&self, x: f64) -> String {
        match self {
            XAxis::Index { dates } => {
                let row = x.round();
                if row >= 0.0 && (row as usize) < dates.len() {
                    dates[row as usize].to_string()
                } else {
                    format!("{:.2}", x)
                }
            }
            XAxis::Column { .. } => format!("{:.4}", x),
        }
    }
}

/// Plot data derived from a specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub spec: PlotSpecification,
    pub title: String,
    pub x: XAxis,
    pub series: Vec<Series>,
}

impl Figure {
    /// Extract the series named by `spec` from `dataset`.
    pub fn new(
        spec: PlotSpecification,
        dataset: &Dataset,
        title: impl Into<String>,
    ) -> Result<Self, SpecError> {
        let column = |name: &str| {
            dataset
                .column(name)
                .map(<[f64]>::to_vec)
                .ok_or_else(|| SpecError::InvalidColumn {
                    column: name.to_string(),
                    available: dataset.columns().join(", "),
                })
        };

        let x = match &spec.x_column {
            None => XAxis::Index {
                dates: dataset.index().to_vec(),
            },
            Some(name) => XAxis::Column {
                name: name.clone(),
                values: column(name)?,
            },
        };

        let left = spec.left_y_columns.iter().map(|n| (n, Axis::Left));
        let right = spec.right_y_columns.iter().map(|n| (n, Axis::Right));
        let series = left
            .chain(right)
            .map(|(name, axis)| -> Result<Series, SpecError> {
                Ok(Series {
                    name: name.clone(),
                    axis,
                    values: column(name)?,
                })
            })
            .collect::<Result<Vec<_>, SpecError>>()?;

        Ok(Self {
            spec,
            title: title.into(),
            x,
            series,
        })
    }

    pub fn style(&self) -> Style {
        self.spec.style
    }

    /// Series drawn against `axis`.
    pub fn series_on(&self, axis: Axis) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(move |s| s.axis == axis)
    }

    pub fn has_right_axis(&self) -> bool {
        self.series_on(Axis::Right).next().is_some()
    }
}
