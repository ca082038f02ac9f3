//! Plot specification builder and figure model.
//!
//! # Pipeline
//!
//! ```text
//! RawSelection ──build()──▶ PlotSpecification ──Figure::new()──▶ Figure
//!     (form fields)             (validated)                  (series data)
//! ```
//!
//! [`build`] is the only place loosely-shaped request fields are interpreted.
//! Everything downstream works with the normalized [`PlotSpecification`].

pub mod figure;
pub mod spec;

pub use figure::{Axis, Figure, Series, XAxis};
pub use spec::{FieldValue, PlotSpecification, RawSelection, SpecError, Style, build};
