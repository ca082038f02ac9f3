//! Canvas layout and the interactive view window.
//!
//! Pixel coordinates follow the browser: origin top-left, y growing down.

use plot::{Axis, Figure};

/// Blank border around the plot area, in pixels.
pub const MARGIN: u32 = 20;

/// Smallest and largest accepted canvas edge.
pub const MIN_EDGE: u32 = 100;
pub const MAX_EDGE: u32 = 4000;

/// Canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(MIN_EDGE, MAX_EDGE),
            height: height.clamp(MIN_EDGE, MAX_EDGE),
        }
    }

    /// Plot area as `(left, top, width, height)` pixels.
    pub fn plot_rect(&self) -> (f64, f64, f64, f64) {
        let m = f64::from(MARGIN);
        (
            m,
            m,
            f64::from(self.width) - 2.0 * m,
            f64::from(self.height) - 2.0 * m,
        )
    }

    /// Fractions `(fx, fy)` of the plot area at a pixel, `fy` measured upward.
    fn fractions(&self, px: f64, py: f64) -> (f64, f64) {
        let (left, top, w, h) = self.plot_rect();
        ((px - left) / w, 1.0 - (py - top) / h)
    }
}

/// A closed numeric interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Bounds of `values` with 5% padding; degenerate or empty input gets a unit span.
    pub fn covering<'a>(values: impl IntoIterator<Item = &'a f64>) -> Self {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() || !hi.is_finite() {
            return Self::new(0.0, 1.0);
        }
        if hi - lo < f64::EPSILON {
            return Self::new(lo - 0.5, hi + 0.5);
        }
        let pad = (hi - lo) * 0.05;
        Self::new(lo - pad, hi + pad)
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Value at fraction `f` of the span.
    pub fn at(&self, f: f64) -> f64 {
        self.lo + f * self.width()
    }

    /// Fraction of the span at `v`.
    pub fn fraction(&self, v: f64) -> f64 {
        (v - self.lo) / self.width()
    }

    /// Scale by `factor` keeping `anchor` fixed.
    pub fn zoom(&self, anchor: f64, factor: f64) -> Self {
        Self::new(
            anchor - (anchor - self.lo) * factor,
            anchor + (self.hi - anchor) * factor,
        )
    }

    pub fn shift(&self, delta: f64) -> Self {
        Self::new(self.lo + delta, self.hi + delta)
    }
}

/// Visible data window of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub x: Span,
    pub left: Span,
    pub right: Span,
}

impl View {
    /// Window covering every point of `figure`.
    pub fn home(figure: &Figure) -> Self {
        let positions = figure.x.positions();
        let axis_span = |axis: Axis| {
            let values: Vec<f64> = figure
                .series_on(axis)
                .flat_map(|s| s.values.iter().copied())
                .collect();
            Span::covering(&values)
        };
        Self {
            x: Span::covering(&positions),
            left: axis_span(Axis::Left),
            right: axis_span(Axis::Right),
        }
    }

    /// Data coordinates `(x, left_y, right_y)` under a pixel.
    pub fn to_data(&self, layout: &Layout, px: f64, py: f64) -> (f64, f64, f64) {
        let (fx, fy) = layout.fractions(px, py);
        (self.x.at(fx), self.left.at(fy), self.right.at(fy))
    }

    /// Zoom about a pixel. `step > 0` zooms in.
    pub fn zoom(&self, layout: &Layout, px: f64, py: f64, step: f64) -> Self {
        let factor = 0.8_f64.powf(step);
        let (x, left, right) = self.to_data(layout, px, py);
        Self {
            x: self.x.zoom(x, factor),
            left: self.left.zoom(left, factor),
            right: self.right.zoom(right, factor),
        }
    }

    /// Pan so the point under `from` ends up under `to`.
    pub fn pan(&self, layout: &Layout, from: (f64, f64), to: (f64, f64)) -> Self {
        let (_, _, w, h) = layout.plot_rect();
        let dfx = (to.0 - from.0) / w;
        let dfy = -(to.1 - from.1) / h;
        Self {
            x: self.x.shift(-dfx * self.x.width()),
            left: self.left.shift(-dfy * self.left.width()),
            right: self.right.shift(-dfy * self.right.width()),
        }
    }
}
