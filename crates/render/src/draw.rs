//! Drawing figures with plotters.
//!
//! One generic routine draws onto any plotters backend; the wrappers below
//! pick the backend and encode the result.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use plot::{Axis, Figure, Style};
use plotters::coord::Shift;
use plotters::prelude::*;
use types::ExportFormat;

use crate::error::{RenderError, RenderResult};
use crate::view::{Layout, MARGIN, View};

/// Series colours, cycled in declaration order.
pub(crate) const PALETTE: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(23, 190, 207),
];

/// Marker radius in pixels.
pub(crate) const MARKER_RADIUS: i32 = 3;

/// Finite `(x, y)` pairs of a series.
pub(crate) fn points(positions: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
    positions
        .iter()
        .zip(values)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect()
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    view: &View,
) -> RenderResult<()> {
    root.fill(&WHITE).map_err(RenderError::draw)?;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN as i32)
        .build_cartesian_2d(view.x.lo..view.x.hi, view.left.lo..view.left.hi)
        .map_err(RenderError::draw)?
        .set_secondary_coord(view.x.lo..view.x.hi, view.right.lo..view.right.hi);

    chart
        .plotting_area()
        .draw(&Rectangle::new(
            [(view.x.lo, view.left.lo), (view.x.hi, view.left.hi)],
            BLACK.stroke_width(1),
        ))
        .map_err(RenderError::draw)?;

    let positions = figure.x.positions();
    for (i, series) in figure.series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let pts = points(&positions, &series.values);

        match (series.axis, figure.style()) {
            (Axis::Left, Style::Line) => {
                chart
                    .draw_series(LineSeries::new(pts, color.stroke_width(2)))
                    .map_err(RenderError::draw)?;
            }
            (Axis::Left, Style::Marker) => {
                chart
                    .draw_series(
                        pts.into_iter()
                            .map(|p| Circle::new(p, MARKER_RADIUS, color.filled())),
                    )
                    .map_err(RenderError::draw)?;
            }
            (Axis::Right, Style::Line) => {
                chart
                    .draw_secondary_series(LineSeries::new(pts, color.stroke_width(2)))
                    .map_err(RenderError::draw)?;
            }
            (Axis::Right, Style::Marker) => {
                chart
                    .draw_secondary_series(
                        pts.into_iter()
                            .map(|p| Circle::new(p, MARKER_RADIUS, color.filled())),
                    )
                    .map_err(RenderError::draw)?;
            }
        }
    }

    root.present().map_err(RenderError::draw)?;
    Ok(())
}

/// Render to an SVG document.
pub(crate) fn render_svg(figure: &Figure, view: &View, layout: &Layout) -> RenderResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (layout.width, layout.height))
            .into_drawing_area();
        draw_figure(&root, figure, view)?;
    }
    Ok(svg)
}

/// Render to an RGB bitmap.
pub(crate) fn render_rgb(figure: &Figure, view: &View, layout: &Layout) -> RenderResult<RgbImage> {
    let mut buffer = vec![0u8; layout.width as usize * layout.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (layout.width, layout.height))
            .into_drawing_area();
        draw_figure(&root, figure, view)?;
    }
    RgbImage::from_raw(layout.width, layout.height, buffer)
        .ok_or_else(|| RenderError::Encode("bitmap buffer has the wrong size".into()))
}

/// Encode a bitmap in a raster export format.
pub(crate) fn encode_raster(image: RgbImage, format: ExportFormat) -> RenderResult<Vec<u8>> {
    let image_format = match format {
        ExportFormat::Png => ImageFormat::Png,
        ExportFormat::Jpeg => ImageFormat::Jpeg,
        ExportFormat::Tiff => ImageFormat::Tiff,
        other => return Err(RenderError::FormatUnavailable(other)),
    };
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, image_format)
        .map_err(RenderError::encode)?;
    Ok(out.into_inner())
}

/// Render straight to PNG bytes.
pub(crate) fn render_png(figure: &Figure, view: &View, layout: &Layout) -> RenderResult<Vec<u8>> {
    encode_raster(render_rgb(figure, view, layout)?, ExportFormat::Png)
}
