//! Minimal PostScript output.
//!
//! Draws the same picture as the plotters path: white page, plot frame,
//! series clipped to the plot area. PostScript's origin is bottom-left, so
//! rows are flipped relative to [`Layout`].

use std::fmt::Write;

use plot::{Axis, Figure, Style};

use crate::draw::{MARKER_RADIUS, PALETTE, points};
use crate::view::{Layout, Span, View};

/// Write `figure` as PostScript; `encapsulated` selects EPS headers.
pub fn write_postscript(figure: &Figure, view: &View, layout: &Layout, encapsulated: bool) -> String {
    let mut ps = String::new();
    let (w, h) = (layout.width, layout.height);
    let (left, top, pw, ph) = layout.plot_rect();
    let bottom = f64::from(h) - top - ph;

    if encapsulated {
        ps.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
    } else {
        ps.push_str("%!PS-Adobe-3.0\n");
    }
    let _ = writeln!(ps, "%%BoundingBox: 0 0 {} {}", w, h);
    let _ = writeln!(ps, "%%Title: ({})", escape(&figure.title));
    ps.push_str("%%Pages: 1\n%%EndComments\n");

    let _ = writeln!(ps, "1 setgray 0 0 {} {} rectfill", w, h);
    let _ = writeln!(
        ps,
        "0 setgray 1 setlinewidth {:.2} {:.2} {:.2} {:.2} rectstroke",
        left, bottom, pw, ph
    );
    ps.push_str("gsave\n");
    let _ = writeln!(ps, "{:.2} {:.2} {:.2} {:.2} rectclip", left, bottom, pw, ph);

    let to_page = |x: f64, y: f64, span: &Span| {
        (
            left + view.x.fraction(x) * pw,
            bottom + span.fraction(y) * ph,
        )
    };

    let positions = figure.x.positions();
    for (i, series) in figure.series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let _ = writeln!(
            ps,
            "{:.3} {:.3} {:.3} setrgbcolor",
            f64::from(color.0) / 255.0,
            f64::from(color.1) / 255.0,
            f64::from(color.2) / 255.0
        );
        let span = match series.axis {
            Axis::Left => &view.left,
            Axis::Right => &view.right,
        };
        let pts: Vec<(f64, f64)> = points(&positions, &series.values)
            .into_iter()
            .map(|(x, y)| to_page(x, y, span))
            .collect();

        match figure.style() {
            Style::Line => {
                let mut iter = pts.iter();
                if let Some((x, y)) = iter.next() {
                    let _ = writeln!(ps, "2 setlinewidth newpath {:.2} {:.2} moveto", x, y);
                    for (x, y) in iter {
                        let _ = writeln!(ps, "{:.2} {:.2} lineto", x, y);
                    }
                    ps.push_str("stroke\n");
                }
            }
            Style::Marker => {
                for (x, y) in &pts {
                    let _ = writeln!(
                        ps,
                        "newpath {:.2} {:.2} {} 0 360 arc fill",
                        x, y, MARKER_RADIUS
                    );
                }
            }
        }
    }

    ps.push_str("grestore\nshowpage\n%%EOF\n");
    ps
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dataset::Dataset;
    use plot::{RawSelection, build};

    fn figure(selection: RawSelection) -> Figure {
        let index = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2013, 12, d).unwrap())
            .collect();
        let ds = Dataset::new(
            index,
            [
                ("A".to_string(), vec![1.0, 2.0, 3.0]),
                ("B".to_string(), vec![3.0, 1.0, 2.0]),
            ],
        )
        .unwrap();
        let spec = build(&ds, &selection).unwrap();
        Figure::new(spec, &ds, "DataFrame(1)").unwrap()
    }

    #[test]
    fn test_eps_header_and_markers() {
        let fig = figure(RawSelection::default());
        let view = View::home(&fig);
        let eps = write_postscript(&fig, &view, &Layout::new(200, 100), true);

        assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n"));
        assert!(eps.contains("%%BoundingBox: 0 0 200 100"));
        assert!(eps.contains("%%Title: (DataFrame\\(1\\))"));
        assert_eq!(eps.matches(" arc fill").count(), 3);
        assert!(eps.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_ps_lines() {
        let fig = figure(RawSelection::from_pairs([("x", "B"), ("left_y", "A")]));
        let view = View::home(&fig);
        let ps = write_postscript(&fig, &view, &Layout::new(200, 100), false);

        assert!(ps.starts_with("%!PS-Adobe-3.0\n"));
        assert_eq!(ps.matches("moveto").count(), 1);
        assert_eq!(ps.matches("lineto").count(), 2);
    }
}
