//! The plotters-backed reference engine.
//!
//! # Events
//!
//! | type             | fields               | effect                              |
//! |------------------|----------------------|-------------------------------------|
//! | `refresh`/`draw` |                      | re-render, emit PNG blob            |
//! | `resize`         | `width`, `height`    | emit `resize` JSON, then blob       |
//! | `scroll`         | `x`, `y`, `step`     | zoom about the cursor, blob         |
//! | `button_press`   | `x`, `y`             | start a drag                        |
//! | `button_release` | `x`, `y`             | pan by the drag, blob               |
//! | `motion_notify`  | `x`, `y`             | emit `message` JSON with coordinates|
//! | `toolbar_button` | `name`               | `home` resets the view, blob        |
//!
//! Anything else is accepted and ignored.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use plot::Figure;
use serde_json::json;
use tracing::{debug, trace};
use types::{ConnectionId, ExportFormat};

use crate::client;
use crate::draw;
use crate::error::{RenderError, RenderResult};
use crate::event::{InteractionEvent, MOTION_NOTIFY, RenderUpdate, SUPPORTS_BINARY, UpdateSink};
use crate::manager::{RenderEngine, RenderManager};
use crate::postscript::write_postscript;
use crate::view::{Layout, View};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Initial canvas width in pixels.
    pub width: u32,
    /// Initial canvas height in pixels.
    pub height: u32,
    /// Directory served under `/_static`.
    pub static_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Engine producing [`PlottersManager`]s.
#[derive(Debug, Clone, Default)]
pub struct PlottersEngine {
    config: EngineConfig,
}

impl PlottersEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl RenderEngine for PlottersEngine {
    fn instantiate(&self, figure: Arc<Figure>) -> RenderResult<Arc<dyn RenderManager>> {
        let layout = Layout::new(self.config.width, self.config.height);
        Ok(Arc::new(PlottersManager::new(figure, layout)))
    }

    fn static_dir(&self) -> &Path {
        &self.config.static_dir
    }

    fn client_script(&self) -> String {
        client::script(&self.config)
    }
}

#[derive(Debug)]
struct Canvas {
    layout: Layout,
    view: View,
    drag_from: Option<(f64, f64)>,
}

/// Render manager for one figure.
pub struct PlottersManager {
    figure: Arc<Figure>,
    home: View,
    canvas: Mutex<Canvas>,
    sinks: Mutex<Vec<(ConnectionId, UpdateSink)>>,
}

impl PlottersManager {
    pub fn new(figure: Arc<Figure>, layout: Layout) -> Self {
        let home = View::home(&figure);
        Self {
            figure,
            home,
            canvas: Mutex::new(Canvas {
                layout,
                view: home,
                drag_from: None,
            }),
            sinks: Mutex::new(Vec::new()),
        }
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// Send `update` to every sink, dropping sinks whose connection is gone.
    fn emit(&self, update: RenderUpdate) {
        self.sinks.lock().retain(|(id, sink)| {
            let open = sink.send(update.clone()).is_ok();
            if !open {
                debug!(connection = %id, "dropping closed update sink");
            }
            open
        });
    }

    fn emit_frame(&self, canvas: &Canvas) -> RenderResult<()> {
        let png = draw::render_png(&self.figure, &canvas.view, &canvas.layout)?;
        self.emit(RenderUpdate::Blob(Bytes::from(png)));
        Ok(())
    }

    fn cursor_message(&self, canvas: &Canvas, px: f64, py: f64) -> String {
        let (x, left, right) = canvas.view.to_data(&canvas.layout, px, py);
        let x = self.figure.x.format_value(x);
        if self.figure.has_right_axis() {
            format!("x={} y={:.4} (right: {:.4})", x, left, right)
        } else {
            format!("x={} y={:.4}", x, left)
        }
    }
}

impl RenderManager for PlottersManager {
    fn handle_event(&self, event: &InteractionEvent) -> RenderResult<()> {
        // The canvas lock is held through emission so every sink sees one event's
        // updates contiguously.
        let mut canvas = self.canvas.lock();

        match event.kind.as_str() {
            "refresh" | "draw" => self.emit_frame(&canvas),
            "resize" => {
                let width = event.number("width")?;
                let height = event.number("height")?;
                canvas.layout = Layout::new(width as u32, height as u32);
                self.emit(RenderUpdate::Json(json!({
                    "type": "resize",
                    "size": [canvas.layout.width, canvas.layout.height],
                })));
                self.emit_frame(&canvas)
            }
            "scroll" => {
                let (x, y) = (event.number("x")?, event.number("y")?);
                let step = event.number("step")?;
                canvas.view = canvas.view.zoom(&canvas.layout, x, y, step);
                self.emit_frame(&canvas)
            }
            "button_press" => {
                canvas.drag_from = Some((event.number("x")?, event.number("y")?));
                Ok(())
            }
            "button_release" => {
                let to = (event.number("x")?, event.number("y")?);
                match canvas.drag_from.take() {
                    Some(from) if from != to => {
                        canvas.view = canvas.view.pan(&canvas.layout, from, to);
                        self.emit_frame(&canvas)
                    }
                    _ => Ok(()),
                }
            }
            MOTION_NOTIFY => {
                let (x, y) = (event.number("x")?, event.number("y")?);
                let message = self.cursor_message(&canvas, x, y);
                trace!(%message, "cursor moved");
                self.emit(RenderUpdate::Json(json!({
                    "type": "message",
                    "message": message,
                })));
                Ok(())
            }
            "toolbar_button" => match event.text("name") {
                Some("home") => {
                    canvas.view = self.home;
                    self.emit_frame(&canvas)
                }
                name => {
                    debug!(?name, "ignoring toolbar button");
                    Ok(())
                }
            },
            "ack" | "set_dpi_ratio" | "send_image_mode" | SUPPORTS_BINARY => Ok(()),
            other => {
                debug!(event = other, "ignoring unknown event type");
                Ok(())
            }
        }
    }

    fn add_sink(&self, id: ConnectionId, sink: UpdateSink) {
        let mut sinks = self.sinks.lock();
        sinks.retain(|(existing, _)| *existing != id);
        sinks.push((id, sink));
    }

    fn remove_sink(&self, id: ConnectionId) {
        self.sinks.lock().retain(|(existing, _)| *existing != id);
    }

    fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    fn export(&self, format: ExportFormat) -> RenderResult<Vec<u8>> {
        let (view, layout) = {
            let canvas = self.canvas.lock();
            (canvas.view, canvas.layout)
        };
        let figure = &self.figure;

        match format {
            ExportFormat::Svg => draw::render_svg(figure, &view, &layout).map(String::into_bytes),
            ExportFormat::Png | ExportFormat::Jpeg | ExportFormat::Tiff => {
                draw::encode_raster(draw::render_rgb(figure, &view, &layout)?, format)
            }
            ExportFormat::Ps => Ok(write_postscript(figure, &view, &layout, false).into_bytes()),
            ExportFormat::Eps => Ok(write_postscript(figure, &view, &layout, true).into_bytes()),
            ExportFormat::Pdf => Err(RenderError::FormatUnavailable(format)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::update_channel;
    use chrono::NaiveDate;
    use dataset::Dataset;
    use plot::{RawSelection, build};
    use tokio::sync::mpsc::UnboundedReceiver;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn manager(selection: RawSelection) -> PlottersManager {
        let index = (1..=10)
            .map(|d| NaiveDate::from_ymd_opt(2013, 12, d).unwrap())
            .collect();
        let ds = Dataset::new(
            index,
            [
                ("A".to_string(), (0..10).map(f64::from).collect()),
                ("B".to_string(), (0..10).map(|v| f64::from(v * v)).collect()),
            ],
        )
        .unwrap();
        let spec = build(&ds, &selection).unwrap();
        let figure = Figure::new(spec, &ds, "DataFrame1").unwrap();
        PlottersManager::new(Arc::new(figure), Layout::new(200, 150))
    }

    fn drain(rx: &mut UnboundedReceiver<RenderUpdate>) -> Vec<RenderUpdate> {
        let mut out = Vec::new();
        while let Ok(update) = rx.try_recv() {
            out.push(update);
        }
        out
    }

    fn is_png(update: &RenderUpdate) -> bool {
        matches!(update, RenderUpdate::Blob(bytes) if bytes.starts_with(PNG_MAGIC))
    }

    #[test]
    fn test_refresh_emits_png_blob() {
        let mgr = manager(RawSelection::default());
        let (tx, mut rx) = update_channel();
        mgr.add_sink(ConnectionId(1), tx);

        mgr.handle_event(&InteractionEvent::new("refresh")).unwrap();

        let updates = drain(&mut rx);
        assert_eq!(updates.len(), 1);
        assert!(is_png(&updates[0]));
    }

    #[test]
    fn test_resize_emits_json_then_blob() {
        let mgr = manager(RawSelection::default());
        let (tx, mut rx) = update_channel();
        mgr.add_sink(ConnectionId(1), tx);

        let event = InteractionEvent::new("resize")
            .with("width", 300)
            .with("height", 200);
        mgr.handle_event(&event).unwrap();

        let updates = drain(&mut rx);
        assert_eq!(updates.len(), 2);
        assert_eq!(
            updates[0],
            RenderUpdate::Json(json!({"type": "resize", "size": [300, 200]}))
        );
        assert!(is_png(&updates[1]));
    }

    #[test]
    fn test_updates_fan_out_to_every_sink() {
        let mgr = manager(RawSelection::from_pairs([("left_y", "A"), ("right_y", "B")]));
        let (tx1, mut rx1) = update_channel();
        let (tx2, mut rx2) = update_channel();
        mgr.add_sink(ConnectionId(1), tx1);
        mgr.add_sink(ConnectionId(2), tx2);

        let motion = InteractionEvent::new(MOTION_NOTIFY)
            .with("x", 100)
            .with("y", 75);
        mgr.handle_event(&motion).unwrap();

        for rx in [&mut rx1, &mut rx2] {
            let updates = drain(rx);
            assert_eq!(updates.len(), 1);
            match &updates[0] {
                RenderUpdate::Json(value) => {
                    assert_eq!(value["type"], "message");
                    assert!(value["message"].as_str().unwrap().contains("right:"));
                }
                other => panic!("expected json, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_removed_and_closed_sinks_stop_receiving() {
        let mgr = manager(RawSelection::default());
        let (tx1, mut rx1) = update_channel();
        let (tx2, rx2) = update_channel();
        mgr.add_sink(ConnectionId(1), tx1);
        mgr.add_sink(ConnectionId(2), tx2);
        assert_eq!(mgr.sink_count(), 2);

        mgr.remove_sink(ConnectionId(1));
        drop(rx2);
        mgr.handle_event(&InteractionEvent::new("draw")).unwrap();

        assert!(drain(&mut rx1).is_empty());
        assert_eq!(mgr.sink_count(), 0);
    }

    #[test]
    fn test_zoom_pan_and_home() {
        let mgr = manager(RawSelection::default());
        let home = mgr.canvas.lock().view;

        let scroll = InteractionEvent::new("scroll")
            .with("x", 100)
            .with("y", 75)
            .with("step", 1);
        mgr.handle_event(&scroll).unwrap();
        let zoomed = mgr.canvas.lock().view;
        assert!(zoomed.x.width() < home.x.width());

        mgr.handle_event(&InteractionEvent::new("button_press").with("x", 50).with("y", 50))
            .unwrap();
        mgr.handle_event(&InteractionEvent::new("button_release").with("x", 80).with("y", 50))
            .unwrap();
        let panned = mgr.canvas.lock().view;
        assert!(panned.x.lo < zoomed.x.lo);

        let home_button = InteractionEvent::new("toolbar_button").with("name", "home");
        mgr.handle_event(&home_button).unwrap();
        assert_eq!(mgr.canvas.lock().view, home);
    }

    #[test]
    fn test_bad_and_unknown_events() {
        let mgr = manager(RawSelection::default());
        assert!(matches!(
            mgr.handle_event(&InteractionEvent::new("scroll")),
            Err(RenderError::BadEvent { .. })
        ));
        assert!(mgr.handle_event(&InteractionEvent::new("key_press")).is_ok());
        assert!(mgr.handle_event(&InteractionEvent::new("ack")).is_ok());
    }

    #[test]
    fn test_export_formats() {
        let mgr = manager(RawSelection::from_pairs([("x", "A"), ("left_y", "B")]));

        let svg = String::from_utf8(mgr.export(ExportFormat::Svg).unwrap()).unwrap();
        assert!(svg.contains("<svg"));

        assert!(mgr.export(ExportFormat::Png).unwrap().starts_with(PNG_MAGIC));
        assert!(mgr.export(ExportFormat::Jpeg).unwrap().starts_with(&[0xFF, 0xD8]));
        let tiff = mgr.export(ExportFormat::Tiff).unwrap();
        assert!(tiff.starts_with(b"II*\0") || tiff.starts_with(b"MM\0*"));
        assert!(mgr.export(ExportFormat::Eps).unwrap().starts_with(b"%!PS-Adobe-3.0 EPSF"));
        assert_eq!(
            mgr.export(ExportFormat::Pdf),
            Err(RenderError::FormatUnavailable(ExportFormat::Pdf))
        );
    }

    #[test]
    fn test_engine_instantiates_and_scripts() {
        let engine = PlottersEngine::default();
        let figure = manager(RawSelection::default()).figure().clone();
        let mgr = engine.instantiate(Arc::new(figure)).unwrap();
        assert_eq!(mgr.sink_count(), 0);
        assert_eq!(engine.static_dir(), Path::new("static"));
        assert!(engine.client_script().contains("supports_binary"));
    }
}
