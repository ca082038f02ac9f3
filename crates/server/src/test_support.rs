//! Test doubles shared by the unit tests of this crate.

use std::sync::Arc;

use chrono::NaiveDate;
use dataset::Dataset;
use parking_lot::Mutex;
use plot::{Figure, RawSelection, build};
use render::{InteractionEvent, RenderError, RenderManager, RenderResult, RenderUpdate, UpdateSink};
use types::{ConnectionId, ExportFormat};

/// Three-row dataset with columns `A`, `B`, `C`.
pub fn dataset() -> Dataset {
    let index = (1..=3)
        .map(|d| NaiveDate::from_ymd_opt(2013, 12, d).unwrap())
        .collect();
    Dataset::new(
        index,
        [
            ("A".to_string(), vec![1.0, 2.0, 3.0]),
            ("B".to_string(), vec![4.0, 5.0, 6.0]),
            ("C".to_string(), vec![7.0, 8.0, 9.0]),
        ],
    )
    .unwrap()
}

pub fn figure() -> Arc<Figure> {
    let ds = dataset();
    let spec = build(&ds, &RawSelection::default()).unwrap();
    Arc::new(Figure::new(spec, &ds, "DataFrame1").unwrap())
}

/// Render manager that records calls and echoes events back to its sinks.
#[derive(Default)]
pub struct RecordingManager {
    pub events: Mutex<Vec<InteractionEvent>>,
    pub exports: Mutex<Vec<ExportFormat>>,
    sinks: Mutex<Vec<(ConnectionId, UpdateSink)>>,
    fail_exports: bool,
}

impl RecordingManager {
    pub fn failing_exports() -> Self {
        Self {
            fail_exports: true,
            ..Default::default()
        }
    }

    /// Push an update to every sink.
    pub fn emit(&self, update: RenderUpdate) {
        for (_, sink) in self.sinks.lock().iter() {
            let _ = sink.send(update.clone());
        }
    }
}

impl RenderManager for RecordingManager {
    fn handle_event(&self, event: &InteractionEvent) -> RenderResult<()> {
        self.events.lock().push(event.clone());
        self.emit(RenderUpdate::Json(serde_json::json!({"echo": event.kind})));
        Ok(())
    }

    fn add_sink(&self, id: ConnectionId, sink: UpdateSink) {
        self.sinks.lock().push((id, sink));
    }

    fn remove_sink(&self, id: ConnectionId) {
        self.sinks.lock().retain(|(conn, _)| *conn != id);
    }

    fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    fn export(&self, format: ExportFormat) -> RenderResult<Vec<u8>> {
        self.exports.lock().push(format);
        if self.fail_exports {
            return Err(RenderError::Encode("disk on fire".into()));
        }
        Ok(format.extension().as_bytes().to_vec())
    }
}
