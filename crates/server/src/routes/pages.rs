//! HTML pages: the dataset index and plot creation.
//!
//! # Endpoints
//!
//! - `GET /` - links to the datasets
//! - `GET /DataFrame{n}` - new session with the default selection
//! - `POST /DataFrame{n}` - new session from a form with repeatable `x`,
//!   `left_y` and `right_y` fields

use std::sync::Arc;

use askama::Template;
use axum::Form;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::http::header::HOST;
use axum::response::Html;
use dataset::INDEX_COLUMN;
use plot::{Figure, RawSelection};
use render::RenderManager;
use tracing::info;
use types::{DatasetId, SessionId};

use crate::error::{AppError, AppResult};
use crate::state::ServerState;

/// Datasets linked from the index page.
pub const LISTED_DATASETS: u32 = 9;

/// Render a template, mapping failures to a 500.
fn render_template<T: Template>(template: &T) -> AppResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("template error: {}", e)))
}

/// `GET /`
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub datasets: Vec<String>,
}

pub async fn index() -> AppResult<Html<String>> {
    let datasets = (1..=LISTED_DATASETS)
        .map(|n| DatasetId(n).path_segment())
        .collect();
    render_template(&IndexPage { datasets })
}

/// A freshly created plot session.
#[derive(Template)]
#[template(path = "plot.html")]
pub struct PlotPage {
    pub title: String,
    pub session_id: SessionId,
    pub ws_uri: String,
    /// `index` followed by every dataset column.
    pub x_cols: Vec<String>,
    pub y_cols: Vec<String>,
    pub x: String,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl PlotPage {
    fn new(session_id: SessionId, ws_uri: String, figure: &Figure, columns: Vec<String>) -> Self {
        let spec = &figure.spec;
        let x_cols = std::iter::once(INDEX_COLUMN.to_string())
            .chain(columns.iter().cloned())
            .collect();
        Self {
            title: figure.title.clone(),
            session_id,
            ws_uri,
            x_cols,
            y_cols: columns,
            x: spec
                .x_column
                .clone()
                .unwrap_or_else(|| INDEX_COLUMN.to_string()),
            left: spec.left_y_columns.clone(),
            right: spec.right_y_columns.clone(),
        }
    }

    fn is_x(&self, col: &str) -> bool {
        self.x == col
    }

    fn is_left(&self, col: &str) -> bool {
        self.left.iter().any(|c| c == col)
    }

    fn is_right(&self, col: &str) -> bool {
        self.right.iter().any(|c| c == col)
    }
}

/// `GET /DataFrame{n}`
pub async fn plot_get(
    State(state): State<ServerState>,
    Path(segment): Path<String>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    create_plot(state, &segment, RawSelection::default(), &headers).await
}

/// `POST /DataFrame{n}`
pub async fn plot_post(
    State(state): State<ServerState>,
    Path(segment): Path<String>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Html<String>> {
    create_plot(state, &segment, RawSelection::from_pairs(pairs), &headers).await
}

/// Connection endpoint for a session, as reached through `headers`' host.
pub fn ws_uri(headers: &HeaderMap, session: SessionId) -> String {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("ws://{}/{}/ws", host, session)
}

async fn create_plot(
    state: ServerState,
    segment: &str,
    selection: RawSelection,
    headers: &HeaderMap,
) -> AppResult<Html<String>> {
    let dataset_id = DatasetId::from_path_segment(segment)
        .ok_or_else(|| AppError::NotFound(segment.to_string()))?;

    let datasets = Arc::clone(&state.datasets);
    let engine = Arc::clone(&state.engine);
    let (figure, manager, columns) = tokio::task::spawn_blocking(
        move || -> AppResult<(Arc<Figure>, Arc<dyn RenderManager>, Vec<String>)> {
            let dataset = datasets.fetch(dataset_id)?;
            let spec = plot::build(&dataset, &selection)?;
            let figure = Arc::new(Figure::new(spec, &dataset, dataset_id.path_segment())?);
            let manager = engine
                .instantiate(Arc::clone(&figure))
                .map_err(AppError::Render)?;
            Ok((figure, manager, dataset.columns().to_vec()))
        },
    )
    .await??;

    let session = state.registry.create(Arc::clone(&figure), manager)?;
    state.metrics.session_created();
    info!(
        %session,
        dataset = %dataset_id,
        x = ?figure.spec.x_column,
        left = ?figure.spec.left_y_columns,
        right = ?figure.spec.right_y_columns,
        "plot session created"
    );

    let page = PlotPage::new(session, ws_uri(headers, session), &figure, columns);
    render_template(&page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::figure;
    use axum::http::HeaderValue;

    #[test]
    fn test_ws_uri_uses_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("plots.local:8080"));
        assert_eq!(ws_uri(&headers, SessionId(12)), "ws://plots.local:8080/12/ws");
        assert_eq!(ws_uri(&HeaderMap::new(), SessionId(1)), "ws://localhost/1/ws");
    }

    #[test]
    fn test_index_lists_datasets() {
        let html = IndexPage {
            datasets: vec!["DataFrame1".into(), "DataFrame2".into()],
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"<a href="/DataFrame2">DataFrame2</a>"#));
    }

    #[test]
    fn test_plot_page_carries_session_and_choices() {
        let figure = figure();
        let columns = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let page = PlotPage::new(SessionId(3), "ws://h/3/ws".into(), &figure, columns);

        assert_eq!(page.x_cols, vec!["index", "A", "B", "C"]);
        assert_eq!(page.y_cols, vec!["A", "B", "C"]);
        assert!(page.is_x("index"));
        assert!(page.is_left("A"));
        assert!(!page.is_right("A"));

        let html = page.render().unwrap();
        assert!(html.contains(r#"data-session-id="3""#));
        assert!(html.contains(r#"data-ws-uri="ws:"#));
        assert!(html.contains(r#"<option value="index" selected>index</option>"#));
        assert!(html.contains(r#"action="/DataFrame1""#));
    }
}
