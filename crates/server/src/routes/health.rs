//! Health check endpoint.
//!
//! - `GET /health` - liveness probe (always 200 if the server is up)

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::ServerState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: &'static str,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Live plot sessions.
    pub sessions: usize,
    /// Sessions created since start.
    pub sessions_created: u64,
    /// Open WebSocket connections.
    pub ws_connections: u64,
    /// Inbound messages dropped as malformed.
    pub malformed_messages: u64,
    /// Exports served.
    pub exports: u64,
}

/// Liveness probe: `GET /health`
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let metrics = &state.metrics;

    Json(HealthResponse {
        status: "healthy",
        uptime_secs: state.uptime_secs(),
        sessions: state.registry.len(),
        sessions_created: metrics.sessions(),
        ws_connections: metrics.ws_count(),
        malformed_messages: metrics.malformed(),
        exports: metrics.export_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy",
            uptime_secs: 60,
            sessions: 2,
            sessions_created: 5,
            ws_connections: 3,
            malformed_messages: 0,
            exports: 1,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"sessions\":2"));
        assert!(json.contains("\"ws_connections\":3"));
    }
}
