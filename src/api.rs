//! HTTP API endpoints.
//!
//! The game itself runs over the WebSocket; this only reports liveness.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use crate::types::GamePhase;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub phase: GamePhase,
    pub round_no: u32,
    /// Name of the configured secret generator, if any
    pub generator: Option<String>,
}

/// Report liveness and where the game stands.
///
/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (phase, round_no) = {
        let session = state.session.read().await;
        (session.phase(), session.round_no)
    };

    Json(HealthResponse {
        status: "ok",
        phase,
        round_no,
        generator: state.secrets.generator_name().map(str::to_string),
    })
}
