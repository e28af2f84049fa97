//! System Routes
//!
//! Current phase and service health.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use cca_allocation_core::{format_server_time, PhaseInfo};
use chrono::Utc;

use crate::models::response::{CommandResponse, CurrentPhaseResponse, HealthResponse};
use crate::state::AppState;

pub const CURRENT_PHASE_CACHE_CONTROL: &str = "private, s-maxage=30, stale-while-revalidate=60";
pub const PHASE_LOOKUP_FAILED: &str = "Failed to determine current phase";

/// `GET /api/system/currentPhase`
pub async fn current_phase(State(state): State<AppState>) -> Response {
    let now = Utc::now();
    let is_testing_mode = state.config().is_testing_mode();

    match state.phase().try_phase_info_at(now) {
        Ok(info) => (
            [(header::CACHE_CONTROL, CURRENT_PHASE_CACHE_CONTROL)],
            Json(CurrentPhaseResponse {
                info,
                timestamp: format_server_time(now),
                is_testing_mode,
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "current phase lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CACHE_CONTROL, "no-cache")],
                Json(CurrentPhaseResponse {
                    info: PhaseInfo::unavailable(now),
                    timestamp: format_server_time(now),
                    is_testing_mode,
                    error: Some(PHASE_LOOKUP_FAILED.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<CommandResponse<HealthResponse>> {
    let mut health = HealthResponse::default();
    health.database = state.is_database_healthy();
    health.run_mode = state.config().run_mode.as_str().to_string();
    health.status = if health.database {
        "healthy".to_string()
    } else {
        "degraded".to_string()
    };

    Json(CommandResponse::ok(health))
}
