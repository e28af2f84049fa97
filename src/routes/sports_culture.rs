//! Sports/Culture Routes
//!
//! Self-service applications to sports and culture CCAs.

use axum::extract::State;
use axum::Json;

use crate::models::cca::{AvailablePositionsResponse, PositionRequest};
use crate::models::response::CommandResponse;
use crate::routes::auth::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// `GET /api/sportsCulture/available`
pub async fn available(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CommandResponse<AvailablePositionsResponse>>> {
    let info = state.phase().current_phase_info();
    let response = state.membership().available_positions(user.user_id, &info)?;
    Ok(Json(CommandResponse::ok(response)))
}

/// `POST /api/sportsCulture/apply`
pub async fn apply(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<PositionRequest>,
) -> AppResult<Json<CommandResponse<()>>> {
    let info = state.phase().current_phase_info();
    state.membership().apply(user.user_id, &info, &request)?;
    Ok(Json(CommandResponse::ok(())))
}

/// `DELETE /api/sportsCulture/apply`
pub async fn withdraw(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<PositionRequest>,
) -> AppResult<Json<CommandResponse<()>>> {
    let info = state.phase().current_phase_info();
    state.membership().withdraw(user.user_id, &info, &request)?;
    Ok(Json(CommandResponse::ok(())))
}
