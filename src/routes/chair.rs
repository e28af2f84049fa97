//! Chair Routes
//!
//! Applicant orderings maintained by CCA leads and vices.

use axum::extract::{Path, State};
use axum::Json;

use crate::models::cca::{
    ApplicantAdded, ApplicantRequest, ChairPositionsResponse, ChairRankRequest, RankingsSaved,
};
use crate::models::response::CommandResponse;
use crate::routes::auth::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// `GET /api/chair/positions`
pub async fn list_positions(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CommandResponse<ChairPositionsResponse>>> {
    let info = state.phase().current_phase_info();
    let response = state.ranking().chair_positions(user.user_id, &info)?;
    Ok(Json(CommandResponse::ok(response)))
}

/// `POST /api/chair/positions/:position_id/rank`
pub async fn rank_applicants(
    State(state): State<AppState>,
    user: AuthUser,
    Path(position_id): Path<i64>,
    Json(request): Json<ChairRankRequest>,
) -> AppResult<Json<CommandResponse<RankingsSaved>>> {
    let info = state.phase().current_phase_info();
    let saved = state
        .ranking()
        .rank_applicants(user.user_id, position_id, &info, &request)?;
    Ok(Json(CommandResponse::ok(saved)))
}

/// `POST /api/chair/positions/:position_id/addApplicant`
pub async fn add_applicant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(position_id): Path<i64>,
    Json(request): Json<ApplicantRequest>,
) -> AppResult<Json<CommandResponse<ApplicantAdded>>> {
    let info = state.phase().current_phase_info();
    let added = state
        .ranking()
        .add_applicant(user.user_id, position_id, &info, &request)?;
    Ok(Json(CommandResponse::ok(added)))
}

/// `POST /api/chair/positions/:position_id/removeApplicant`
pub async fn remove_applicant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(position_id): Path<i64>,
    Json(request): Json<ApplicantRequest>,
) -> AppResult<Json<CommandResponse<()>>> {
    let info = state.phase().current_phase_info();
    state
        .ranking()
        .remove_applicant(user.user_id, position_id, &info, &request)?;
    Ok(Json(CommandResponse::ok(())))
}
