//! Applicant Routes
//!
//! Ranked preferences of the requesting applicant, the user's own CCAs and
//! the directory search used by chairs.

use axum::extract::{Query, State};
use axum::Json;

use crate::models::cca::{RankablePositionsResponse, RankingsSaved, SaveApplicantRankingsRequest};
use crate::models::user::{UserCca, UserSearchQuery, UserSummary};
use crate::models::response::CommandResponse;
use crate::routes::auth::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// `GET /api/user/rankablePositions`
pub async fn rankable_positions(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CommandResponse<RankablePositionsResponse>>> {
    let info = state.phase().current_phase_info();
    let response = state.ranking().rankable_positions(user.user_id, &info)?;
    Ok(Json(CommandResponse::ok(response)))
}

/// `POST /api/user/saveRankings`
pub async fn save_rankings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SaveApplicantRankingsRequest>,
) -> AppResult<Json<CommandResponse<RankingsSaved>>> {
    let info = state.phase().current_phase_info();
    let saved = state
        .ranking()
        .save_applicant_rankings(user.user_id, &info, &request)?;
    Ok(Json(CommandResponse::ok(saved)))
}

/// `GET /api/user/search?query=`
pub async fn search(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<UserSearchQuery>,
) -> AppResult<Json<CommandResponse<Vec<UserSummary>>>> {
    let users = state.users().search(user.user_id, params.query.as_deref())?;
    Ok(Json(CommandResponse::ok(users)))
}

/// `GET /api/user/getCCAs`
pub async fn ccas(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CommandResponse<Vec<UserCca>>>> {
    let ccas = state.users().ccas(user.user_id)?;
    Ok(Json(CommandResponse::ok(ccas)))
}
