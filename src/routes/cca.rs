//! CCA Member Routes
//!
//! Member listing and lead/vice member management for one CCA.

use axum::extract::{Path, State};
use axum::Json;

use crate::models::cca::{CutMemberRequest, MemberRequest, MembersResponse};
use crate::models::response::CommandResponse;
use crate::routes::auth::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// `GET /api/cca/:cca_name/members`
pub async fn members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cca_name): Path<String>,
) -> AppResult<Json<CommandResponse<MembersResponse>>> {
    let info = state.phase().current_phase_info();
    let response = state.membership().members(user.user_id, &info, &cca_name)?;
    Ok(Json(CommandResponse::ok(response)))
}

/// `POST /api/cca/:cca_name/addMember`
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cca_name): Path<String>,
    Json(request): Json<MemberRequest>,
) -> AppResult<Json<CommandResponse<()>>> {
    let info = state.phase().current_phase_info();
    state
        .membership()
        .add_member(user.user_id, &info, &cca_name, &request)?;
    Ok(Json(CommandResponse::ok(())))
}

/// `POST /api/cca/:cca_name/removeMember`
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cca_name): Path<String>,
    Json(request): Json<MemberRequest>,
) -> AppResult<Json<CommandResponse<()>>> {
    let info = state.phase().current_phase_info();
    state
        .membership()
        .remove_member(user.user_id, &info, &cca_name, &request)?;
    Ok(Json(CommandResponse::ok(())))
}

/// `POST /api/cca/:cca_name/cutMember`
pub async fn cut_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cca_name): Path<String>,
    Json(request): Json<CutMemberRequest>,
) -> AppResult<Json<CommandResponse<()>>> {
    let info = state.phase().current_phase_info();
    state
        .membership()
        .cut_member(user.user_id, &info, &cca_name, &request)?;
    Ok(Json(CommandResponse::ok(())))
}
