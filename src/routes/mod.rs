//! HTTP Routes
//!
//! Axum handlers grouped by area, and the router that mounts them.

pub mod auth;
pub mod cca;
pub mod chair;
pub mod sports_culture;
pub mod system;
pub mod user;

use axum::http::HeaderMap;
use axum::middleware::{from_fn, Next};
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub use auth::{AuthUser, USER_ID_HEADER};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(system::health))
        .route("/api/system/currentPhase", get(system::current_phase))
        .route("/api/user/rankablePositions", get(user::rankable_positions))
        .route("/api/user/saveRankings", post(user::save_rankings))
        .route("/api/user/search", get(user::search))
        .route("/api/user/getCCAs", get(user::ccas))
        .route("/api/chair/positions", get(chair::list_positions))
        .route(
            "/api/chair/positions/:position_id/rank",
            post(chair::rank_applicants),
        )
        .route(
            "/api/chair/positions/:position_id/addApplicant",
            post(chair::add_applicant),
        )
        .route(
            "/api/chair/positions/:position_id/removeApplicant",
            post(chair::remove_applicant),
        )
        .route("/api/sportsCulture/available", get(sports_culture::available))
        .route(
            "/api/sportsCulture/apply",
            post(sports_culture::apply).delete(sports_culture::withdraw),
        )
        .route("/api/cca/:cca_name/members", get(cca::members))
        .route("/api/cca/:cca_name/addMember", post(cca::add_member))
        .route("/api/cca/:cca_name/removeMember", post(cca::remove_member))
        .route("/api/cca/:cca_name/cutMember", post(cca::cut_member))
        .layer(from_fn(request_log_middleware))
        .with_state(state)
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

async fn request_log_middleware(
    headers: HeaderMap,
    request: axum::extract::Request,
    next: Next,
) -> axum::response::Response {
    let rid = request_id(&headers);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!(
        request_id = %rid,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "request"
    );
    response
}
