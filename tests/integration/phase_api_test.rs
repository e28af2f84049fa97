//! Current Phase API Tests

use axum::http::StatusCode;
use cca_allocation::{AppConfig, RunMode};
use cca_allocation_core::Phase;

use super::support::{app_with_broken_flags, app_with_config, app_with_flags, testing_config};

#[tokio::test]
async fn test_current_phase_inactive_without_flags() {
    let app = app_with_flags(&[]);
    let response = app.get("/api/system/currentPhase", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get("cache-control").unwrap(),
        "private, s-maxage=30, stale-while-revalidate=60"
    );
    let body = response.body;
    assert_eq!(body["phase"], "inactive");
    assert_eq!(body["round"], "inactive");
    assert_eq!(body["allowChairRanking"], false);
    assert_eq!(body["allowApplicantRanking"], false);
    assert_eq!(body["showResults"], false);
    assert_eq!(body["userMessage"], "CCA allocation is currently not active.");
    assert_eq!(body["activeFlags"], serde_json::json!([]));
    assert_eq!(body["isTestingMode"], false);
    assert!(body.get("nextPhaseDate").is_none());
    assert!(body["serverTime"].as_str().unwrap().ends_with('Z'));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_current_phase_priority_and_next_date() {
    let app = app_with_flags(&[
        ("subcomm_interviews", 2),
        ("maincomm_results_available", 5),
        ("maincomm_interviews", -1),
    ]);
    let body = app.get("/api/system/currentPhase", None).await.body;

    assert_eq!(body["phase"], "maincomm_results_available");
    assert_eq!(body["round"], "maincomm");
    assert_eq!(body["showResults"], true);
    assert_eq!(body["showMaincommResults"], true);
    assert_eq!(body["showSubcommResults"], false);
    assert_eq!(
        body["activeFlags"],
        serde_json::json!(["subcomm_interviews", "maincomm_results_available"])
    );
    assert!(body["nextPhaseDate"].as_str().unwrap().ends_with("GMT+8"));
}

#[tokio::test]
async fn test_unrecognized_flags_listed_but_ignored() {
    let app = app_with_flags(&[("holiday_subsidy_open", 3)]);
    let body = app.get("/api/system/currentPhase", None).await.body;

    assert_eq!(body["phase"], "inactive");
    assert_eq!(body["activeFlags"], serde_json::json!(["holiday_subsidy_open"]));
    assert!(body["nextPhaseDate"].is_string());
}

#[tokio::test]
async fn test_store_failure_returns_fallback_body() {
    let app = app_with_broken_flags();
    let response = app.get("/api/system/currentPhase", None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers.get("cache-control").unwrap(), "no-cache");
    assert_eq!(response.body["phase"], "inactive");
    assert_eq!(response.body["allowChairRanking"], false);
    assert_eq!(response.body["userMessage"], "Error determining current phase.");
    assert_eq!(response.body["error"], "Failed to determine current phase");
}

#[tokio::test]
async fn test_store_failure_closes_gates() {
    let app = app_with_broken_flags();
    let user = app.db.insert_user("s@hall.edu", None).unwrap();

    let response = app
        .post(
            "/api/user/saveRankings",
            Some(user),
            serde_json::json!({ "rankings": [] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body["error"],
        "Student ranking is not active. Current phase: inactive"
    );
}

#[tokio::test]
async fn test_override_in_test_mode() {
    let config = AppConfig {
        phase_override: Some(Phase::SubcommConcurrentRanking),
        ..testing_config()
    };
    let app = app_with_config(config, &[("maincomm_interviews", 4)]);
    let body = app.get("/api/system/currentPhase", None).await.body;

    assert_eq!(body["phase"], "subcomm_concurrent_ranking");
    assert_eq!(body["activeFlags"], serde_json::json!(["subcomm_concurrent_ranking"]));
    assert_eq!(body["isTestingMode"], true);
}

#[tokio::test]
async fn test_override_ignored_in_production() {
    let config = AppConfig {
        run_mode: RunMode::Production,
        phase_override: Some(Phase::FullResultsAvailable),
        ..Default::default()
    };
    let app = app_with_config(config, &[]);
    let body = app.get("/api/system/currentPhase", None).await.body;

    assert_eq!(body["phase"], "inactive");
    assert_eq!(body["isTestingMode"], false);
}

#[tokio::test]
async fn test_health() {
    let app = app_with_flags(&[]);
    let response = app.get("/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "healthy");
    assert_eq!(response.body["data"]["database"], true);
    assert_eq!(response.body["data"]["service"], "cca-allocation");
}
