//! Ranking API Tests

use axum::http::StatusCode;
use serde_json::json;

use super::support::{app_with_flags, seed_committee};

#[tokio::test]
async fn test_requests_without_user_are_unauthorized() {
    let app = app_with_flags(&[("maincomm_concurrent_ranking", 1)]);
    let response = app.get("/api/user/rankablePositions", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_rankable_positions_closed_is_empty() {
    let app = app_with_flags(&[("maincomm_interviews", 1)]);
    let c = seed_committee(&app.db);

    let response = app.get("/api/user/rankablePositions", Some(c.student)).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["positions"], json!([]));
    assert_eq!(data["phaseInfo"]["phase"], "maincomm_interviews");
    assert_eq!(
        data["error"],
        "Student ranking is not active. Current phase: maincomm_interviews"
    );
}

#[tokio::test]
async fn test_rankable_positions_follow_round() {
    let app = app_with_flags(&[("maincomm_concurrent_ranking", 1)]);
    let c = seed_committee(&app.db);

    let response = app.get("/api/user/rankablePositions", Some(c.student)).await;
    let positions = response.body["data"]["positions"].as_array().unwrap().clone();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["id"], c.maincomm);
    assert_eq!(positions[0]["position_type"], "maincomm");
}

#[tokio::test]
async fn test_save_rankings_flow() {
    let app = app_with_flags(&[("subcomm_concurrent_ranking", 1)]);
    let c = seed_committee(&app.db);

    let response = app
        .post(
            "/api/user/saveRankings",
            Some(c.student),
            json!({ "rankings": [
                { "position_id": c.subcomm, "ranking": 1 },
                { "position_id": c.maincomm, "ranking": 2 }
            ] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["updated_count"], 2);

    let listed = app.get("/api/user/rankablePositions", Some(c.student)).await;
    let positions = listed.body["data"]["positions"].as_array().unwrap().clone();
    assert!(positions.iter().all(|p| p["is_selected"] == true));
}

#[tokio::test]
async fn test_save_rankings_rejected_outside_window() {
    let app = app_with_flags(&[("maincomm_results_processing", 1)]);
    let c = seed_committee(&app.db);

    let response = app
        .post(
            "/api/user/saveRankings",
            Some(c.student),
            json!({ "rankings": [{ "position_id": c.maincomm, "ranking": 1 }] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body["error"],
        "Student ranking is not active. Current phase: maincomm_results_processing"
    );
}

#[tokio::test]
async fn test_save_rankings_rejects_chair_role_position() {
    let app = app_with_flags(&[("maincomm_concurrent_ranking", 1)]);
    let c = seed_committee(&app.db);
    let vice = app.db.insert_position(c.cca, "Vice President", "vice", Some(1)).unwrap();

    let response = app
        .post(
            "/api/user/saveRankings",
            Some(c.student),
            json!({ "rankings": [{ "position_id": vice, "ranking": 1 }] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chair_ranking_gate() {
    let app = app_with_flags(&[("subcomm_interviews", 1)]);
    let c = seed_committee(&app.db);

    let response = app
        .post(
            &format!("/api/chair/positions/{}/addApplicant", c.subcomm),
            Some(c.chair),
            json!({ "user_id": c.student }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body["error"],
        "Chair ranking is not active. Current phase: subcomm_interviews"
    );
}

#[tokio::test]
async fn test_chair_flow() {
    let app = app_with_flags(&[("maincomm_concurrent_ranking", 1)]);
    let c = seed_committee(&app.db);
    let other = app.db.insert_user("other@hall.edu", Some("Other")).unwrap();
    let base = format!("/api/chair/positions/{}", c.maincomm);

    let added = app
        .post(&format!("{}/addApplicant", base), Some(c.chair), json!({ "user_id": c.student }))
        .await;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.body["data"]["ranking"], 1);

    let added = app
        .post(&format!("{}/addApplicant", base), Some(c.chair), json!({ "user_id": other }))
        .await;
    assert_eq!(added.body["data"]["ranking"], 2);

    let duplicate = app
        .post(&format!("{}/addApplicant", base), Some(c.chair), json!({ "user_id": other }))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["error"], "Applicant already exists for this position");

    let ranked = app
        .post(
            &format!("{}/rank", base),
            Some(c.chair),
            json!({ "rankings": [
                { "user_id": other, "ranking": 1 },
                { "user_id": c.student, "ranking": 2 }
            ] }),
        )
        .await;
    assert_eq!(ranked.status, StatusCode::OK);

    let removed = app
        .post(&format!("{}/removeApplicant", base), Some(c.chair), json!({ "user_id": other }))
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let listed = app.get("/api/chair/positions", Some(c.chair)).await;
    let positions = listed.body["data"]["positions"].as_array().unwrap().clone();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["applicants"][0]["user_id"], c.student);
    assert_eq!(positions[0]["applicants"][0]["ranking"], 1);
}

#[tokio::test]
async fn test_non_chair_forbidden() {
    let app = app_with_flags(&[("maincomm_concurrent_ranking", 1)]);
    let c = seed_committee(&app.db);

    let response = app
        .post(
            &format!("/api/chair/positions/{}/rank", c.maincomm),
            Some(c.student),
            json!({ "rankings": [] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "Unauthorized: Not a lead/vice for this CCA");

    let missing = app
        .post("/api/chair/positions/9999/rank", Some(c.chair), json!({ "rankings": [] }))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chair_cannot_rank_outside_round() {
    let app = app_with_flags(&[("maincomm_concurrent_ranking", 1)]);
    let c = seed_committee(&app.db);

    let lead = app
        .post(
            &format!("/api/chair/positions/{}/addApplicant", c.lead),
            Some(c.chair),
            json!({ "user_id": c.student }),
        )
        .await;
    assert_eq!(lead.status, StatusCode::BAD_REQUEST);
    assert_eq!(lead.body["success"], false);

    let subcomm = app
        .post(
            &format!("/api/chair/positions/{}/rank", c.subcomm),
            Some(c.chair),
            json!({ "rankings": [{ "user_id": c.student, "ranking": 1 }] }),
        )
        .await;
    assert_eq!(subcomm.status, StatusCode::BAD_REQUEST);
    assert!(app.db.list_ranked_applicants(c.subcomm).unwrap().is_empty());
}

#[tokio::test]
async fn test_rank_unknown_user_not_found() {
    let app = app_with_flags(&[("maincomm_concurrent_ranking", 1)]);
    let c = seed_committee(&app.db);

    let response = app
        .post(
            &format!("/api/chair/positions/{}/rank", c.maincomm),
            Some(c.chair),
            json!({ "rankings": [{ "user_id": 9999, "ranking": 1 }] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "User 9999 not found");
}
