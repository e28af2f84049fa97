//! Sports/Culture Membership API Tests

use axum::http::StatusCode;
use serde_json::json;

use super::support::{app_with_flags, seed_team};

#[tokio::test]
async fn test_available_reports_window() {
    let app = app_with_flags(&[("subcomm_interviews", 1)]);
    let t = seed_team(&app.db);

    let response = app.get("/api/sportsCulture/available", Some(t.student)).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["applicationsOpen"], false);
    assert_eq!(data["positions"]["sports"].as_array().unwrap().len(), 2);
    assert_eq!(data["positions"]["culture"], json!([]));
    assert_eq!(data["phaseInfo"]["phase"], "subcomm_interviews");
}

#[tokio::test]
async fn test_apply_and_withdraw() {
    let app = app_with_flags(&[("subcomm_concurrent_ranking", 1)]);
    let t = seed_team(&app.db);

    let applied = app
        .post("/api/sportsCulture/apply", Some(t.student), json!({ "position_id": t.member }))
        .await;
    assert_eq!(applied.status, StatusCode::OK);
    assert_eq!(applied.body["success"], true);

    let conflict = app
        .post("/api/sportsCulture/apply", Some(t.student), json!({ "position_id": t.manager }))
        .await;
    assert_eq!(conflict.status, StatusCode::BAD_REQUEST);

    let listed = app.get("/api/sportsCulture/available", Some(t.student)).await;
    let sports = listed.body["data"]["positions"]["sports"].as_array().unwrap().clone();
    let manager = sports.iter().find(|p| p["id"] == t.manager).unwrap();
    assert_eq!(manager["can_apply"], false);
    assert_eq!(
        manager["conflict_reason"],
        "You have already applied as Member for Floorball"
    );

    let withdrawn = app
        .delete("/api/sportsCulture/apply", Some(t.student), json!({ "position_id": t.member }))
        .await;
    assert_eq!(withdrawn.status, StatusCode::OK);
    assert!(app.db.list_allocation_events(t.student, t.member).unwrap().is_empty());
}

#[tokio::test]
async fn test_apply_outside_window() {
    let app = app_with_flags(&[("maincomm_concurrent_ranking", 1)]);
    let t = seed_team(&app.db);

    let response = app
        .post("/api/sportsCulture/apply", Some(t.student), json!({ "position_id": t.member }))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body["error"],
        "Sports/Culture applications are not currently open"
    );
}

#[tokio::test]
async fn test_members_and_management() {
    let app = app_with_flags(&[("full_results_available", 24)]);
    let t = seed_team(&app.db);

    let listed = app.get("/api/cca/Floorball/members", Some(t.captain)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"]["canManage"], true);

    let added = app
        .post("/api/cca/Floorball/addMember", Some(t.captain), json!({ "user_id": t.student }))
        .await;
    assert_eq!(added.status, StatusCode::OK);
    assert!(app.db.appointment_exists(t.student, t.member).unwrap());

    let by_student = app
        .post("/api/cca/Floorball/addMember", Some(t.student), json!({ "user_id": t.captain }))
        .await;
    assert_eq!(by_student.status, StatusCode::FORBIDDEN);

    let cut = app
        .post(
            "/api/cca/Floorball/cutMember",
            Some(t.captain),
            json!({ "user_id": t.student, "position_id": t.member, "reason": "attendance" }),
        )
        .await;
    assert_eq!(cut.status, StatusCode::OK);
    assert_eq!(
        app.db.list_allocation_events(t.student, t.member).unwrap(),
        vec!["accepted".to_string(), "cut".to_string()]
    );

    let unknown = app.get("/api/cca/Nowhere/members", Some(t.captain)).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_management_closed_during_applications() {
    let app = app_with_flags(&[("subcomm_concurrent_ranking", 1)]);
    let t = seed_team(&app.db);

    let listed = app.get("/api/cca/Floorball/members", Some(t.captain)).await;
    assert_eq!(listed.body["data"]["canManage"], false);

    for path in ["addMember", "removeMember"] {
        let response = app
            .post(
                &format!("/api/cca/Floorball/{}", path),
                Some(t.captain),
                json!({ "user_id": t.student }),
            )
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{}", path);
        assert_eq!(
            response.body["error"],
            "Sports/Culture member management is currently not available"
        );
    }

    let cut = app
        .post(
            "/api/cca/Floorball/cutMember",
            Some(t.captain),
            json!({ "user_id": t.student, "position_id": t.member }),
        )
        .await;
    assert_eq!(cut.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_withdraw_rejects_non_application_position() {
    let app = app_with_flags(&[("subcomm_concurrent_ranking", 1)]);
    let t = seed_team(&app.db);

    let response = app
        .delete("/api/sportsCulture/apply", Some(t.captain), json!({ "position_id": t.lead }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.db.appointment_exists(t.captain, t.lead).unwrap());
    assert_eq!(
        app.db.list_allocation_events(t.captain, t.lead).unwrap(),
        vec!["accepted".to_string()]
    );
}
