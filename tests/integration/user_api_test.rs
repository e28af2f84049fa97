//! User Directory API Tests

use axum::http::StatusCode;

use super::support::{app_with_flags, seed_committee, seed_team};

#[tokio::test]
async fn test_search_by_chair() {
    let app = app_with_flags(&[]);
    let c = seed_committee(&app.db);

    let response = app.get("/api/user/search?query=student", Some(c.chair)).await;
    assert_eq!(response.status, StatusCode::OK);
    let users = response.body["data"].as_array().unwrap().clone();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], c.student);
    assert_eq!(users[0]["name"], "Student");
}

#[tokio::test]
async fn test_search_rejections() {
    let app = app_with_flags(&[]);
    let c = seed_committee(&app.db);

    let short = app.get("/api/user/search?query=s", Some(c.chair)).await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.body["error"], "Query must be at least 2 characters.");

    let missing = app.get("/api/user/search", Some(c.chair)).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let by_student = app.get("/api/user/search?query=chair", Some(c.student)).await;
    assert_eq!(by_student.status, StatusCode::FORBIDDEN);
    assert_eq!(
        by_student.body["error"],
        "Forbidden: Only CCA leads/vices can search users"
    );

    let anonymous = app.get("/api/user/search?query=chair", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_ccas() {
    let app = app_with_flags(&[]);
    let t = seed_team(&app.db);

    let response = app.get("/api/user/getCCAs", Some(t.captain)).await;
    assert_eq!(response.status, StatusCode::OK);
    let ccas = response.body["data"].as_array().unwrap().clone();
    assert_eq!(ccas.len(), 1);
    assert_eq!(ccas[0]["name"], "Floorball");
    assert_eq!(ccas[0]["role"], "Captain");
    assert_eq!(ccas[0]["position_type"], "lead");
    assert_eq!(ccas[0]["cca_type"], "sports");
    assert_eq!(ccas[0]["points"], 0);

    let empty = app.get("/api/user/getCCAs", Some(t.student)).await;
    assert_eq!(empty.body["data"], serde_json::json!([]));
}
