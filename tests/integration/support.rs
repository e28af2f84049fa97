//! Test fixtures shared by the integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use cca_allocation::models::cca::AllocationEventType;
use cca_allocation::storage::Database;
use cca_allocation::{build_router, AppConfig, AppState, RunMode};
use cca_allocation_core::{CoreError, CoreResult, FeatureFlag, FlagStore};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::util::ServiceExt;

// ============================================================================
// Helper Functions
// ============================================================================

pub struct TestApp {
    pub db: Database,
    pub router: Router,
}

/// App on a fresh database whose flags expire `hours` from now
pub fn app_with_flags(flags: &[(&str, i64)]) -> TestApp {
    app_with_config(AppConfig::default(), flags)
}

pub fn app_with_config(config: AppConfig, flags: &[(&str, i64)]) -> TestApp {
    let db = Database::new_in_memory().unwrap();
    for (name, hours) in flags {
        db.upsert_feature_flag(&FeatureFlag::new(*name, Utc::now() + Duration::hours(*hours)))
            .unwrap();
    }
    let router = build_router(AppState::new(db.clone(), config));
    TestApp { db, router }
}

/// App whose flag store always fails
pub fn app_with_broken_flags() -> TestApp {
    struct BrokenStore;

    impl FlagStore for BrokenStore {
        fn fetch_flags(&self) -> CoreResult<Vec<FeatureFlag>> {
            Err(CoreError::flag_store("connection refused"))
        }
    }

    let db = Database::new_in_memory().unwrap();
    let state = AppState::with_flag_store(db.clone(), Arc::new(BrokenStore), AppConfig::default());
    TestApp {
        db,
        router: build_router(state),
    }
}

pub fn testing_config() -> AppConfig {
    AppConfig {
        run_mode: RunMode::Test,
        ..Default::default()
    }
}

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn get(&self, uri: &str, user: Option<i64>) -> Response {
        self.send(Method::GET, uri, user, None).await
    }

    pub async fn post(&self, uri: &str, user: Option<i64>, body: Value) -> Response {
        self.send(Method::POST, uri, user, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: Option<i64>, body: Value) -> Response {
        self.send(Method::DELETE, uri, user, Some(body)).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<i64>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user {
            builder = builder.header("x-user-id", user_id.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Response {
            status,
            headers,
            body,
        }
    }
}

/// A committee with a lead, a maincomm and a subcomm position, plus a student
pub struct Committee {
    pub cca: i64,
    pub chair: i64,
    pub student: i64,
    pub lead: i64,
    pub maincomm: i64,
    pub subcomm: i64,
}

pub fn seed_committee(db: &Database) -> Committee {
    let chair = db.insert_user("chair@hall.edu", Some("Chair")).unwrap();
    let student = db.insert_user("student@hall.edu", Some("Student")).unwrap();
    let cca = db.insert_cca("JCRC", "committee").unwrap();
    let lead = db.insert_position(cca, "President", "lead", Some(1)).unwrap();
    let maincomm = db.insert_position(cca, "Treasurer", "maincomm", Some(1)).unwrap();
    let subcomm = db.insert_position(cca, "Publicity", "subcomm", Some(5)).unwrap();
    db.insert_appointment_with_event(chair, lead, AllocationEventType::Accepted, "seed")
        .unwrap();
    Committee {
        cca,
        chair,
        student,
        lead,
        maincomm,
        subcomm,
    }
}

/// A sports CCA with a captain, member and team manager positions, plus a student
pub struct Team {
    pub captain: i64,
    pub student: i64,
    pub lead: i64,
    pub member: i64,
    pub manager: i64,
}

pub fn seed_team(db: &Database) -> Team {
    let captain = db.insert_user("captain@hall.edu", Some("Captain")).unwrap();
    let student = db.insert_user("fresh@hall.edu", Some("Fresh")).unwrap();
    let cca = db.insert_cca("Floorball", "sports").unwrap();
    let lead = db.insert_position(cca, "Captain", "lead", Some(1)).unwrap();
    let member = db.insert_position(cca, "Member", "member", Some(30)).unwrap();
    let manager = db
        .insert_position(cca, "Team Manager", "team manager", Some(1))
        .unwrap();
    db.insert_appointment_with_event(captain, lead, AllocationEventType::Accepted, "seed")
        .unwrap();
    Team {
        captain,
        student,
        lead,
        member,
        manager,
    }
}
