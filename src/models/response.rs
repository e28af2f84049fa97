//! Response Types
//!
//! Standard response types for all HTTP handlers.

use cca_allocation_core::PhaseInfo;
use serde::{Deserialize, Serialize};

/// Generic response envelope for handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, crate::utils::error::AppError>> for CommandResponse<T> {
    fn from(result: Result<T, crate::utils::error::AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Body of `GET /api/system/currentPhase`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPhaseResponse {
    #[serde(flatten)]
    pub info: PhaseInfo,
    /// Time the request was answered
    pub timestamp: String,
    pub is_testing_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Short phase summary attached to listing responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSummary {
    pub phase: String,
    pub round: String,
    pub user_message: String,
}

impl From<&PhaseInfo> for PhaseSummary {
    fn from(info: &PhaseInfo) -> Self {
        Self {
            phase: info.phase.to_string(),
            round: info.round.to_string(),
            user_message: info.user_message.clone(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub database: bool,
    pub run_mode: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: "cca-allocation".to_string(),
            database: false,
            run_mode: "production".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cca_allocation_core::{Phase, PhaseInfo};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_command_response_ok() {
        let response = CommandResponse::ok("test".to_string());
        assert!(response.success);
        assert_eq!(response.data, Some("test".to_string()));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_command_response_err() {
        let response: CommandResponse<String> = CommandResponse::err("error message");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("error message".to_string()));
    }

    #[test]
    fn test_health_response_default() {
        let health = HealthResponse::default();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "cca-allocation");
    }

    #[test]
    fn test_current_phase_response_is_flat() {
        let now = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        let response = CurrentPhaseResponse {
            info: PhaseInfo::for_phase(Phase::MaincommInterviews, now, vec![], None),
            timestamp: "2026-09-01T00:00:00.000Z".to_string(),
            is_testing_mode: false,
            error: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["phase"], "maincomm_interviews");
        assert_eq!(value["isTestingMode"], false);
        assert_eq!(value["serverTime"], "2026-09-01T00:00:00.000Z");
        assert!(value.get("error").is_none());
    }
}
