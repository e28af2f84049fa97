//! CCA Models
//!
//! Rows, request bodies and listing responses for positions, appointments,
//! rankings and sports/culture membership.

use serde::{Deserialize, Serialize};

use crate::models::response::PhaseSummary;

/// Position types open to sports/culture self-service applications
pub const SPORTS_CULTURE_POSITION_TYPES: [&str; 2] = ["member", "team manager"];

/// Position type of the default membership position of a sports/culture CCA
pub const MEMBER_POSITION_TYPE: &str = "member";

pub fn is_sports_or_culture(cca_type: &str) -> bool {
    matches!(cca_type, "sports" | "culture")
}

/// Kind of entry written to the allocation event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationEventType {
    Applied,
    Accepted,
    Cut,
}

impl AllocationEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationEventType::Applied => "applied",
            AllocationEventType::Accepted => "accepted",
            AllocationEventType::Cut => "cut",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cca {
    pub id: i64,
    pub name: String,
    pub cca_type: String,
}

impl Cca {
    pub fn is_sports_or_culture(&self) -> bool {
        is_sports_or_culture(&self.cca_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    pub cca_id: i64,
    pub name: String,
    pub position_type: String,
    pub capacity: Option<i64>,
    pub description: Option<String>,
}

/// A position an applicant may rank this round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankablePosition {
    pub id: i64,
    pub name: String,
    pub cca_name: String,
    pub position_type: String,
    pub capacity: i64,
    pub available_capacity: i64,
    pub applied_count: i64,
    pub description: Option<String>,
    pub user_ranking: Option<i64>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedApplicant {
    pub user_id: i64,
    pub name: Option<String>,
    pub ranking: i64,
}

/// A position a chair ranks applicants for, with the current ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChairPosition {
    pub id: i64,
    pub name: String,
    pub cca_id: i64,
    pub cca_name: String,
    pub position_type: String,
    pub total_capacity: i64,
    pub available_capacity: i64,
    pub applicants: Vec<RankedApplicant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub position_id: i64,
    pub position_name: String,
    pub position_type: String,
}

/// A sports/culture position as seen by one applicant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailablePosition {
    pub id: i64,
    pub name: String,
    pub cca_name: String,
    pub cca_id: i64,
    pub cca_type: String,
    pub position_type: String,
    pub description: Option<String>,
    pub capacity: Option<i64>,
    pub is_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_current_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_reason: Option<String>,
    pub can_apply: bool,
}

/// An existing appointment of one user, joined with its position and CCA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAppointment {
    pub position_id: i64,
    pub position_name: String,
    pub position_type: String,
    pub cca_id: i64,
    pub cca_name: String,
    pub cca_type: String,
}

// ── Requests ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantRankingEntry {
    pub position_id: i64,
    pub ranking: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveApplicantRankingsRequest {
    pub rankings: Vec<ApplicantRankingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChairRankingEntry {
    pub user_id: i64,
    pub ranking: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChairRankRequest {
    pub rankings: Vec<ChairRankingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRequest {
    pub position_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRequest {
    pub user_id: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutMemberRequest {
    pub user_id: i64,
    pub position_id: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

// ── Responses ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankablePositionsResponse {
    pub positions: Vec<RankablePosition>,
    pub phase_info: PhaseSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChairPositionsResponse {
    pub positions: Vec<ChairPosition>,
    pub phase_info: PhaseSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupedPositions {
    pub sports: Vec<AvailablePosition>,
    pub culture: Vec<AvailablePosition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailablePositionsResponse {
    pub positions: GroupedPositions,
    pub applications_open: bool,
    pub phase_info: PhaseSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembersResponse {
    pub cca: Cca,
    pub members: Vec<Member>,
    pub can_manage: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingsSaved {
    pub updated_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantAdded {
    pub ranking: i64,
}
