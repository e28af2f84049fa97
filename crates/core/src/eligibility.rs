//! Round-Scoped Eligibility Rules
//!
//! Pure predicates consulted by every ranking, application and membership
//! endpoint before it touches the store.

use crate::phase::Phase;

/// Position types reserved for CCA chairs. Never rankable, in any round.
pub const CHAIR_ROLES: [&str; 2] = ["lead", "vice"];

/// Position types eligible for ranking/application in `round`.
///
/// Unrecognized rounds fall through as their own name. Callers must still
/// drop [`CHAIR_ROLES`], see [`exclude_chair_roles`].
pub fn eligible_position_types(round: &str) -> Vec<&str> {
    match round {
        "maincomm" => vec!["maincomm", "blockcomm"],
        "subcomm" => vec!["subcomm", "blockcomm", "maincomm"],
        other => vec![other],
    }
}

/// Remove chair-only types from a set of position types
pub fn exclude_chair_roles<'a>(types: Vec<&'a str>) -> Vec<&'a str> {
    types
        .into_iter()
        .filter(|t| !is_chair_role(t))
        .collect()
}

pub fn is_chair_role(position_type: &str) -> bool {
    CHAIR_ROLES
        .iter()
        .any(|role| role.eq_ignore_ascii_case(position_type))
}

/// Sports/culture applicants may apply or withdraw only during SubComm ranking
pub fn is_application_window_open(phase: Phase) -> bool {
    matches!(phase, Phase::SubcommConcurrentRanking)
}

/// Leads/vices may add, remove or cut sports/culture members once applicant
/// ranking has closed for the SubComm round
pub fn is_sports_culture_management_window_open(phase: Phase) -> bool {
    matches!(
        phase,
        Phase::SubcommResultsProcessing | Phase::FullResultsAvailable
    )
}
