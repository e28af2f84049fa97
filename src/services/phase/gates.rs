//! Permission Gates
//!
//! Every phase-dependent endpoint asks one of these before touching the
//! store. A closed gate is a 403 with a fixed message.

use cca_allocation_core::{
    eligible_position_types, exclude_chair_roles, is_application_window_open,
    is_sports_culture_management_window_open, PhaseInfo, Round,
};

use crate::utils::error::{AppError, AppResult};

pub const APPLICATIONS_CLOSED_MESSAGE: &str = "Sports/Culture applications are not currently open";
pub const MANAGEMENT_CLOSED_MESSAGE: &str =
    "Sports/Culture member management is currently not available";

pub fn chair_ranking_closed_message(info: &PhaseInfo) -> String {
    format!("Chair ranking is not active. Current phase: {}", info.phase)
}

pub fn applicant_ranking_closed_message(info: &PhaseInfo) -> String {
    format!("Student ranking is not active. Current phase: {}", info.phase)
}

pub fn require_chair_ranking(info: &PhaseInfo) -> AppResult<()> {
    if info.allow_chair_ranking {
        return Ok(());
    }
    tracing::debug!(phase = %info.phase, "chair ranking gate closed");
    Err(AppError::forbidden(chair_ranking_closed_message(info)))
}

pub fn require_applicant_ranking(info: &PhaseInfo) -> AppResult<()> {
    if info.allow_applicant_ranking {
        return Ok(());
    }
    tracing::debug!(phase = %info.phase, "applicant ranking gate closed");
    Err(AppError::forbidden(applicant_ranking_closed_message(info)))
}

pub fn require_application_window(info: &PhaseInfo) -> AppResult<()> {
    if is_application_window_open(info.phase) {
        return Ok(());
    }
    tracing::debug!(phase = %info.phase, "sports/culture application window closed");
    Err(AppError::forbidden(APPLICATIONS_CLOSED_MESSAGE))
}

pub fn require_management_window(info: &PhaseInfo) -> AppResult<()> {
    if is_sports_culture_management_window_open(info.phase) {
        return Ok(());
    }
    tracing::debug!(phase = %info.phase, "sports/culture management window closed");
    Err(AppError::forbidden(MANAGEMENT_CLOSED_MESSAGE))
}

/// Position types an applicant may rank (and a chair may order) in `round`
pub fn rankable_position_types(round: Round) -> Vec<&'static str> {
    exclude_chair_roles(eligible_position_types(round.as_str()))
}
