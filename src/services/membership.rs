//! Membership Service
//!
//! Sports/culture self-service applications and member management by the
//! lead/vice of a sports or culture CCA.

use std::collections::HashMap;

use cca_allocation_core::{
    is_application_window_open, is_sports_culture_management_window_open, PhaseInfo, CHAIR_ROLES,
};

use crate::models::cca::{
    is_sports_or_culture, AllocationEventType, AvailablePosition, AvailablePositionsResponse, Cca,
    CutMemberRequest, GroupedPositions, MemberRequest, MembersResponse, Position, PositionRequest,
    UserAppointment, MEMBER_POSITION_TYPE, SPORTS_CULTURE_POSITION_TYPES,
};
use crate::models::response::PhaseSummary;
use crate::services::phase::gates::{require_application_window, require_management_window};
use crate::services::ranking::require_positive_id;
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

pub const SPORTS_CULTURE_ONLY_MESSAGE: &str = "This endpoint is only for sports and culture CCAs";
pub const NOT_CCA_LEAD_MESSAGE: &str = "Unauthorized: You are not a lead/vice for this CCA";

const APPLIED_REASON: &str = "Applied during open application period";
const ADDED_REASON: &str = "Added by captain/head";
const REMOVED_REASON: &str = "Removed by captain/head";
const CUT_REASON: &str = "Cut by captain/head";

/// Service for sports/culture membership
#[derive(Debug, Clone)]
pub struct MembershipService {
    db: Database,
}

impl MembershipService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // =========================================================================
    // Applicant side
    // =========================================================================

    /// Sports/culture positions open to self-service, grouped by CCA type
    pub fn available_positions(
        &self,
        user_id: i64,
        info: &PhaseInfo,
    ) -> AppResult<AvailablePositionsResponse> {
        let rows = self.db.list_sports_culture_positions(&SPORTS_CULTURE_POSITION_TYPES)?;
        let appointments = self.db.list_user_appointments(user_id)?;

        // cca_id -> role held there, and cca_id -> sports/culture application
        let mut current_roles: HashMap<i64, &str> = HashMap::new();
        let mut applications: HashMap<i64, &UserAppointment> = HashMap::new();
        for appointment in &appointments {
            current_roles.insert(appointment.cca_id, appointment.position_type.as_str());
            if is_sports_or_culture(&appointment.cca_type)
                && SPORTS_CULTURE_POSITION_TYPES.contains(&appointment.position_type.as_str())
            {
                applications.insert(appointment.cca_id, appointment);
            }
        }

        let mut grouped = GroupedPositions::default();
        for (position, cca) in rows {
            let user_current_role = current_roles.get(&cca.id).map(|r| r.to_string());
            let is_applied = appointments.iter().any(|a| a.position_id == position.id);

            let mut conflict_reason = user_current_role
                .as_deref()
                .and_then(|role| role_conflict(role, &cca.name, &position.name));
            if let Some(existing) = applications.get(&cca.id) {
                if existing.position_id != position.id {
                    conflict_reason = Some(format!(
                        "You have already applied as {} for {}",
                        existing.position_name, cca.name
                    ));
                }
            }

            let entry = AvailablePosition {
                id: position.id,
                name: position.name,
                cca_name: cca.name,
                cca_id: cca.id,
                cca_type: cca.cca_type.clone(),
                position_type: position.position_type,
                description: position.description,
                capacity: position.capacity,
                is_applied,
                can_apply: conflict_reason.is_none(),
                user_current_role,
                conflict_reason,
            };
            match cca.cca_type.as_str() {
                "sports" => grouped.sports.push(entry),
                _ => grouped.culture.push(entry),
            }
        }

        Ok(AvailablePositionsResponse {
            positions: grouped,
            applications_open: is_application_window_open(info.phase),
            phase_info: PhaseSummary::from(info),
        })
    }

    /// Apply to a sports/culture position
    pub fn apply(&self, user_id: i64, info: &PhaseInfo, request: &PositionRequest) -> AppResult<()> {
        require_positive_id(request.position_id, "position_id")?;
        require_application_window(info)?;
        let (position, cca) = self.require_application_position(request.position_id)?;

        let conflicting = self
            .db
            .list_user_appointments(user_id)?
            .into_iter()
            .find(|a| {
                a.cca_id == cca.id
                    && a.position_id != position.id
                    && SPORTS_CULTURE_POSITION_TYPES.contains(&a.position_type.as_str())
            });
        if let Some(existing) = conflicting {
            return Err(AppError::validation(format!(
                "You have already applied as {} for {}. Remove that application first.",
                existing.position_name, cca.name
            )));
        }
        if self.db.appointment_exists(user_id, position.id)? {
            return Err(AppError::validation("Already applied to this position"));
        }

        self.db.insert_appointment_with_event(
            user_id,
            position.id,
            AllocationEventType::Applied,
            APPLIED_REASON,
        )?;
        tracing::info!(user_id, position_id = position.id, cca = %cca.name, "sports/culture application");
        Ok(())
    }

    /// Withdraw an application together with its event history
    pub fn withdraw(&self, user_id: i64, info: &PhaseInfo, request: &PositionRequest) -> AppResult<()> {
        require_positive_id(request.position_id, "position_id")?;
        require_application_window(info)?;
        let (position, _) = self.require_application_position(request.position_id)?;

        let removed = self.db.delete_appointment_and_events(user_id, position.id)?;
        if removed == 0 {
            return Err(AppError::not_found("Application not found"));
        }
        tracing::info!(user_id, position_id = request.position_id, "withdrew sports/culture application");
        Ok(())
    }

    // =========================================================================
    // Lead/vice side
    // =========================================================================

    /// Members of a CCA, with whether the requester may manage them right now
    pub fn members(&self, user_id: i64, info: &PhaseInfo, cca_name: &str) -> AppResult<MembersResponse> {
        let cca = self.require_cca(cca_name)?;
        let members = self.db.list_members(cca.id)?;
        let can_manage = is_sports_culture_management_window_open(info.phase)
            && cca.is_sports_or_culture()
            && self.db.is_cca_chair(user_id, cca.id, &CHAIR_ROLES)?;

        Ok(MembersResponse {
            cca,
            members,
            can_manage,
        })
    }

    /// Add a user to the CCA's Member position, creating it if absent
    pub fn add_member(
        &self,
        user_id: i64,
        info: &PhaseInfo,
        cca_name: &str,
        request: &MemberRequest,
    ) -> AppResult<()> {
        require_positive_id(request.user_id, "user_id")?;
        require_management_window(info)?;
        let cca = self.require_managed_cca(user_id, cca_name)?;
        if !self.db.user_exists(request.user_id)? {
            return Err(AppError::not_found("User not found"));
        }

        let position_id = match self.db.find_position_by_type(cca.id, MEMBER_POSITION_TYPE)? {
            Some(position) => position.id,
            None => {
                tracing::info!(cca = %cca.name, "creating member position");
                self.db
                    .insert_position(cca.id, "Member", MEMBER_POSITION_TYPE, None)?
            }
        };
        if self.db.appointment_exists(request.user_id, position_id)? {
            return Err(AppError::validation(
                "User is already appointed to this position",
            ));
        }

        self.db.insert_appointment_with_event(
            request.user_id,
            position_id,
            AllocationEventType::Accepted,
            request.reason.as_deref().unwrap_or(ADDED_REASON),
        )?;
        tracing::info!(lead_id = user_id, member = request.user_id, cca = %cca.name, "added member");
        Ok(())
    }

    /// Remove a user from the CCA's Member position
    pub fn remove_member(
        &self,
        user_id: i64,
        info: &PhaseInfo,
        cca_name: &str,
        request: &MemberRequest,
    ) -> AppResult<()> {
        require_positive_id(request.user_id, "user_id")?;
        require_management_window(info)?;
        let cca = self.require_managed_cca(user_id, cca_name)?;
        let position = self
            .db
            .find_position_by_type(cca.id, MEMBER_POSITION_TYPE)?
            .ok_or_else(|| AppError::not_found("Member position not found"))?;

        let removed = self.db.delete_appointment_with_event(
            request.user_id,
            position.id,
            AllocationEventType::Cut,
            request.reason.as_deref().unwrap_or(REMOVED_REASON),
        )?;
        tracing::info!(lead_id = user_id, member = request.user_id, cca = %cca.name, removed, "removed member");
        Ok(())
    }

    /// Cut a user from any position of the CCA
    pub fn cut_member(
        &self,
        user_id: i64,
        info: &PhaseInfo,
        cca_name: &str,
        request: &CutMemberRequest,
    ) -> AppResult<()> {
        require_positive_id(request.user_id, "user_id")?;
        require_positive_id(request.position_id, "position_id")?;
        require_management_window(info)?;
        let cca = self.require_managed_cca(user_id, cca_name)?;
        let position = self
            .db
            .get_position(request.position_id)?
            .filter(|p| p.cca_id == cca.id)
            .ok_or_else(|| AppError::not_found("Position not found"))?;

        let removed = self.db.delete_appointment_with_event(
            request.user_id,
            position.id,
            AllocationEventType::Cut,
            request.reason.as_deref().unwrap_or(CUT_REASON),
        )?;
        if removed == 0 {
            return Err(AppError::not_found("Member not found"));
        }
        tracing::info!(lead_id = user_id, member = request.user_id, position_id = position.id, "cut member");
        Ok(())
    }

    /// A self-service position of a sports/culture CCA
    fn require_application_position(&self, position_id: i64) -> AppResult<(Position, Cca)> {
        let position = self
            .db
            .get_position(position_id)?
            .ok_or_else(|| AppError::not_found("Position not found"))?;
        let cca = self
            .db
            .get_cca(position.cca_id)?
            .ok_or_else(|| AppError::not_found("Position not found"))?;
        if !cca.is_sports_or_culture()
            || !SPORTS_CULTURE_POSITION_TYPES.contains(&position.position_type.as_str())
        {
            return Err(AppError::validation(
                "Invalid position for sports/culture application",
            ));
        }
        Ok((position, cca))
    }

    fn require_cca(&self, cca_name: &str) -> AppResult<Cca> {
        self.db
            .get_cca_by_name(cca_name)?
            .ok_or_else(|| AppError::not_found("CCA not found"))
    }

    /// The named sports/culture CCA, provided the user is its lead or vice
    fn require_managed_cca(&self, user_id: i64, cca_name: &str) -> AppResult<Cca> {
        let cca = self.require_cca(cca_name)?;
        if !cca.is_sports_or_culture() {
            return Err(AppError::forbidden(SPORTS_CULTURE_ONLY_MESSAGE));
        }
        if !self.db.is_cca_chair(user_id, cca.id, &CHAIR_ROLES)? {
            return Err(AppError::forbidden(NOT_CCA_LEAD_MESSAGE));
        }
        Ok(cca)
    }
}

/// Why an existing role in the CCA blocks applying to `position_name`
fn role_conflict(role: &str, cca_name: &str, position_name: &str) -> Option<String> {
    match role {
        "member" => Some(format!("You are already a member of {}", cca_name)),
        "lead" => Some(format!(
            "You are the lead of {} - cannot apply as {}",
            cca_name,
            position_name.to_lowercase()
        )),
        "vice" => Some(format!(
            "You are the vice lead of {} - cannot apply as {}",
            cca_name,
            position_name.to_lowercase()
        )),
        "team manager" => Some(format!("You are already the team manager of {}", cca_name)),
        _ => None,
    }
}
