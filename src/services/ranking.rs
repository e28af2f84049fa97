//! Ranking Service
//!
//! Applicant preference lists and chair-side applicant orderings. Every
//! operation is scoped to the position types of the current round.

use std::collections::HashSet;

use cca_allocation_core::{PhaseInfo, CHAIR_ROLES};

use crate::models::cca::{
    ApplicantAdded, ApplicantRequest, ChairPositionsResponse, ChairRankRequest, Position,
    RankablePositionsResponse, RankingsSaved, SaveApplicantRankingsRequest,
};
use crate::models::response::PhaseSummary;
use crate::services::phase::gates::{
    applicant_ranking_closed_message, chair_ranking_closed_message, rankable_position_types,
    require_applicant_ranking, require_chair_ranking,
};
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

pub const NOT_A_CHAIR_MESSAGE: &str = "Unauthorized: Not a lead/vice for this CCA";

/// Service for applicant and chair rankings
#[derive(Debug, Clone)]
pub struct RankingService {
    db: Database,
}

impl RankingService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // =========================================================================
    // Applicant side
    // =========================================================================

    /// Positions the user may rank this round.
    ///
    /// Outside a ranking phase this is an empty list carrying the reason,
    /// not an error.
    pub fn rankable_positions(
        &self,
        user_id: i64,
        info: &PhaseInfo,
    ) -> AppResult<RankablePositionsResponse> {
        let phase_info = PhaseSummary::from(info);
        if !info.allow_applicant_ranking {
            return Ok(RankablePositionsResponse {
                positions: Vec::new(),
                phase_info,
                error: Some(applicant_ranking_closed_message(info)),
            });
        }

        let types = rankable_position_types(info.round);
        let positions = self.db.list_rankable_positions(user_id, &types)?;
        Ok(RankablePositionsResponse {
            positions,
            phase_info,
            error: None,
        })
    }

    /// Replace the user's ranked preferences
    pub fn save_applicant_rankings(
        &self,
        user_id: i64,
        info: &PhaseInfo,
        request: &SaveApplicantRankingsRequest,
    ) -> AppResult<RankingsSaved> {
        validate_rankings(
            request.rankings.iter().map(|r| (r.position_id, r.ranking)),
            "position_id",
        )?;
        require_applicant_ranking(info)?;

        for entry in &request.rankings {
            let position = self.require_position(entry.position_id)?;
            require_round_position(&position, info)?;
        }

        self.db.replace_applicant_rankings(user_id, &request.rankings)?;
        tracing::info!(
            user_id,
            count = request.rankings.len(),
            round = %info.round,
            "saved applicant rankings"
        );
        Ok(RankingsSaved {
            updated_count: request.rankings.len(),
        })
    }

    // =========================================================================
    // Chair side
    // =========================================================================

    /// Positions in the chair's CCAs that are ranked this round
    pub fn chair_positions(&self, user_id: i64, info: &PhaseInfo) -> AppResult<ChairPositionsResponse> {
        let phase_info = PhaseSummary::from(info);
        if !info.allow_chair_ranking {
            return Ok(ChairPositionsResponse {
                positions: Vec::new(),
                phase_info,
                error: Some(chair_ranking_closed_message(info)),
            });
        }

        let cca_ids = self.db.chair_cca_ids(user_id, &CHAIR_ROLES)?;
        let types = rankable_position_types(info.round);
        let positions = self.db.list_chair_positions(&cca_ids, &types)?;
        Ok(ChairPositionsResponse {
            positions,
            phase_info,
            error: None,
        })
    }

    /// Replace the applicant ordering of a position
    pub fn rank_applicants(
        &self,
        user_id: i64,
        position_id: i64,
        info: &PhaseInfo,
        request: &ChairRankRequest,
    ) -> AppResult<RankingsSaved> {
        validate_rankings(
            request.rankings.iter().map(|r| (r.user_id, r.ranking)),
            "user_id",
        )?;
        require_chair_ranking(info)?;
        let position = self.require_position(position_id)?;
        require_round_position(&position, info)?;
        self.require_chair(user_id, position.cca_id)?;
        for entry in &request.rankings {
            if !self.db.user_exists(entry.user_id)? {
                return Err(AppError::not_found(format!("User {} not found", entry.user_id)));
            }
        }

        self.db.replace_position_rankings(position.id, &request.rankings)?;
        tracing::info!(
            chair_id = user_id,
            position_id,
            count = request.rankings.len(),
            "saved chair rankings"
        );
        Ok(RankingsSaved {
            updated_count: request.rankings.len(),
        })
    }

    /// Append an applicant after the current last rank
    pub fn add_applicant(
        &self,
        user_id: i64,
        position_id: i64,
        info: &PhaseInfo,
        request: &ApplicantRequest,
    ) -> AppResult<ApplicantAdded> {
        require_positive_id(request.user_id, "user_id")?;
        require_chair_ranking(info)?;
        let position = self.require_position(position_id)?;
        require_round_position(&position, info)?;
        self.require_chair(user_id, position.cca_id)?;
        if !self.db.user_exists(request.user_id)? {
            return Err(AppError::not_found("User not found"));
        }

        match self.db.append_ranked_applicant(position.id, request.user_id)? {
            Some(ranking) => {
                tracing::info!(chair_id = user_id, position_id, applicant = request.user_id, ranking, "added applicant");
                Ok(ApplicantAdded { ranking })
            }
            None => Err(AppError::validation(
                "Applicant already exists for this position",
            )),
        }
    }

    /// Remove an applicant; the remaining rankings are re-packed to 1..n
    pub fn remove_applicant(
        &self,
        user_id: i64,
        position_id: i64,
        info: &PhaseInfo,
        request: &ApplicantRequest,
    ) -> AppResult<()> {
        require_positive_id(request.user_id, "user_id")?;
        require_chair_ranking(info)?;
        let position = self.require_position(position_id)?;
        require_round_position(&position, info)?;
        self.require_chair(user_id, position.cca_id)?;

        if !self.db.remove_ranked_applicant(position.id, request.user_id)? {
            return Err(AppError::not_found("Applicant is not ranked for this position"));
        }
        tracing::info!(chair_id = user_id, position_id, applicant = request.user_id, "removed applicant");
        Ok(())
    }

    fn require_position(&self, position_id: i64) -> AppResult<Position> {
        self.db
            .get_position(position_id)?
            .ok_or_else(|| AppError::not_found("Position not found"))
    }

    fn require_chair(&self, user_id: i64, cca_id: i64) -> AppResult<()> {
        if self.db.is_cca_chair(user_id, cca_id, &CHAIR_ROLES)? {
            Ok(())
        } else {
            Err(AppError::forbidden(NOT_A_CHAIR_MESSAGE))
        }
    }
}

/// Only the position types ranked in the current round may be touched;
/// lead and vice seats never are.
fn require_round_position(position: &Position, info: &PhaseInfo) -> AppResult<()> {
    if rankable_position_types(info.round).contains(&position.position_type.as_str()) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Position {} cannot be ranked in the {} round",
            position.id, info.round
        )))
    }
}

pub(crate) fn require_positive_id(id: i64, field: &str) -> AppResult<()> {
    if id > 0 {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid {}", field)))
    }
}

/// Rankings must be positive and unique, and each key may appear once
fn validate_rankings(entries: impl Iterator<Item = (i64, i64)>, key: &str) -> AppResult<()> {
    let mut keys = HashSet::new();
    let mut ranks = HashSet::new();
    for (id, ranking) in entries {
        require_positive_id(id, key)?;
        if ranking < 1 {
            return Err(AppError::validation(format!("Invalid ranking: {}", ranking)));
        }
        if !keys.insert(id) {
            return Err(AppError::validation(format!("Duplicate {}: {}", key, id)));
        }
        if !ranks.insert(ranking) {
            return Err(AppError::validation(format!("Duplicate ranking: {}", ranking)));
        }
    }
    Ok(())
}
