//! User Service
//!
//! Directory search for chairs and the requesting user's own CCAs.

use cca_allocation_core::CHAIR_ROLES;

use crate::models::user::{UserCca, UserSummary, MIN_SEARCH_QUERY_LEN, SEARCH_RESULT_LIMIT};
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

pub const SEARCH_QUERY_TOO_SHORT_MESSAGE: &str = "Query must be at least 2 characters.";
pub const SEARCH_FORBIDDEN_MESSAGE: &str = "Forbidden: Only CCA leads/vices can search users";

/// Service for user lookups
#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Search users by name or email. Only a lead or vice of some CCA may
    /// search.
    pub fn search(&self, user_id: i64, query: Option<&str>) -> AppResult<Vec<UserSummary>> {
        let query = query.map(str::trim).unwrap_or_default();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Err(AppError::validation(SEARCH_QUERY_TOO_SHORT_MESSAGE));
        }
        if self.db.chair_cca_ids(user_id, &CHAIR_ROLES)?.is_empty() {
            return Err(AppError::forbidden(SEARCH_FORBIDDEN_MESSAGE));
        }

        let users = self.db.search_users(query, SEARCH_RESULT_LIMIT)?;
        tracing::debug!(user_id, results = users.len(), "user search");
        Ok(users)
    }

    /// CCAs the user holds an appointment in
    pub fn ccas(&self, user_id: i64) -> AppResult<Vec<UserCca>> {
        self.db.list_user_ccas(user_id)
    }
}
