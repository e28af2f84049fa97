//! User Models
//!
//! Directory search results and a user's own CCA memberships.

use serde::{Deserialize, Serialize};

/// Minimum number of characters a directory search needs
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Maximum number of directory search results
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// A user as shown in directory search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
}

/// One appointment of the requesting user, joined with its CCA
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCca {
    pub name: String,
    pub role: String,
    pub position_type: String,
    pub cca_type: String,
    pub description: String,
    pub points: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub query: Option<String>,
}
