//! Application State
//!
//! Shared state handed to every HTTP handler, containing all services.

use std::sync::Arc;

use cca_allocation_core::FlagStore;

use crate::models::settings::AppConfig;
use crate::services::{MembershipService, PhaseService, RankingService, UserService};
use crate::storage::Database;

/// Application state shared by the router
#[derive(Debug, Clone)]
pub struct AppState {
    /// SQLite database with connection pool
    database: Database,
    /// Current-phase resolution
    phase: Arc<PhaseService>,
    /// Loaded configuration (file + environment)
    config: Arc<AppConfig>,
    ranking: RankingService,
    membership: MembershipService,
    users: UserService,
}

impl AppState {
    /// Build the state with flags read from the same database
    pub fn new(database: Database, config: AppConfig) -> Self {
        let store: Arc<dyn FlagStore> = Arc::new(database.clone());
        Self::with_flag_store(database, store, config)
    }

    /// Build the state with a separate flag store
    pub fn with_flag_store(database: Database, store: Arc<dyn FlagStore>, config: AppConfig) -> Self {
        let phase = PhaseService::from_config(store, &config);
        Self {
            ranking: RankingService::new(database.clone()),
            membership: MembershipService::new(database.clone()),
            users: UserService::new(database.clone()),
            database,
            phase: Arc::new(phase),
            config: Arc::new(config),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn phase(&self) -> &PhaseService {
        &self.phase
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn ranking(&self) -> &RankingService {
        &self.ranking
    }

    pub fn membership(&self) -> &MembershipService {
        &self.membership
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    /// Check if the database is healthy
    pub fn is_database_healthy(&self) -> bool {
        self.database.is_healthy()
    }
}
