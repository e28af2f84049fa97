//! SQLite Database
//!
//! Embedded database for persistent storage using rusqlite with r2d2 connection pooling.

use std::path::Path;

use cca_allocation_core::{CoreError, CoreResult, FeatureFlag, FlagStore};
use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

use crate::models::cca::{
    AllocationEventType, ApplicantRankingEntry, Cca, ChairPosition, ChairRankingEntry, Member,
    Position, RankablePosition, RankedApplicant, UserAppointment,
};
use crate::models::user::{UserCca, UserSummary};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{database_path, ensure_parent_dir};

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database service for managing SQLite operations
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create an in-memory database for testing.
    ///
    /// Uses an in-memory SQLite database with the same schema as the
    /// production database. The pool holds a single connection so every
    /// caller sees the same data.
    pub fn new_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory().with_init(enable_foreign_keys);
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Open the database at the default location (~/.cca-allocation/data.db)
    pub fn new() -> AppResult<Self> {
        Self::open(&database_path()?)
    }

    /// Open (or create) a database file with connection pooling
    pub fn open(db_path: &Path) -> AppResult<Self> {
        ensure_parent_dir(db_path)?;

        let manager = SqliteConnectionManager::file(db_path).with_init(enable_foreign_keys);
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;

        Ok(db)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.get_connection()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS feature_flags (
                name TEXT PRIMARY KEY,
                expires_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                name TEXT
            );

            CREATE TABLE IF NOT EXISTS ccas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                cca_type TEXT NOT NULL,
                description TEXT
            );

            CREATE TABLE IF NOT EXISTS cca_positions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cca_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                position_type TEXT NOT NULL,
                capacity INTEGER,
                description TEXT,
                FOREIGN KEY (cca_id) REFERENCES ccas(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_cca_positions_cca ON cca_positions(cca_id);
            CREATE INDEX IF NOT EXISTS idx_cca_positions_type ON cca_positions(position_type);

            CREATE TABLE IF NOT EXISTS cca_appointments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                position_id INTEGER NOT NULL,
                points INTEGER NOT NULL DEFAULT 0,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (user_id, position_id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (position_id) REFERENCES cca_positions(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS user_cca_applications (
                user_id INTEGER NOT NULL,
                position_id INTEGER NOT NULL,
                ranking INTEGER NOT NULL,
                application_status TEXT NOT NULL DEFAULT 'pending',
                PRIMARY KEY (user_id, position_id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (position_id) REFERENCES cca_positions(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS cca_user_ranking (
                user_id INTEGER NOT NULL,
                position_id INTEGER NOT NULL,
                ranking INTEGER NOT NULL,
                PRIMARY KEY (user_id, position_id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (position_id) REFERENCES cca_positions(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS cca_allocation_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                position_id INTEGER NOT NULL,
                reason TEXT,
                event_type TEXT NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_allocation_events_user_position
                ON cca_allocation_events(user_id, position_id);",
        )?;

        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Check if the database is reachable
    pub fn is_healthy(&self) -> bool {
        match self.get_connection() {
            Ok(conn) => conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)).is_ok(),
            Err(_) => false,
        }
    }

    // =========================================================================
    // Feature flags
    // =========================================================================

    /// Every flag in the store, expired or not
    pub fn list_feature_flags(&self) -> AppResult<Vec<FeatureFlag>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare("SELECT name, expires_at FROM feature_flags")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(name, expires_at)| {
                let expires_at = DateTime::parse_from_rfc3339(&expires_at)
                    .map_err(|e| {
                        AppError::database(format!("Invalid expires_at for flag {}: {}", name, e))
                    })?
                    .with_timezone(&Utc);
                Ok(FeatureFlag { name, expires_at })
            })
            .collect()
    }

    /// Insert or replace a flag
    pub fn upsert_feature_flag(&self, flag: &FeatureFlag) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO feature_flags (name, expires_at) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET expires_at = excluded.expires_at",
            params![
                flag.name,
                flag.expires_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ],
        )?;
        Ok(())
    }

    pub fn delete_feature_flag(&self, name: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM feature_flags WHERE name = ?1", params![name])?;
        Ok(())
    }

    // =========================================================================
    // Users, CCAs and positions
    // =========================================================================

    pub fn insert_user(&self, email: &str, name: Option<&str>) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO users (email, name) VALUES (?1, ?2)",
            params![email, name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let found: Option<i64> = conn
            .query_row("SELECT id FROM users WHERE id = ?1", params![user_id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// Users whose name or email contains `query`, case-insensitively
    pub fn search_users(&self, query: &str, limit: usize) -> AppResult<Vec<UserSummary>> {
        let conn = self.get_connection()?;
        let pattern = format!("%{}%", escape_like(query));
        let mut stmt = conn.prepare(
            "SELECT id, name, email FROM users
             WHERE name LIKE ?1 ESCAPE '\\' OR email LIKE ?1 ESCAPE '\\'
             ORDER BY name IS NULL, name, id
             LIMIT ?2",
        )?;
        let users = stmt
            .query_map(params![pattern, limit as i64], |row| {
                Ok(UserSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn insert_cca(&self, name: &str, cca_type: &str) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO ccas (name, cca_type) VALUES (?1, ?2)",
            params![name, cca_type],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_cca_by_name(&self, name: &str) -> AppResult<Option<Cca>> {
        let conn = self.get_connection()?;
        let cca = conn
            .query_row(
                "SELECT id, name, cca_type FROM ccas WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Cca {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        cca_type: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(cca)
    }

    pub fn get_cca(&self, cca_id: i64) -> AppResult<Option<Cca>> {
        let conn = self.get_connection()?;
        let cca = conn
            .query_row(
                "SELECT id, name, cca_type FROM ccas WHERE id = ?1",
                params![cca_id],
                |row| {
                    Ok(Cca {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        cca_type: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(cca)
    }

    pub fn insert_position(
        &self,
        cca_id: i64,
        name: &str,
        position_type: &str,
        capacity: Option<i64>,
    ) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO cca_positions (cca_id, name, position_type, capacity) VALUES (?1, ?2, ?3, ?4)",
            params![cca_id, name, position_type, capacity],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_position(&self, position_id: i64) -> AppResult<Option<Position>> {
        let conn = self.get_connection()?;
        let position = conn
            .query_row(
                "SELECT id, cca_id, name, position_type, capacity, description
                 FROM cca_positions WHERE id = ?1",
                params![position_id],
                Self::row_to_position,
            )
            .optional()?;
        Ok(position)
    }

    /// First position of the given type in a CCA
    pub fn find_position_by_type(&self, cca_id: i64, position_type: &str) -> AppResult<Option<Position>> {
        let conn = self.get_connection()?;
        let position = conn
            .query_row(
                "SELECT id, cca_id, name, position_type, capacity, description
                 FROM cca_positions WHERE cca_id = ?1 AND position_type = ?2
                 ORDER BY id LIMIT 1",
                params![cca_id, position_type],
                Self::row_to_position,
            )
            .optional()?;
        Ok(position)
    }

    fn row_to_position(row: &rusqlite::Row) -> rusqlite::Result<Position> {
        Ok(Position {
            id: row.get(0)?,
            cca_id: row.get(1)?,
            name: row.get(2)?,
            position_type: row.get(3)?,
            capacity: row.get(4)?,
            description: row.get(5)?,
        })
    }

    // =========================================================================
    // Chair authorization
    // =========================================================================

    /// Whether the user holds a lead/vice appointment in the CCA
    pub fn is_cca_chair(&self, user_id: i64, cca_id: i64, chair_roles: &[&str]) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let mut values = vec![Value::Integer(user_id), Value::Integer(cca_id)];
        values.extend(chair_roles.iter().map(|r| Value::Text(r.to_lowercase())));
        let sql = format!(
            "SELECT COUNT(*) FROM cca_appointments a
             JOIN cca_positions p ON p.id = a.position_id
             WHERE a.user_id = ?1 AND p.cca_id = ?2 AND LOWER(p.position_type) IN ({})",
            placeholders(3, chair_roles.len())
        );
        let count: i64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(count > 0)
    }

    /// CCAs in which the user holds a lead/vice appointment
    pub fn chair_cca_ids(&self, user_id: i64, chair_roles: &[&str]) -> AppResult<Vec<i64>> {
        let conn = self.get_connection()?;
        let mut values = vec![Value::Integer(user_id)];
        values.extend(chair_roles.iter().map(|r| Value::Text(r.to_lowercase())));
        let sql = format!(
            "SELECT DISTINCT p.cca_id FROM cca_appointments a
             JOIN cca_positions p ON p.id = a.position_id
             WHERE a.user_id = ?1 AND LOWER(p.position_type) IN ({})
             ORDER BY p.cca_id",
            placeholders(2, chair_roles.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params_from_iter(values), |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    // =========================================================================
    // Appointments and allocation events
    // =========================================================================

    pub fn appointment_exists(&self, user_id: i64, position_id: i64) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT id FROM cca_appointments WHERE user_id = ?1 AND position_id = ?2",
                params![user_id, position_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert an appointment and its allocation event in one transaction
    pub fn insert_appointment_with_event(
        &self,
        user_id: i64,
        position_id: i64,
        event_type: AllocationEventType,
        reason: &str,
    ) -> AppResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO cca_appointments (user_id, position_id, points) VALUES (?1, ?2, 0)",
            params![user_id, position_id],
        )?;
        tx.execute(
            "INSERT INTO cca_allocation_events (user_id, position_id, reason, event_type)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, position_id, reason, event_type.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete an appointment and log an allocation event; returns rows removed
    pub fn delete_appointment_with_event(
        &self,
        user_id: i64,
        position_id: i64,
        event_type: AllocationEventType,
        reason: &str,
    ) -> AppResult<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM cca_appointments WHERE user_id = ?1 AND position_id = ?2",
            params![user_id, position_id],
        )?;
        if removed > 0 {
            tx.execute(
                "INSERT INTO cca_allocation_events (user_id, position_id, reason, event_type)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user_id, position_id, reason, event_type.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Delete an appointment together with every event logged for it
    pub fn delete_appointment_and_events(&self, user_id: i64, position_id: i64) -> AppResult<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM cca_appointments WHERE user_id = ?1 AND position_id = ?2",
            params![user_id, position_id],
        )?;
        tx.execute(
            "DELETE FROM cca_allocation_events WHERE user_id = ?1 AND position_id = ?2",
            params![user_id, position_id],
        )?;
        tx.commit()?;
        Ok(removed)
    }

    /// Event types logged for a user and position, oldest first
    pub fn list_allocation_events(&self, user_id: i64, position_id: i64) -> AppResult<Vec<String>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT event_type FROM cca_allocation_events
             WHERE user_id = ?1 AND position_id = ?2 ORDER BY id",
        )?;
        let events = stmt
            .query_map(params![user_id, position_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(events)
    }

    /// All appointments of a user across every CCA
    pub fn list_user_appointments(&self, user_id: i64) -> AppResult<Vec<UserAppointment>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, p.position_type, c.id, c.name, c.cca_type
             FROM cca_appointments a
             JOIN cca_positions p ON p.id = a.position_id
             JOIN ccas c ON c.id = p.cca_id
             WHERE a.user_id = ?1
             ORDER BY a.id",
        )?;
        let appointments = stmt
            .query_map(params![user_id], |row| {
                Ok(UserAppointment {
                    position_id: row.get(0)?,
                    position_name: row.get(1)?,
                    position_type: row.get(2)?,
                    cca_id: row.get(3)?,
                    cca_name: row.get(4)?,
                    cca_type: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(appointments)
    }

    /// Appointments of a user with their CCA details, in appointment order
    pub fn list_user_ccas(&self, user_id: i64) -> AppResult<Vec<UserCca>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT c.name, p.name, p.position_type, c.cca_type,
                    COALESCE(c.description, ''), a.points
             FROM cca_appointments a
             JOIN cca_positions p ON p.id = a.position_id
             JOIN ccas c ON c.id = p.cca_id
             WHERE a.user_id = ?1
             ORDER BY a.id",
        )?;
        let ccas = stmt
            .query_map(params![user_id], |row| {
                Ok(UserCca {
                    name: row.get(0)?,
                    role: row.get(1)?,
                    position_type: row.get(2)?,
                    cca_type: row.get(3)?,
                    description: row.get(4)?,
                    points: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ccas)
    }

    /// Everyone appointed to any position of the CCA
    pub fn list_members(&self, cca_id: i64) -> AppResult<Vec<Member>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT u.id, u.name, u.email, p.id, p.name, p.position_type
             FROM cca_appointments a
             JOIN cca_positions p ON p.id = a.position_id
             JOIN users u ON u.id = a.user_id
             WHERE p.cca_id = ?1
             ORDER BY p.id, u.name",
        )?;
        let members = stmt
            .query_map(params![cca_id], |row| {
                Ok(Member {
                    user_id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    position_id: row.get(3)?,
                    position_name: row.get(4)?,
                    position_type: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    /// Sports/culture positions of the given types, with their CCA
    pub fn list_sports_culture_positions(&self, position_types: &[&str]) -> AppResult<Vec<(Position, Cca)>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT p.id, p.cca_id, p.name, p.position_type, p.capacity, p.description,
                    c.id, c.name, c.cca_type
             FROM cca_positions p
             JOIN ccas c ON c.id = p.cca_id
             WHERE c.cca_type IN ('sports', 'culture') AND p.position_type IN ({})
             ORDER BY c.name, p.name",
            placeholders(1, position_types.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(position_types.iter()), |row| {
                Ok((
                    Self::row_to_position(row)?,
                    Cca {
                        id: row.get(6)?,
                        name: row.get(7)?,
                        cca_type: row.get(8)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // =========================================================================
    // Applicant rankings
    // =========================================================================

    /// Positions of the given types with free capacity, annotated with the
    /// user's current ranking
    pub fn list_rankable_positions(
        &self,
        user_id: i64,
        position_types: &[&str],
    ) -> AppResult<Vec<RankablePosition>> {
        if position_types.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.get_connection()?;
        let mut values = vec![Value::Integer(user_id)];
        values.extend(position_types.iter().map(|t| Value::Text(t.to_string())));
        let sql = format!(
            "SELECT p.id, p.name, c.name, p.position_type,
                    COALESCE(p.capacity, 0),
                    COALESCE(p.capacity, 0)
                        - (SELECT COUNT(*) FROM cca_appointments a WHERE a.position_id = p.id),
                    (SELECT COUNT(*) FROM user_cca_applications u WHERE u.position_id = p.id),
                    COALESCE(p.description, c.description),
                    (SELECT u.ranking FROM user_cca_applications u
                     WHERE u.position_id = p.id AND u.user_id = ?1)
             FROM cca_positions p
             JOIN ccas c ON c.id = p.cca_id
             WHERE p.position_type IN ({})
             ORDER BY p.name ASC, p.id ASC",
            placeholders(2, position_types.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let positions = stmt
            .query_map(params_from_iter(values), |row| {
                let user_ranking: Option<i64> = row.get(8)?;
                Ok(RankablePosition {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    cca_name: row.get(2)?,
                    position_type: row.get(3)?,
                    capacity: row.get(4)?,
                    available_capacity: row.get(5)?,
                    applied_count: row.get(6)?,
                    description: row.get(7)?,
                    is_selected: user_ranking.is_some(),
                    user_ranking,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(positions
            .into_iter()
            .filter(|p| p.available_capacity > 0)
            .collect())
    }

    /// Replace the user's ranked preferences
    pub fn replace_applicant_rankings(
        &self,
        user_id: i64,
        rankings: &[ApplicantRankingEntry],
    ) -> AppResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM user_cca_applications WHERE user_id = ?1",
            params![user_id],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO user_cca_applications (user_id, position_id, ranking, application_status)
                 VALUES (?1, ?2, ?3, 'pending')",
            )?;
            for entry in rankings {
                stmt.execute(params![user_id, entry.position_id, entry.ranking])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// (position_id, ranking) pairs of a user, best first
    pub fn list_applicant_rankings(&self, user_id: i64) -> AppResult<Vec<(i64, i64)>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT position_id, ranking FROM user_cca_applications
             WHERE user_id = ?1 ORDER BY ranking",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // =========================================================================
    // Chair rankings
    // =========================================================================

    /// Positions of the given types in the given CCAs that still have free
    /// seats, with ranked applicants
    pub fn list_chair_positions(
        &self,
        cca_ids: &[i64],
        position_types: &[&str],
    ) -> AppResult<Vec<ChairPosition>> {
        if cca_ids.is_empty() || position_types.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.get_connection()?;
        let mut values: Vec<Value> = cca_ids.iter().map(|id| Value::Integer(*id)).collect();
        values.extend(position_types.iter().map(|t| Value::Text(t.to_string())));
        let sql = format!(
            "SELECT id, name, cca_id, cca_name, position_type, total, available FROM (
                 SELECT p.id, p.name, c.id AS cca_id, c.name AS cca_name, p.position_type,
                        COALESCE(p.capacity, 0) AS total,
                        COALESCE(p.capacity, 0)
                            - (SELECT COUNT(*) FROM cca_appointments a WHERE a.position_id = p.id)
                            AS available
                 FROM cca_positions p
                 JOIN ccas c ON c.id = p.cca_id
                 WHERE p.cca_id IN ({}) AND p.position_type IN ({})
             )
             WHERE available > 0
             ORDER BY cca_name, name",
            placeholders(1, cca_ids.len()),
            placeholders(1 + cca_ids.len(), position_types.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut positions = stmt
            .query_map(params_from_iter(values), |row| {
                Ok(ChairPosition {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    cca_id: row.get(2)?,
                    cca_name: row.get(3)?,
                    position_type: row.get(4)?,
                    total_capacity: row.get(5)?,
                    available_capacity: row.get(6)?,
                    applicants: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);

        for position in &mut positions {
            position.applicants = self.list_ranked_applicants(position.id)?;
        }
        Ok(positions)
    }

    pub fn list_ranked_applicants(&self, position_id: i64) -> AppResult<Vec<RankedApplicant>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT r.user_id, u.name, r.ranking
             FROM cca_user_ranking r
             LEFT JOIN users u ON u.id = r.user_id
             WHERE r.position_id = ?1
             ORDER BY r.ranking, r.user_id",
        )?;
        let applicants = stmt
            .query_map(params![position_id], |row| {
                Ok(RankedApplicant {
                    user_id: row.get(0)?,
                    name: row.get(1)?,
                    ranking: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(applicants)
    }

    /// Replace the applicant ordering of a position
    pub fn replace_position_rankings(
        &self,
        position_id: i64,
        rankings: &[ChairRankingEntry],
    ) -> AppResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM cca_user_ranking WHERE position_id = ?1",
            params![position_id],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO cca_user_ranking (user_id, position_id, ranking) VALUES (?1, ?2, ?3)",
            )?;
            for entry in rankings {
                stmt.execute(params![entry.user_id, position_id, entry.ranking])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Append an applicant after the current last rank.
    ///
    /// Returns the assigned ranking, or `None` when the applicant is already
    /// ranked for this position.
    pub fn append_ranked_applicant(&self, position_id: i64, user_id: i64) -> AppResult<Option<i64>> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let existing: Option<i64> = tx
            .query_row(
                "SELECT ranking FROM cca_user_ranking WHERE position_id = ?1 AND user_id = ?2",
                params![position_id, user_id],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Ok(None);
        }
        let max: Option<i64> = tx.query_row(
            "SELECT MAX(ranking) FROM cca_user_ranking WHERE position_id = ?1",
            params![position_id],
            |row| row.get(0),
        )?;
        let next = max.unwrap_or(0) + 1;
        tx.execute(
            "INSERT INTO cca_user_ranking (user_id, position_id, ranking) VALUES (?1, ?2, ?3)",
            params![user_id, position_id, next],
        )?;
        tx.commit()?;
        Ok(Some(next))
    }

    /// Remove an applicant and re-pack the remaining rankings as 1..n.
    ///
    /// Returns false when the applicant was not ranked for this position.
    pub fn remove_ranked_applicant(&self, position_id: i64, user_id: i64) -> AppResult<bool> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM cca_user_ranking WHERE position_id = ?1 AND user_id = ?2",
            params![position_id, user_id],
        )?;
        if removed == 0 {
            return Ok(false);
        }
        let remaining: Vec<i64> = {
            let mut stmt = tx.prepare(
                "SELECT user_id FROM cca_user_ranking WHERE position_id = ?1 ORDER BY ranking, user_id",
            )?;
            let ids = stmt
                .query_map(params![position_id], |row| row.get(0))?
                .collect::<Result<Vec<i64>, _>>()?;
            ids
        };
        for (index, remaining_user) in remaining.iter().enumerate() {
            tx.execute(
                "UPDATE cca_user_ranking SET ranking = ?1 WHERE position_id = ?2 AND user_id = ?3",
                params![index as i64 + 1, position_id, remaining_user],
            )?;
        }
        tx.commit()?;
        Ok(true)
    }
}

impl FlagStore for Database {
    fn fetch_flags(&self) -> CoreResult<Vec<FeatureFlag>> {
        self.list_feature_flags()
            .map_err(|e| CoreError::flag_store(e.to_string()))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool_size", &self.pool.state().connections)
            .finish()
    }
}

fn enable_foreign_keys(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

/// `?start, ?start+1, ...` for `count` parameters
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
