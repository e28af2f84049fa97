//! Settings Models
//!
//! Service configuration stored in config.json.

use std::net::SocketAddr;
use std::path::PathBuf;

use cca_allocation_core::{CoreError, Phase};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Build mode of the running service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Production,
    Development,
    Test,
}

impl RunMode {
    /// Phase overrides are only honored outside production
    pub fn allows_phase_override(&self) -> bool {
        !matches!(self, RunMode::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Production => "production",
            RunMode::Development => "development",
            RunMode::Test => "test",
        }
    }
}

impl std::str::FromStr for RunMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(RunMode::Production),
            "development" | "dev" => Ok(RunMode::Development),
            "test" | "testing" => Ok(RunMode::Test),
            other => Err(CoreError::config(format!("Invalid run mode: {}", other))),
        }
    }
}

/// Service configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// SQLite database file; defaults to ~/.cca-allocation/data.db
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub run_mode: RunMode,
    /// Forces a phase for manual testing. Rejected in production.
    #[serde(default)]
    pub phase_override: Option<Phase>,
    /// Offset used to render upcoming phase dates (minutes east of UTC)
    #[serde(default = "default_display_offset")]
    pub display_utc_offset_minutes: i32,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_display_offset() -> i32 {
    480 // Singapore
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_path: None,
            run_mode: RunMode::default(),
            phase_override: None,
            display_utc_offset_minutes: default_display_offset(),
        }
    }
}

/// Partial overrides, typically taken from the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub database_path: Option<PathBuf>,
    pub run_mode: Option<RunMode>,
}

impl ConfigOverrides {
    /// Read `CCA_BIND_ADDR`, `CCA_DATABASE_PATH` and `CCA_RUN_MODE`
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let run_mode = match lookup("CCA_RUN_MODE") {
            Some(raw) => Some(raw.parse::<RunMode>()?),
            None => None,
        };
        Ok(Self {
            bind_addr: lookup("CCA_BIND_ADDR"),
            database_path: lookup("CCA_DATABASE_PATH").map(PathBuf::from),
            run_mode,
        })
    }
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(addr) = overrides.bind_addr {
            self.bind_addr = addr;
        }
        if let Some(path) = overrides.database_path {
            self.database_path = Some(path);
        }
        if let Some(mode) = overrides.run_mode {
            self.run_mode = mode;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(format!("Invalid bind_addr: {}", self.bind_addr));
        }

        if self.display_offset().is_none() {
            return Err(format!(
                "display_utc_offset_minutes out of range: {}",
                self.display_utc_offset_minutes
            ));
        }

        if let Some(phase) = self.phase_override {
            if !self.run_mode.allows_phase_override() {
                return Err(format!(
                    "phase_override ({}) is not allowed in {} mode",
                    phase,
                    self.run_mode.as_str()
                ));
            }
        }

        Ok(())
    }

    /// Display offset, if within chrono's accepted range
    pub fn display_offset(&self) -> Option<FixedOffset> {
        self.display_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }

    /// Override that the phase service should honor, if any
    pub fn effective_phase_override(&self) -> Option<Phase> {
        self.phase_override
            .filter(|_| self.run_mode.allows_phase_override())
    }

    pub fn is_testing_mode(&self) -> bool {
        self.run_mode != RunMode::Production
    }
}
