//! CCA Allocation Core
//!
//! The allocation phase controller and the round-scoped eligibility rules of
//! the hall CCA allocation service. This crate has no dependency on storage
//! or HTTP code.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `flag` - Time-bounded feature flags and the `FlagStore` trait
//! - `phase` - `Phase`, `Round` and the static per-phase permission table
//! - `resolver` - Flags + instant -> `PhaseInfo`
//! - `eligibility` - Position types per round and the sports/culture windows

pub mod eligibility;
pub mod error;
pub mod flag;
pub mod phase;
pub mod resolver;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Flags ──────────────────────────────────────────────────────────────
pub use flag::{active_flags_at, FeatureFlag, FlagStore};

// ── Phases ─────────────────────────────────────────────────────────────
pub use phase::{Phase, PhaseProfile, Round, PHASE_PRIORITY};

// ── Resolution ─────────────────────────────────────────────────────────
pub use resolver::{
    format_phase_date, format_server_time, resolve, select_phase, PhaseInfo, ResolveOptions,
    PHASE_UNAVAILABLE_MESSAGE,
};

// ── Eligibility ────────────────────────────────────────────────────────
pub use eligibility::{
    eligible_position_types, exclude_chair_roles, is_application_window_open, is_chair_role,
    is_sports_culture_management_window_open, CHAIR_ROLES,
};
