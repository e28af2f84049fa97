//! Phase Resolver
//!
//! Maps the set of active feature flags at a given instant to exactly one
//! [`PhaseInfo`]. Resolution is a pure function of `(flags, now, options)`:
//! the same inputs always produce the same record.

use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::flag::{active_flags_at, FeatureFlag};
use crate::phase::{Phase, Round, PHASE_PRIORITY};

/// Message shown when the flag store could not be read
pub const PHASE_UNAVAILABLE_MESSAGE: &str = "Error determining current phase.";

/// Resolved state of the allocation process at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseInfo {
    pub phase: Phase,
    pub round: Round,
    pub allow_chair_ranking: bool,
    pub allow_applicant_ranking: bool,
    pub show_results: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_maincomm_results: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_subcomm_results: Option<bool>,
    pub user_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_phase_date: Option<String>,
    pub server_time: String,
    pub active_flags: Vec<String>,
}

impl PhaseInfo {
    /// Build the record for `phase` from its static profile
    pub fn for_phase(
        phase: Phase,
        now: DateTime<Utc>,
        active_flags: Vec<String>,
        next_phase_date: Option<String>,
    ) -> Self {
        let profile = phase.profile();
        Self {
            phase,
            round: profile.round,
            allow_chair_ranking: profile.allow_chair_ranking,
            allow_applicant_ranking: profile.allow_applicant_ranking,
            show_results: profile.show_results,
            show_maincomm_results: profile.show_maincomm_results,
            show_subcomm_results: profile.show_subcomm_results,
            user_message: profile.user_message.to_string(),
            next_phase_date,
            server_time: format_server_time(now),
            active_flags,
        }
    }

    /// Fail-closed record used when the flags cannot be read
    pub fn unavailable(now: DateTime<Utc>) -> Self {
        let mut info = Self::for_phase(Phase::Inactive, now, Vec::new(), None);
        info.user_message = PHASE_UNAVAILABLE_MESSAGE.to_string();
        info
    }
}

/// Knobs that are fixed for the lifetime of a resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Forces a phase regardless of flags. Only ever set outside production.
    pub phase_override: Option<Phase>,
    /// Offset used when rendering `nextPhaseDate`
    pub display_offset: FixedOffset,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            phase_override: None,
            display_offset: Utc.fix(),
        }
    }
}

impl ResolveOptions {
    pub fn with_override(mut self, phase: Phase) -> Self {
        self.phase_override = Some(phase);
        self
    }

    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }
}

/// Resolve the phase at `now` from the full flag list.
pub fn resolve(now: DateTime<Utc>, flags: &[FeatureFlag], options: &ResolveOptions) -> PhaseInfo {
    let active = active_flags_at(flags, now);
    let next_phase_date = active
        .first()
        .map(|flag| format_phase_date(flag.expires_at, options.display_offset));

    if let Some(phase) = options.phase_override {
        return PhaseInfo::for_phase(phase, now, vec![phase.as_str().to_string()], next_phase_date);
    }

    let names: Vec<String> = active.iter().map(|f| f.name.clone()).collect();
    let phase = select_phase(&names);
    PhaseInfo::for_phase(phase, now, names, next_phase_date)
}

/// First phase in priority order whose flag is present, else `Inactive`
pub fn select_phase<S: AsRef<str>>(active_flag_names: &[S]) -> Phase {
    PHASE_PRIORITY
        .iter()
        .copied()
        .find(|phase| {
            active_flag_names
                .iter()
                .any(|name| name.as_ref() == phase.as_str())
        })
        .unwrap_or(Phase::Inactive)
}

/// RFC 3339 with millisecond precision and a `Z` suffix
pub fn format_server_time(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Long en-US rendering, e.g. `Friday, October 16, 2026 at 02:30 PM GMT+8`
pub fn format_phase_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = at.with_timezone(&offset);
    format!(
        "{} {}",
        local.format("%A, %B %-d, %Y at %I:%M %p"),
        offset_label(offset)
    )
}

fn offset_label(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let hours = seconds.abs() / 3600;
    let minutes = (seconds.abs() % 3600) / 60;
    if minutes == 0 {
        format!("GMT{}{}", sign, hours)
    } else {
        format!("GMT{}{}:{:02}", sign, hours, minutes)
    }
}
