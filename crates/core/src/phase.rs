//! Allocation Phases
//!
//! The nine canonical phases of the CCA allocation cycle, the coarser rounds
//! they belong to, and the static permission table attached to each phase.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Phase of the overall CCA allocation process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No allocation activity
    Inactive,
    /// MainComm interviews in progress
    MaincommInterviews,
    /// Chairs and applicants rank concurrently for MainComm
    MaincommConcurrentRanking,
    /// MainComm results being computed
    MaincommResultsProcessing,
    /// MainComm results published
    MaincommResultsAvailable,
    /// SubComm interviews in progress
    SubcommInterviews,
    /// Chairs and applicants rank concurrently for SubComm
    SubcommConcurrentRanking,
    /// SubComm results being computed
    SubcommResultsProcessing,
    /// All results published
    FullResultsAvailable,
}

/// Priority order in which flags are matched against phases.
///
/// When several recognized flags are active at once, the phase listed first
/// here wins.
pub const PHASE_PRIORITY: [Phase; 8] = [
    Phase::MaincommInterviews,
    Phase::MaincommConcurrentRanking,
    Phase::MaincommResultsProcessing,
    Phase::MaincommResultsAvailable,
    Phase::SubcommInterviews,
    Phase::SubcommConcurrentRanking,
    Phase::SubcommResultsProcessing,
    Phase::FullResultsAvailable,
];

impl Phase {
    /// Every phase in declaration order
    pub const ALL: [Phase; 9] = [
        Phase::Inactive,
        Phase::MaincommInterviews,
        Phase::MaincommConcurrentRanking,
        Phase::MaincommResultsProcessing,
        Phase::MaincommResultsAvailable,
        Phase::SubcommInterviews,
        Phase::SubcommConcurrentRanking,
        Phase::SubcommResultsProcessing,
        Phase::FullResultsAvailable,
    ];

    /// Wire name of the phase, which is also the name of the flag that activates it
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Inactive => "inactive",
            Phase::MaincommInterviews => "maincomm_interviews",
            Phase::MaincommConcurrentRanking => "maincomm_concurrent_ranking",
            Phase::MaincommResultsProcessing => "maincomm_results_processing",
            Phase::MaincommResultsAvailable => "maincomm_results_available",
            Phase::SubcommInterviews => "subcomm_interviews",
            Phase::SubcommConcurrentRanking => "subcomm_concurrent_ranking",
            Phase::SubcommResultsProcessing => "subcomm_results_processing",
            Phase::FullResultsAvailable => "full_results_available",
        }
    }

    /// Map a feature flag name to the phase it activates.
    ///
    /// `inactive` is not a flag: it is what remains when no flag matches.
    pub fn from_flag_name(name: &str) -> Option<Self> {
        PHASE_PRIORITY.iter().copied().find(|p| p.as_str() == name)
    }

    /// Static permission profile for this phase
    pub fn profile(&self) -> PhaseProfile {
        profile_for(*self)
    }

    /// Round this phase belongs to
    pub fn round(&self) -> Round {
        self.profile().round
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| CoreError::parse(format!("unknown phase: {}", s)))
    }
}

/// Coarse grouping of phases used to select eligible position types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    Inactive,
    Maincomm,
    Subcomm,
    Complete,
}

impl Round {
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Inactive => "inactive",
            Round::Maincomm => "maincomm",
            Round::Subcomm => "subcomm",
            Round::Complete => "complete",
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed permission tuple attached to a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseProfile {
    pub round: Round,
    pub allow_chair_ranking: bool,
    pub allow_applicant_ranking: bool,
    pub show_results: bool,
    /// `None` while results are hidden
    pub show_maincomm_results: Option<bool>,
    /// `None` while results are hidden
    pub show_subcomm_results: Option<bool>,
    pub user_message: &'static str,
}

const HIDDEN: (bool, Option<bool>, Option<bool>) = (false, None, None);
const MAINCOMM_ONLY: (bool, Option<bool>, Option<bool>) = (true, Some(true), Some(false));
const ALL_RESULTS: (bool, Option<bool>, Option<bool>) = (true, Some(true), Some(true));

fn profile_for(phase: Phase) -> PhaseProfile {
    // (round, chair, applicant, results, message)
    let (round, chair, applicant, results, message) = match phase {
        Phase::Inactive => (
            Round::Inactive,
            false,
            false,
            HIDDEN,
            "CCA allocation is currently not active.",
        ),
        Phase::MaincommInterviews => (
            Round::Maincomm,
            false,
            false,
            HIDDEN,
            "MainComm interviews are currently in progress.",
        ),
        Phase::MaincommConcurrentRanking => (
            Round::Maincomm,
            true,
            true,
            HIDDEN,
            "MainComm applications are open! Students can apply to positions while chairs rank applicants.",
        ),
        Phase::MaincommResultsProcessing => (
            Round::Maincomm,
            false,
            false,
            HIDDEN,
            "MainComm results are being processed. Please wait.",
        ),
        Phase::MaincommResultsAvailable => (
            Round::Maincomm,
            false,
            false,
            MAINCOMM_ONLY,
            "MainComm results are available! SubComm interviews starting soon.",
        ),
        Phase::SubcommInterviews => (
            Round::Subcomm,
            false,
            false,
            MAINCOMM_ONLY,
            "SubComm interviews are in progress. MainComm results remain available.",
        ),
        Phase::SubcommConcurrentRanking => (
            Round::Subcomm,
            true,
            true,
            MAINCOMM_ONLY,
            "SubComm applications are open! Students can apply to positions while chairs rank applicants.",
        ),
        Phase::SubcommResultsProcessing => (
            Round::Subcomm,
            false,
            false,
            MAINCOMM_ONLY,
            "SubComm results are being processed. MainComm results remain available.",
        ),
        Phase::FullResultsAvailable => (
            Round::Complete,
            false,
            false,
            ALL_RESULTS,
            "All CCA allocation results are now available!",
        ),
    };

    PhaseProfile {
        round,
        allow_chair_ranking: chair,
        allow_applicant_ranking: applicant,
        show_results: results.0,
        show_maincomm_results: results.1,
        show_subcomm_results: results.2,
        user_message: message,
    }
}
