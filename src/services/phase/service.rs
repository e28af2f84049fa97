//! Phase Service
//!
//! Reads the feature flags from the store and resolves the current phase.
//! Callers that only need a permission decision use [`PhaseService::phase_info_at`],
//! which never fails: when the store is unreachable it yields the fail-closed
//! `inactive` record.

use std::sync::Arc;

use cca_allocation_core::{resolve, CoreResult, FlagStore, PhaseInfo, ResolveOptions};
use chrono::{DateTime, Utc};

use crate::models::settings::AppConfig;

/// Resolves [`PhaseInfo`] against a flag store
#[derive(Clone)]
pub struct PhaseService {
    store: Arc<dyn FlagStore>,
    options: ResolveOptions,
}

impl PhaseService {
    pub fn new(store: Arc<dyn FlagStore>, options: ResolveOptions) -> Self {
        Self { store, options }
    }

    /// Build the service from the loaded configuration.
    ///
    /// A `phase_override` is only carried over when the run mode allows it.
    pub fn from_config(store: Arc<dyn FlagStore>, config: &AppConfig) -> Self {
        let mut options = ResolveOptions::default();
        if let Some(offset) = config.display_offset() {
            options = options.with_display_offset(offset);
        }

        match (config.phase_override, config.effective_phase_override()) {
            (_, Some(phase)) => {
                tracing::warn!(
                    phase = %phase,
                    run_mode = config.run_mode.as_str(),
                    "phase override active, feature flags will not decide the phase"
                );
                options = options.with_override(phase);
            }
            (Some(phase), None) => {
                tracing::warn!(
                    phase = %phase,
                    run_mode = config.run_mode.as_str(),
                    "ignoring phase override"
                );
            }
            (None, None) => {}
        }

        Self::new(store, options)
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve at `now`, surfacing store failures
    pub fn try_phase_info_at(&self, now: DateTime<Utc>) -> CoreResult<PhaseInfo> {
        let flags = self.store.fetch_flags()?;
        Ok(resolve(now, &flags, &self.options))
    }

    /// Resolve at `now`, falling back to the `inactive` record on failure
    pub fn phase_info_at(&self, now: DateTime<Utc>) -> PhaseInfo {
        match self.try_phase_info_at(now) {
            Ok(info) => info,
            Err(e) => {
                tracing::error!(error = %e, "failed to read feature flags, treating phase as inactive");
                PhaseInfo::unavailable(now)
            }
        }
    }

    pub fn current_phase_info(&self) -> PhaseInfo {
        self.phase_info_at(Utc::now())
    }
}

impl std::fmt::Debug for PhaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseService")
            .field("options", &self.options)
            .finish()
    }
}
