//! Feature Flags
//!
//! Time-bounded named markers whose presence drives phase transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// A named flag that is active until `expires_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

impl FeatureFlag {
    pub fn new(name: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            expires_at,
        }
    }

    /// A flag is active while its expiry lies strictly in the future
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Read-only source of feature flags.
///
/// Implementations return every flag they know of, expired or not; filtering
/// against the current time happens in the resolver.
pub trait FlagStore: Send + Sync {
    fn fetch_flags(&self) -> CoreResult<Vec<FeatureFlag>>;
}

/// Flags that are active at `now`, ordered by expiry (name breaks ties)
pub fn active_flags_at(flags: &[FeatureFlag], now: DateTime<Utc>) -> Vec<&FeatureFlag> {
    let mut active: Vec<&FeatureFlag> = flags.iter().filter(|f| f.is_active_at(now)).collect();
    active.sort_by(|a, b| {
        a.expires_at
            .cmp(&b.expires_at)
            .then_with(|| a.name.cmp(&b.name))
    });
    active
}
