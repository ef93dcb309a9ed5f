//! Lock State Machine
//!
//! The access-control state that gates whether a tenant may edit its own
//! branding. The status is advisory UI state, not a security boundary.
//!
//! # States
//!
//! ```text
//!            request_unlock            grant_unlock (external)
//!   Locked ─────────────────▶ UnlockRequested ─────────────────▶ Unlocked
//!     ▲                              │                              │
//!     └──────── force_lock (any) ────┴──────── save_and_lock ───────┘
//! ```
//!
//! Every status change goes through [`LockStatus::transition`]. Changes made
//! by an external administrator are never initiated here; they are observed
//! by refetching the record and classified with [`LockStatus::classify`].
//!
//! # Wire Format
//!
//! Statuses travel as the literal strings `locked`, `unlock_requested` and
//! `unlocked`. Any other value is read as `locked`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::error::BrandingError;

/// Lock status of one tenant's customization record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum LockStatus {
    /// Editing is disabled (initial state)
    #[default]
    Locked,
    /// The tenant asked an administrator for editing rights
    UnlockRequested,
    /// The tenant may edit theme, fonts and assets
    Unlocked,
}

/// Transitions of the lock state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockTransition {
    /// Tenant asks for editing rights (`locked` → `unlock_requested`)
    RequestUnlock,
    /// Administrator grants the request (`unlock_requested` → `unlocked`)
    GrantUnlock,
    /// Tenant saves pending edits and locks (`unlocked` → `locked`)
    SaveAndLock,
    /// Lock from any state. Issued by an administrator, or by the tenant
    /// withdrawing its own request.
    ForceLock,
}

impl LockStatus {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::UnlockRequested => "unlock_requested",
            Self::Unlocked => "unlocked",
        }
    }

    /// Parse a wire value. Unknown values fail safe to `Locked`.
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "unlock_requested" => Self::UnlockRequested,
            "unlocked" => Self::Unlocked,
            "locked" => Self::Locked,
            other => {
                tracing::debug!("Unknown lock status '{}', treating as locked", other);
                Self::Locked
            }
        }
    }

    /// Whether theme, font and asset fields may be mutated
    pub fn allows_editing(&self) -> bool {
        matches!(self, Self::Unlocked)
    }

    /// Apply a transition, returning the new status.
    ///
    /// Illegal transitions return [`BrandingError::TransitionError`] and leave
    /// the caller's state untouched.
    pub fn transition(self, transition: LockTransition) -> Result<LockStatus, BrandingError> {
        use LockStatus::*;
        use LockTransition::*;

        match (self, transition) {
            (Locked, RequestUnlock) => Ok(UnlockRequested),
            (UnlockRequested, GrantUnlock) => Ok(Unlocked),
            (Unlocked, SaveAndLock) => Ok(Locked),
            (_, ForceLock) => Ok(Locked),
            (from, action) => Err(BrandingError::transition(from, action)),
        }
    }

    /// Name the transition that explains an observed status change.
    ///
    /// Returns `None` when the status did not change. A change that no single
    /// transition explains (e.g. `locked` → `unlocked`, an administrator
    /// unlocking without a pending request) is reported as `GrantUnlock`,
    /// since a refetch replaces the record wholesale either way.
    pub fn classify(from: LockStatus, to: LockStatus) -> Option<LockTransition> {
        match (from, to) {
            (a, b) if a == b => None,
            (_, LockStatus::Locked) => Some(if from == LockStatus::Unlocked {
                LockTransition::SaveAndLock
            } else {
                LockTransition::ForceLock
            }),
            (_, LockStatus::UnlockRequested) => Some(LockTransition::RequestUnlock),
            (_, LockStatus::Unlocked) => Some(LockTransition::GrantUnlock),
        }
    }
}

impl From<String> for LockStatus {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LockTransition {
    /// Short action name used in log lines and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestUnlock => "request_unlock",
            Self::GrantUnlock => "grant_unlock",
            Self::SaveAndLock => "save_and_lock",
            Self::ForceLock => "force_lock",
        }
    }
}

impl fmt::Display for LockTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
