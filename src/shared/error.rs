//! Shared Error Types
//!
//! Errors raised by the branding subsystem. Each variant corresponds to one
//! failure class with its own propagation policy:
//!
//! - `ValidationError` - local, pre-network (oversized image, bad hex color).
//!   Never reaches the network layer.
//! - `PrimaryWriteError` - the primary backend rejected a write or was
//!   unreachable. Fatal to the operation; optimistic state is rolled back.
//! - `MirrorReplicationError` - the primary write succeeded but the mirror
//!   hop failed. Non-fatal; downgraded to a warning in the write outcome.
//! - `PollFetchError` - a status poll tick failed. Logged only.
//! - `TransitionError` / `EditingLocked` - guards of the lock state machine.
//!
//! # Usage
//!
//! ```rust
//! use tenant_branding::shared::error::BrandingError;
//!
//! let error = BrandingError::validation("logo", "File exceeds 2 MiB");
//! assert!(error.is_validation());
//! ```
use std::fmt;
use thiserror::Error;

use crate::shared::lock::{LockStatus, LockTransition};

/// Stage of the mirror hop that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStage {
    /// Reading the tenant's routing domain from the primary
    DomainLookup,
    /// Resolving the mirror's tenant id from the domain
    IdResolution,
    /// Writing to the mirror
    MirrorWrite,
}

impl fmt::Display for MirrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DomainLookup => "domain lookup",
            Self::IdResolution => "mirror id resolution",
            Self::MirrorWrite => "mirror write",
        })
    }
}

/// Errors of the branding subsystem
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BrandingError {
    /// Local validation failure
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Primary backend rejected the write or was unreachable
    #[error("Primary write failed: {message}")]
    PrimaryWriteError {
        /// Human-readable error message
        message: String,
    },

    /// Mirror hop failed after a successful primary write
    #[error("Mirror replication failed during {stage}: {message}")]
    MirrorReplicationError {
        /// Which step of the mirror hop failed
        stage: MirrorStage,
        /// Human-readable error message
        message: String,
    },

    /// Transient failure while polling for a status change
    #[error("Status poll failed: {message}")]
    PollFetchError {
        /// Human-readable error message
        message: String,
    },

    /// Fetching the record from the primary failed
    #[error("Fetch failed: {message}")]
    FetchError {
        /// Human-readable error message
        message: String,
    },

    /// The lock state machine does not allow this transition
    #[error("Cannot {action} while status is {from}")]
    TransitionError {
        /// Status at the time of the attempt
        from: LockStatus,
        /// Attempted transition
        action: LockTransition,
    },

    /// A field mutation was attempted while editing is not allowed
    #[error("Editing is not allowed while status is {status}")]
    EditingLocked {
        /// Status at the time of the attempt
        status: LockStatus,
    },

    /// No tenant has been selected yet
    #[error("No company selected")]
    MissingCompany,

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },
}

impl BrandingError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new primary write error
    pub fn primary_write(message: impl Into<String>) -> Self {
        Self::PrimaryWriteError {
            message: message.into(),
        }
    }

    /// Create a new mirror replication error
    pub fn mirror(stage: MirrorStage, message: impl Into<String>) -> Self {
        Self::MirrorReplicationError {
            stage,
            message: message.into(),
        }
    }

    /// Create a new poll fetch error
    pub fn poll_fetch(message: impl Into<String>) -> Self {
        Self::PollFetchError {
            message: message.into(),
        }
    }

    /// Create a new fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::FetchError {
            message: message.into(),
        }
    }

    /// Create a new transition error
    pub fn transition(from: LockStatus, action: LockTransition) -> Self {
        Self::TransitionError { from, action }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Whether the error was raised before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    /// Whether the error must block the operation's success state.
    ///
    /// Mirror and poll failures are downgraded to warnings.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::MirrorReplicationError { .. } | Self::PollFetchError { .. }
        )
    }
}

impl From<serde_json::Error> for BrandingError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
