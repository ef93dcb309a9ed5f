//! Shared Module
//!
//! Types shared between the branding client and the reference backend: the
//! customization record and its wire mapping, the lock state machine, the
//! request/response envelopes of the customization endpoints, errors and
//! configuration.
//!
//! Everything here is platform-agnostic and free of I/O.

/// Customization record and wire mapping
pub mod customization;

/// Lock status and transition table
pub mod lock;

/// Hex colors and default palette
pub mod color;

/// Endpoint request/response bodies
pub mod api;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use customization::{
    Assets, Branding, ColorSlot, CompanyId, CustomizationData, CustomizationRecord,
    DescriptionField, FontSlot, Theme, Typography,
};
pub use lock::{LockStatus, LockTransition};
pub use error::{BrandingError, MirrorStage};
pub use config::{AppConfig, AppConfigBuilder, BackendEndpoint, ConfigError};
