//! Tenant Branding - Main Library
//!
//! Multi-tenant branding customization: each tenant edits its theme colors,
//! typography and logo behind an administrator-controlled edit lock, and
//! every write is replicated on a best-effort basis from a primary backend to
//! an optional mirror backend.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and backend
//!   - Customization record, wire format, color validation
//!   - Lock status and transition table
//!   - Error and configuration types
//!
//! - **`client`** - Tenant-side logic
//!   - In-memory store with optimistic edits and rollback
//!   - Lock state machine and unlock status poller
//!   - Replicated writer and logo upload pipeline
//!   - HTTP and in-memory backend implementations
//!
//! - **`backend`** - Reference HTTP backend (only compiled with `ssr` feature)
//!   - Axum server exposing the customization endpoints
//!   - Administrator grant and force-lock endpoints
//!
//! # Feature Flags
//!
//! - **`ssr`** - Builds the reference backend and the `branding-backend`
//!   binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use tenant_branding::client::{BrandingSession, Config};
//! use tenant_branding::shared::CompanyId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = BrandingSession::from_config(&Config::load()?)?;
//! let record = session.open(Some(CompanyId(7))).await?;
//! println!("status: {}", record.status());
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Client state lives behind `Arc<tokio::sync::RwLock<_>>` and no lock is held
//! across a network call. The unlock status poller is the only background
//! task; it is aborted when its owner is dropped.

/// Shared types and data structures
pub mod shared;

/// Tenant-side customization logic
pub mod client;

/// Reference backend server
#[cfg(feature = "ssr")]
pub mod backend;
