//! Client Module
//!
//! Everything the tenant-facing side needs to edit its branding against one
//! primary backend and an optional mirror.
//!
//! # Components
//!
//! - [`store::CustomizationStore`] - in-memory record with optimistic edits
//! - [`lock::LockStateMachine`] - unlock requests, save-and-lock, lock
//! - [`writer::ReplicatedWriter`] - best-effort primary + mirror writes
//! - [`poller::StatusPoller`] - watches a pending unlock request
//! - [`upload::LogoUploadPipeline`] - validate, preview, upload, persist
//! - [`session::BrandingSession`] - all of the above wired together
//!
//! Backends are reached through the [`api::BackendApi`] trait: over HTTP
//! with [`api::HttpBackend`], or in process with
//! [`memory::InMemoryBackend`].

pub mod api;
pub mod config;
pub mod lock;
pub mod memory;
pub mod poller;
pub mod session;
pub mod store;
pub mod upload;
pub mod writer;

pub use api::{ApiError, BackendApi, HttpBackend};
pub use config::Config;
pub use lock::LockStateMachine;
pub use memory::{BackendCall, CallKind, InMemoryBackend};
pub use poller::StatusPoller;
pub use session::BrandingSession;
pub use store::CustomizationStore;
pub use upload::{validate_logo, LogoFile, LogoUploadPipeline};
pub use writer::{MirrorOutcome, ReplicatedWriter, WriteOp, WriteOutcome};
