//! Customization storage and handlers of the reference backend.

/// In-memory registry of records, company domains and uploads
pub mod state;

/// HTTP handlers
pub mod handlers;

pub use state::{CustomizationRegistry, StoredUpload, Upsert};
