//! Backend Module
//!
//! A reference implementation of the customization backend, used as the
//! primary or the mirror in development and in the end-to-end tests. Only
//! compiled when the `ssr` feature is enabled.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs           - Module exports and documentation
//! ├── server/          - Configuration, state, initialization
//! ├── routes/          - Route configuration
//! ├── customization/   - Registry and HTTP handlers
//! └── error/           - Error types and HTTP conversion
//! ```
//!
//! # State Management
//!
//! `AppState` holds the registry behind `Arc<RwLock<_>>`; handlers take a
//! short read or write lock and never hold it across an await on I/O.
//!
//! # Example
//!
//! ```rust,no_run
//! use tenant_branding::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> std::io::Result<()> {
//! let config = ServerConfig::from_env();
//! let app = create_app(&config);
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Customization registry and handlers
pub mod customization;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
