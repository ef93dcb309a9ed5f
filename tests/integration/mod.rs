//! Integration tests
//!
//! Client flows against the in-memory backend, the HTTP client against
//! `wiremock`, and the reference backend through `axum-test`.

pub mod http_backend_test;
pub mod replication_test;
pub mod rollback_test;
pub mod upload_test;

#[cfg(feature = "ssr")]
pub mod backend_api_test;
