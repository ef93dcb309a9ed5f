//! Server Module
//!
//! - **`config`** - environment configuration
//! - **`state`** - application state and `FromRef` extraction
//! - **`init`** - application construction

pub mod config;
pub mod init;
pub mod state;

pub use config::ServerConfig;
pub use init::{create_app, create_app_with_state};
pub use state::AppState;
