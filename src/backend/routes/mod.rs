//! Route Configuration
//!
//! - **`router`** - router assembly and layers
//! - **`customization_routes`** - customization, routing and admin endpoints

pub mod customization_routes;
pub mod router;

pub use router::create_router;
