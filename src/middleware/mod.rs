//! Global middleware: CORS policy and the bearer gate.

pub mod auth;
pub mod cors;

pub use auth::{check_authorization, require_bearer};
pub use cors::cors_layer;
