//! Middleware components for HTTP request processing

pub mod cors;

pub use cors::{cors_layer, preflight_status_middleware};
