//! Prescripto HTTP layer
//!
//! The `client` feature provides the typed API client the front-end stores
//! talk through. The `server` feature provides the backend composition
//! root: CORS policy, liveness route and mount points for the user, admin
//! and doctor routers, whose handlers live outside this crate.

#[macro_use]
extern crate tracing;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "server")]
pub use config::{CorsConfig, ServerConfig};
#[cfg(feature = "server")]
pub use error::{HttpError, Result};
#[cfg(feature = "server")]
pub use routes::ApiRouters;
#[cfg(feature = "server")]
pub use server::HttpServer;

// Re-export commonly used types
#[cfg(feature = "server")]
pub use axum::{Json, Router, extract, response};
