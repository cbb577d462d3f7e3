//! Prescripto backend daemon

pub mod config;
pub mod error;
pub mod server;

pub use config::{CloudinaryConfig, DatabaseConfig, Settings};
pub use error::{DaemonError, Result};
pub use server::run;
