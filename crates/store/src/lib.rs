//! Client-side session and cache synchronization
//!
//! The admin and doctor panels each hold a bearer credential and cached
//! copies of server collections. Every refresh performs one request, checks
//! the envelope's success flag and either replaces the cached value
//! wholesale or raises a notification. Failures never escape an operation.

pub mod admin;
pub mod config;
pub mod credential;
pub mod doctor;
pub mod error;
pub mod notify;
pub mod sync;

pub use admin::{AdminEndpoints, AdminStore};
pub use config::ClientSettings;
pub use credential::{Credential, CredentialStorage, FileStorage, MemoryStorage};
pub use doctor::{DoctorEndpoints, DoctorStore};
pub use error::{StoreError, StoreResult};
pub use notify::{
    ChannelNotifier, Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier,
};
pub use prescripto_core::Cached;
pub use sync::{ReadEndpoint, Resource, SyncSession, WriteEndpoint};
