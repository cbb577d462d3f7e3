//! Prescripto core types and utilities
//!
//! Shared between the API client, the client-side stores and the backend
//! composition root: domain records, the response envelope every endpoint
//! answers with, explicit load state for cached data and the actor roles.

pub mod cached;
pub mod envelope;
pub mod error;
pub mod role;
pub mod types;

#[cfg(all(feature = "tracing", not(target_arch = "wasm32")))]
pub mod tracing;

pub use cached::Cached;
pub use envelope::Envelope;
pub use error::{CoreError, CoreResult};
pub use role::Role;
pub use types::{
    AdminDashboard, Appointment, AppointmentRequest, AvailabilityRequest, Doctor, DoctorAddress,
    DoctorDashboard, ProfileData, UserData,
};
