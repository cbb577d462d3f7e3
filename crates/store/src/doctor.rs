//! Doctor panel state

use crate::config::ClientSettings;
use crate::credential::{Credential, CredentialStorage};
use crate::error::StoreResult;
use crate::notify::Notifier;
use crate::sync::{ReadEndpoint, Resource, SyncSession, WriteEndpoint};
use prescripto_core::{Appointment, AppointmentRequest, DoctorDashboard, ProfileData, Role};
use prescripto_http::client::ApiClient;
use std::sync::Arc;

/// Endpoints the doctor panel talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoctorEndpoints {
    pub appointments: ReadEndpoint,
    pub profile: ReadEndpoint,
    pub cancel_appointment: WriteEndpoint,
    pub complete_appointment: WriteEndpoint,
    pub dashboard: ReadEndpoint,
}

impl Default for DoctorEndpoints {
    fn default() -> Self {
        Self {
            appointments: ReadEndpoint {
                path: "/api/doctor/appointments",
                field: "appointments",
                fallback: "Failed to fetch appointments",
            },
            profile: ReadEndpoint {
                path: "/api/doctor/profile",
                field: "profileData",
                fallback: "Failed to fetch profile",
            },
            cancel_appointment: WriteEndpoint {
                path: "/api/doctor/cancel-appointment",
                fallback: "Failed to cancel appointment",
            },
            complete_appointment: WriteEndpoint {
                path: "/api/doctor/complete-appointment",
                fallback: "Failed to complete appointment",
            },
            dashboard: ReadEndpoint {
                path: "/api/doctor/dashboard",
                field: "dashData",
                fallback: "Failed to fetch dashboard data",
            },
        }
    }
}

/// Credential and cached data of the doctor panel
#[derive(Debug)]
pub struct DoctorStore {
    session: SyncSession,
    endpoints: DoctorEndpoints,
    appointments: Resource<Vec<Appointment>>,
    dash_data: Resource<DoctorDashboard>,
    profile_data: Resource<ProfileData>,
}

impl DoctorStore {
    /// Create the store, loading the doctor credential from `storage`
    pub fn new(
        client: ApiClient,
        storage: Arc<dyn CredentialStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let credential = Credential::load(Role::Doctor, storage);
        Self {
            session: SyncSession::new(client, credential, notifier),
            endpoints: DoctorEndpoints::default(),
            appointments: Resource::new(),
            dash_data: Resource::new(),
            profile_data: Resource::new(),
        }
    }

    /// Create the store from client settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_settings(settings: &ClientSettings, notifier: Arc<dyn Notifier>) -> StoreResult<Self> {
        Ok(Self::new(settings.build_client()?, settings.storage(), notifier))
    }

    pub fn with_endpoints(mut self, endpoints: DoctorEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn credential(&self) -> &Credential {
        self.session.credential()
    }

    pub fn backend_url(&self) -> &str {
        self.session.client().base_url()
    }

    /// The doctor's appointments, newest first
    pub fn appointments(&self) -> &Resource<Vec<Appointment>> {
        &self.appointments
    }

    pub fn dash_data(&self) -> &Resource<DoctorDashboard> {
        &self.dash_data
    }

    pub fn profile_data(&self) -> &Resource<ProfileData> {
        &self.profile_data
    }

    /// Replace the cached profile, e.g. with the result of a local edit
    pub fn set_profile_data(&self, profile: ProfileData) {
        self.profile_data.replace(profile);
    }

    pub async fn get_appointments(&self) {
        self.session
            .refresh_list(&self.endpoints.appointments, &self.appointments)
            .await;
    }

    pub async fn get_profile_data(&self) {
        self.session
            .refresh(&self.endpoints.profile, &self.profile_data)
            .await;
    }

    /// Cancel an appointment, then reload appointments and dashboard
    pub async fn cancel_appointment(&self, appointment_id: &str) {
        let body = AppointmentRequest {
            appointment_id: appointment_id.to_string(),
        };
        if self
            .session
            .mutate(&self.endpoints.cancel_appointment, &body)
            .await
        {
            self.reload_after_write().await;
        }
    }

    /// Mark an appointment completed, then reload appointments and dashboard
    pub async fn complete_appointment(&self, appointment_id: &str) {
        let body = AppointmentRequest {
            appointment_id: appointment_id.to_string(),
        };
        if self
            .session
            .mutate(&self.endpoints.complete_appointment, &body)
            .await
        {
            self.reload_after_write().await;
        }
    }

    pub async fn get_dash_data(&self) {
        self.session
            .refresh(&self.endpoints.dashboard, &self.dash_data)
            .await;
    }

    async fn reload_after_write(&self) {
        tokio::join!(self.get_appointments(), self.get_dash_data());
    }
}
