//! Admin panel state

use crate::config::ClientSettings;
use crate::credential::{Credential, CredentialStorage};
use crate::error::StoreResult;
use crate::notify::Notifier;
use crate::sync::{ReadEndpoint, Resource, SyncSession, WriteEndpoint};
use prescripto_core::{AdminDashboard, Appointment, AppointmentRequest, AvailabilityRequest, Doctor, Role};
use prescripto_http::client::ApiClient;
use std::sync::Arc;

/// Endpoints the admin panel talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminEndpoints {
    pub all_doctors: ReadEndpoint,
    pub change_availability: WriteEndpoint,
    pub appointments: ReadEndpoint,
    pub cancel_appointment: WriteEndpoint,
    pub dashboard: ReadEndpoint,
}

impl Default for AdminEndpoints {
    fn default() -> Self {
        Self {
            all_doctors: ReadEndpoint {
                path: "/api/admin/all-doctors",
                field: "doctors",
                fallback: "Failed to fetch doctors",
            },
            change_availability: WriteEndpoint {
                path: "/api/admin/change-availability",
                fallback: "Failed to change availability",
            },
            appointments: ReadEndpoint {
                path: "/api/admin/appointments",
                field: "appointments",
                fallback: "Failed to fetch appointments",
            },
            cancel_appointment: WriteEndpoint {
                path: "/api/admin/cancel-appointment",
                fallback: "Failed to cancel appointment",
            },
            dashboard: ReadEndpoint {
                path: "/api/admin/dashboard",
                field: "dashData",
                fallback: "Failed to fetch dashboard data",
            },
        }
    }
}

/// Credential and cached data of the admin panel
#[derive(Debug)]
pub struct AdminStore {
    session: SyncSession,
    endpoints: AdminEndpoints,
    doctors: Resource<Vec<Doctor>>,
    appointments: Resource<Vec<Appointment>>,
    dash_data: Resource<AdminDashboard>,
}

impl AdminStore {
    /// Create the store, loading the admin credential from `storage`
    pub fn new(
        client: ApiClient,
        storage: Arc<dyn CredentialStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let credential = Credential::load(Role::Admin, storage);
        Self {
            session: SyncSession::new(client, credential, notifier),
            endpoints: AdminEndpoints::default(),
            doctors: Resource::new(),
            appointments: Resource::new(),
            dash_data: Resource::new(),
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

    pub fn with_endpoints(mut self, endpoints: AdminEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn credential(&self) -> &Credential {
        self.session.credential()
    }

    pub fn backend_url(&self) -> &str {
        self.session.client().base_url()
    }

    /// Doctor roster, newest first
    pub fn doctors(&self) -> &Resource<Vec<Doctor>> {
        &self.doctors
    }

    /// All appointments, newest first
    pub fn appointments(&self) -> &Resource<Vec<Appointment>> {
        &self.appointments
    }

    pub fn dash_data(&self) -> &Resource<AdminDashboard> {
        &self.dash_data
    }

    pub async fn get_all_doctors(&self) {
        self.session
            .refresh_list(&self.endpoints.all_doctors, &self.doctors)
            .await;
    }

    /// Toggle a doctor's availability, then reload the roster
    pub async fn change_availability(&self, doc_id: &str) {
        let body = AvailabilityRequest {
            doc_id: doc_id.to_string(),
        };
        if self
            .session
            .mutate(&self.endpoints.change_availability, &body)
            .await
        {
            self.get_all_doctors().await;
        }
    }

    pub async fn get_all_appointments(&self) {
        self.session
            .refresh_list(&self.endpoints.appointments, &self.appointments)
            .await;
    }

    /// Cancel an appointment, then reload the appointment list
    pub async fn cancel_appointment(&self, appointment_id: &str) {
        let body = AppointmentRequest {
            appointment_id: appointment_id.to_string(),
        };
        if self
            .session
            .mutate(&self.endpoints.cancel_appointment, &body)
            .await
        {
            self.get_all_appointments().await;
        }
    }

    pub async fn get_dash_data(&self) {
        self.session
            .refresh(&self.endpoints.dashboard, &self.dash_data)
            .await;
    }
}
