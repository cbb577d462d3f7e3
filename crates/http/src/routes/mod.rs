//! API route mounting
//!
//! Handlers for the user, admin and doctor APIs are supplied by the caller;
//! this module only fixes where they are mounted.

use crate::error::HttpError;
use axum::{Router, http::Uri, routing::get};

pub mod health;

/// Mount point of the patient-facing API
pub const USER_API: &str = "/api/user";
/// Mount point of the admin API
pub const ADMIN_API: &str = "/api/admin";
/// Mount point of the doctor API
pub const DOCTOR_API: &str = "/api/doctor";

/// Routers mounted under the API prefixes
#[derive(Clone, Debug, Default)]
pub struct ApiRouters {
    pub user: Router,
    pub admin: Router,
    pub doctor: Router,
}

impl ApiRouters {
    pub fn with_user(mut self, router: Router) -> Self {
        self.user = router;
        self
    }

    pub fn with_admin(mut self, router: Router) -> Self {
        self.admin = router;
        self
    }

    pub fn with_doctor(mut self, router: Router) -> Self {
        self.doctor = router;
        self
    }
}

/// Build the application router
///
/// Unmatched paths answer a 404 failure envelope.
pub fn router(api: ApiRouters) -> Router {
    Router::new()
        .route("/", get(health::liveness))
        .nest(USER_API, api.user)
        .nest(ADMIN_API, api.admin)
        .nest(DOCTOR_API, api.doctor)
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> HttpError {
    debug!(path = %uri.path(), "No route");
    HttpError::NotFound("Route not found".to_string())
}
