//! Liveness handler

/// Body served at the root path
pub const LIVENESS_BODY: &str = "API Working";

/// Liveness endpoint
pub async fn liveness() -> &'static str {
    LIVENESS_BODY
}
