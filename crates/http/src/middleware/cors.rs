//! Cross-origin policy

use crate::config::CorsConfig;
use crate::error::{HttpError, Result};
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the CORS layer for a policy
///
/// # Errors
///
/// Returns [`HttpError::Configuration`] when an origin, method or header
/// name in the policy is not valid HTTP, or is the `*` wildcard. The policy
/// is an explicit allow-list.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    reject_wildcard("origin", &config.allowed_origins)?;
    reject_wildcard("method", &config.allowed_methods)?;
    reject_wildcard("header", &config.allowed_headers)?;

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .map_err(|e| HttpError::Configuration(format!("origin {origin:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let methods = config
        .allowed_methods
        .iter()
        .map(|method| {
            Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|e| HttpError::Configuration(format!("method {method:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let headers = config
        .allowed_headers
        .iter()
        .map(|name| {
            HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes())
                .map_err(|e| HttpError::Configuration(format!("header {name:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        origins = origins.len(),
        credentials = config.allow_credentials,
        "CORS policy configured"
    );

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.allow_credentials))
}

fn reject_wildcard(kind: &str, values: &[String]) -> Result<()> {
    if values.iter().any(|value| value.trim() == "*") {
        return Err(HttpError::Configuration(format!(
            "wildcard {kind} is not allowed; list each {kind} explicitly"
        )));
    }
    Ok(())
}

/// Answer successful preflight requests with `204 No Content`
///
/// Must wrap the CORS layer so it sees the preflight response.
pub async fn preflight_status_middleware(req: Request, next: Next) -> Response {
    let is_preflight = req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let mut response = next.run(req).await;
    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_builds() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_header_rejected() {
        let config = CorsConfig {
            allowed_headers: vec!["bad header".to_string()],
            ..CorsConfig::default()
        };
        assert!(matches!(
            cors_layer(&config),
            Err(HttpError::Configuration(_))
        ));
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        let config = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            ..CorsConfig::default()
        };
        let err = cors_layer(&config).unwrap_err();
        assert!(matches!(err, HttpError::Configuration(_)));
        assert!(err.to_string().contains("origin"));
    }

    #[test]
    fn test_wildcard_method_and_header_rejected() {
        let config = CorsConfig {
            allowed_methods: vec!["GET".to_string(), "*".to_string()],
            ..CorsConfig::default()
        };
        assert!(matches!(
            cors_layer(&config),
            Err(HttpError::Configuration(_))
        ));

        let config = CorsConfig {
            allowed_headers: vec![" * ".to_string()],
            ..CorsConfig::default()
        };
        assert!(matches!(
            cors_layer(&config),
            Err(HttpError::Configuration(_))
        ));
    }
}
