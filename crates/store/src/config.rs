//! Client settings

use crate::credential::{CredentialStorage, FileStorage};
use crate::error::{StoreError, StoreResult};
use prescripto_core::CoreError;
use prescripto_http::client::ApiClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Used when no backend URL is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Where the panels find the backend and keep their credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend_url: String,
    pub credentials_path: PathBuf,
    /// No timeout when unset
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            credentials_path: default_credentials_path(),
            request_timeout: None,
        }
    }
}

impl ClientSettings {
    /// Read settings from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the request timeout is not a whole number of seconds
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if the request timeout is not a whole number of seconds
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend_url = non_empty("BACKEND_URL")
            .or_else(|| non_empty("VITE_BACKEND_URL"))
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let credentials_path = non_empty("PRESCRIPTO_CREDENTIALS")
            .map(PathBuf::from)
            .unwrap_or_else(default_credentials_path);

        let request_timeout = non_empty("PRESCRIPTO_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    StoreError::from(CoreError::invalid_config(format!(
                        "PRESCRIPTO_REQUEST_TIMEOUT_SECS must be a number of seconds, got {raw:?}"
                    )))
                })
            })
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            backend_url,
            credentials_path,
            request_timeout,
        })
    }

    /// Build an API client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed
    pub fn build_client(&self) -> StoreResult<ApiClient> {
        let mut builder = ApiClient::builder().base_url(&self.backend_url);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    /// File-backed credential storage at the configured path
    ///
    /// Storages handed out for the same path serialise their writes.
    pub fn storage(&self) -> Arc<dyn CredentialStorage> {
        Arc::new(FileStorage::new(&self.credentials_path))
    }
}

fn default_credentials_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prescripto")
        .join("credentials.json")
}
