//! Prescripto API client

pub mod error;

use error::ClientError;
use prescripto_core::{Envelope, Role};
use reqwest::{Client, ClientBuilder, Method};
use serde::Serialize;
use std::time::Duration;

/// API client for the Prescripto backend
///
/// Every request carries the session's cookies back to the server, the
/// native counterpart of a browser's credentialed cross-origin request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Create a request builder carrying a role's credential header
    pub fn authorized(
        &self,
        method: Method,
        path: &str,
        role: Role,
        token: &str,
    ) -> reqwest::RequestBuilder {
        self.request(method, path).header(role.header_name(), token)
    }

    /// Execute a request and decode the response envelope
    ///
    /// A non-success status is an error even when its body is an envelope;
    /// the envelope's message is kept on the error.
    pub async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Envelope, ClientError> {
        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            debug!(status = status.as_u16(), "Request rejected by server");
            Err(ClientError::from_status(status, body))
        }
    }

    /// GET a path with a role's credential
    pub async fn get(&self, path: &str, role: Role, token: &str) -> Result<Envelope, ClientError> {
        let request = self.authorized(Method::GET, path, role, token);
        self.execute(request).await
    }

    /// POST a JSON body to a path with a role's credential
    pub async fn post<B>(
        &self,
        path: &str,
        role: Role,
        token: &str,
        body: &B,
    ) -> Result<Envelope, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.authorized(Method::POST, path, role, token).json(body);
        self.execute(request).await
    }
}

fn classify(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Request(error)
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    ///
    /// Without one a request that never completes never resolves.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let mut client_builder = ClientBuilder::new().cookie_store(true);

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("prescripto-client/{}", env!("CARGO_PKG_VERSION")));
        client_builder = client_builder.user_agent(user_agent);

        let client = client_builder.build()?;

        Ok(ApiClient { client, base_url })
    }
}
