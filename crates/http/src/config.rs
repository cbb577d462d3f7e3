//! Backend server configuration

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Cross-origin policy
    pub cors: CorsConfig,
}

/// Cross-origin resource sharing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    /// Request headers clients may send, including the credential headers
    pub allowed_headers: Vec<String>,
    /// Let browsers send cookies and credential headers cross-origin
    pub allow_credentials: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://prescripto-sand-xi.vercel.app".to_string(),
                "https://prescripto-cwh4.vercel.app".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string(),
            ],
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_headers: ["Content-Type", "Authorization", "token", "aToken", "dToken"]
                .into_iter()
                .map(String::from)
                .collect(),
            allow_credentials: true,
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
