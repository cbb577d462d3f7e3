//! Configuration management for the Prescripto backend

use crate::Result;
use config::{Config, Environment, File};
use prescripto_http::ServerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main backend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Document database connection
    pub database: DatabaseConfig,

    /// Image hosting account
    pub cloudinary: CloudinaryConfig,
}

/// Document database connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string, `MONGODB_URI`
    pub uri: Option<String>,
}

/// Image hosting credentials, `CLOUDINARY_*`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudinaryConfig {
    pub name: Option<String>,
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
}

impl CloudinaryConfig {
    /// Whether every credential is present
    pub fn is_configured(&self) -> bool {
        self.name.is_some() && self.api_key.is_some() && self.secret_key.is_some()
    }
}

/// Plain environment variables the deployment conventionally sets
const PLAIN_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("MONGODB_URI", "database.uri"),
    ("CLOUDINARY_NAME", "cloudinary.name"),
    ("CLOUDINARY_API_KEY", "cloudinary.api_key"),
    ("CLOUDINARY_SECRET_KEY", "cloudinary.secret_key"),
];

impl Settings {
    /// Load settings from the process environment and an optional file
    ///
    /// Sources in increasing priority: defaults, the file, `PRESCRIPTO_`
    /// prefixed variables (`PRESCRIPTO_SERVER__HOST`), then the plain
    /// `PORT`, `MONGODB_URI` and `CLOUDINARY_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value does not parse
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Environment::with_prefix("PRESCRIPTO"), |key| {
            std::env::var(key).ok()
        })
    }

    /// Load settings with explicit environment sources
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value does not parse
    pub fn load_with<F>(path: Option<&Path>, environment: Environment, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            environment
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors.allowed_origins"),
        );

        for (variable, key) in PLAIN_OVERRIDES {
            let value = lookup(variable).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
