//! Authenticated actor roles

use serde::{Deserialize, Serialize};
use std::fmt;

/// The actor a credential identifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
}

impl Role {
    /// Key under which the role's credential is persisted
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Admin => "aToken",
            Self::Doctor => "dToken",
        }
    }

    /// Request header carrying the credential
    ///
    /// Header names are case-insensitive on the wire; this is the
    /// normalized lowercase form of `aToken`/`dToken`.
    pub const fn header_name(self) -> &'static str {
        match self {
            Self::Admin => "atoken",
            Self::Doctor => "dtoken",
        }
    }

    /// Path prefix of the role's API
    pub const fn api_prefix(self) -> &'static str {
        match self {
            Self::Admin => "/api/admin",
            Self::Doctor => "/api/doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Doctor => write!(f, "doctor"),
        }
    }
}
