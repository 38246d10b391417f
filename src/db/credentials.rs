//! Document store credentials
//!
//! Loaded from a JSON file:
//!
//! ```json
//! { "uri": "mongodb://db:27017", "database": "acdef", "username": "svc", "password": "..." }
//! ```
//!
//! Only `uri` is required.

use serde::Deserialize;
use std::path::Path;

use crate::types::{AcdefError, Result};

/// Connection credentials for the document store
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub uri: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("uri", &self.uri)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Read and validate a credentials file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.ok_or_else(|| {
            AcdefError::CredentialLoad("no credentials path configured".to_string())
        })?;

        let raw = std::fs::read_to_string(path).map_err(|e| {
            AcdefError::CredentialLoad(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::parse(&raw)
            .map_err(|reason| AcdefError::CredentialLoad(format!("{}: {}", path.display(), reason)))
    }

    fn parse(raw: &str) -> std::result::Result<Self, String> {
        let credentials: Credentials =
            serde_json::from_str(raw).map_err(|e| format!("malformed credentials: {}", e))?;

        if credentials.uri.trim().is_empty() {
            return Err("credentials uri is empty".to_string());
        }
        if credentials.password.is_some() && credentials.username.is_none() {
            return Err("password given without username".to_string());
        }

        Ok(credentials)
    }

    /// Database to use, falling back to the configured project id
    pub fn database_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.database
            .as_deref()
            .filter(|db| !db.is_empty())
            .unwrap_or(fallback)
    }
}
