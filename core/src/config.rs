//! Client configuration.

use std::fmt;

use serde::Deserialize;

use crate::error::GumroadError;

/// Base URL of the Gumroad v2 API.
pub const DEFAULT_BASE_URL: &str = "https://api.gumroad.com/v2";

/// Name of the query parameter carrying the credential.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Credential and endpoint for a [`GumroadClient`](crate::GumroadClient).
///
/// Deserializable so it can be loaded from whatever configuration source the
/// application already uses; `base_url` may be omitted.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct GumroadConfig {
    pub access_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl GumroadConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: default_base_url(),
        }
    }

    /// Point the client at another server, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Reject configurations that could never authenticate.
    pub fn validate(&self) -> Result<(), GumroadError> {
        if self.access_token.trim().is_empty() {
            return Err(GumroadError::MissingIdentifier(ACCESS_TOKEN_PARAM));
        }
        if self.base_url.is_empty() {
            return Err(GumroadError::MissingIdentifier("base_url"));
        }
        Ok(())
    }
}

impl fmt::Debug for GumroadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GumroadConfig")
            .field("access_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}
