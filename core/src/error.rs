//! Error types for the Gumroad client.
//!
//! # Design
//! The remote API reports every failure through the same envelope, but
//! callers usually care why a call failed. Connection problems, rejected
//! credentials, other HTTP statuses, business errors reported on a 200 and
//! unreadable bodies each get their own variant. [`GumroadError::message`]
//! still gives the single human-readable message for callers that do not
//! branch on the cause.

use thiserror::Error;

/// Errors returned by `GumroadClient` operations.
#[derive(Debug, Error)]
pub enum GumroadError {
    /// The request never produced an HTTP response (invalid URL, connection
    /// refused, DNS failure, TLS error, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The API rejected the access token (HTTP 401 or 403).
    #[error("authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    /// The API answered with a non-200 status other than 401/403.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The API answered 200 but the envelope's `success` flag was falsy.
    #[error("{message}")]
    Api { message: String },

    /// The body was not a JSON envelope, or the projected field was missing
    /// or of the wrong shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A required path identifier was empty.
    #[error("missing required identifier `{0}`")]
    MissingIdentifier(&'static str),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl GumroadError {
    /// Human-readable message without the variant prefix.
    ///
    /// For [`GumroadError::Api`] this is exactly the envelope's `message`.
    pub fn message(&self) -> String {
        match self {
            GumroadError::Transport(msg)
            | GumroadError::MalformedResponse(msg)
            | GumroadError::Serialization(msg) => msg.clone(),
            GumroadError::Authentication { message, .. }
            | GumroadError::Status { message, .. }
            | GumroadError::Api { message } => message.clone(),
            GumroadError::MissingIdentifier(name) => {
                format!("missing required identifier `{name}`")
            }
        }
    }

    /// HTTP status of the response that caused the error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GumroadError::Authentication { status, .. } | GumroadError::Status { status, .. } => {
                Some(*status)
            }
            GumroadError::Api { .. } => Some(200),
            _ => None,
        }
    }
}

/// Every `reqwest` failure means no usable response came back. Builder
/// errors are almost always an unparsable base URL, so they land here too
/// rather than in [`GumroadError::Serialization`].
impl From<reqwest::Error> for GumroadError {
    fn from(err: reqwest::Error) -> Self {
        GumroadError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GumroadError {
    fn from(err: serde_json::Error) -> Self {
        GumroadError::Serialization(err.to_string())
    }
}
