//! The Gumroad API client.
//!
//! # Design
//! `GumroadClient` holds an immutable configuration and a [`Transport`].
//! [`GumroadClient::request`] is the only place a request is issued: it
//! builds the request, awaits the transport once, and interprets the
//! envelope. The endpoint wrappers are thin projections over it and
//! never intercept its errors.
//!
//! The client carries no mutable state, so one instance can be shared
//! across tasks (behind an `Arc` or by cloning) without locking.

use tracing::{debug, instrument, warn};

use crate::config::GumroadConfig;
use crate::envelope::{build_request, parse_envelope, Envelope, RequestOptions};
use crate::error::GumroadError;
use crate::transport::{ReqwestTransport, Transport};

#[derive(Debug, Clone)]
pub struct GumroadClient<T = ReqwestTransport> {
    config: GumroadConfig,
    transport: T,
}

impl GumroadClient<ReqwestTransport> {
    /// Client over a default `reqwest` transport.
    pub fn new(config: GumroadConfig) -> Result<Self, GumroadError> {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> GumroadClient<T> {
    pub fn with_transport(config: GumroadConfig, transport: T) -> Result<Self, GumroadError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &GumroadConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one authenticated round-trip against `path` and return the
    /// success envelope.
    ///
    /// `path` is appended verbatim to the base URL. See
    /// [`build_request`] for how the credential and caller params merge.
    #[instrument(skip_all, fields(method = options.method.as_str(), path = path))]
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Envelope, GumroadError> {
        let request = build_request(&self.config, path, options)?;
        debug!("dispatching request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "transport failed");
                return Err(err);
            }
        };

        let status = response.status;
        match parse_envelope(response) {
            Ok(envelope) => {
                debug!(status, "request succeeded");
                Ok(envelope)
            }
            Err(err) => {
                warn!(status, error = %err, "request rejected");
                Err(err)
            }
        }
    }
}
