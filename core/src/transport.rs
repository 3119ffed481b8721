//! Executes `HttpRequest` values against the network.
//!
//! [`Transport`] is the single seam where I/O happens. The default
//! [`ReqwestTransport`] wraps a `reqwest::Client`; tests substitute an
//! in-memory implementation that records requests and replays canned
//! responses.

use async_trait::async_trait;
use reqwest::Method;

use crate::error::GumroadError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations must hand back non-2xx responses as data rather than
/// errors; status interpretation belongs to the envelope layer. Only
/// failures that produce no response at all are reported as
/// [`GumroadError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, GumroadError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, GumroadError> {
        (**self).execute(request).await
    }
}

/// [`Transport`] backed by `reqwest`.
///
/// Timeouts, proxies and TLS settings are whatever the wrapped client was
/// built with.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, GumroadError> {
        let mut builder = self
            .inner
            .request(reqwest_method(request.method), &request.url)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_to_reqwest() {
        assert_eq!(reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(reqwest_method(HttpMethod::Post), Method::POST);
        assert_eq!(reqwest_method(HttpMethod::Put), Method::PUT);
        assert_eq!(reqwest_method(HttpMethod::Delete), Method::DELETE);
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/user"),
            query: vec![("access_token".to_string(), "t".to_string())],
            headers: Vec::new(),
            body: None,
        };
        let err = ReqwestTransport::new().execute(request).await.unwrap_err();
        assert!(matches!(err, GumroadError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unparsable_url_is_a_transport_error() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "not a url/user".to_string(),
            query: vec![("access_token".to_string(), "t".to_string())],
            headers: Vec::new(),
            body: None,
        };
        let err = ReqwestTransport::new().execute(request).await.unwrap_err();
        assert!(matches!(err, GumroadError::Transport(_)), "got {err:?}");
    }
}
