//! HTTP request and response values as plain data.
//!
//! # Design
//! The envelope layer builds `HttpRequest` values and interprets
//! `HttpResponse` values without touching the network. A [`Transport`]
//! executes the round-trip in between, which keeps request construction and
//! envelope parsing deterministic and testable without a server.
//!
//! [`Transport`]: crate::transport::Transport

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Uppercase verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` never carries a query string; query pairs live in `query` in the
/// order they were merged.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first query pair named `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_method_is_get() {
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }

    #[test]
    fn method_verbs_are_uppercase() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn query_param_returns_first_match() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/products".to_string(),
            query: vec![
                ("access_token".to_string(), "t1".to_string()),
                ("page".to_string(), "2".to_string()),
            ],
            headers: Vec::new(),
            body: None,
        };
        assert_eq!(req.query_param("access_token"), Some("t1"));
        assert_eq!(req.query_param("page"), Some("2"));
        assert_eq!(req.query_param("missing"), None);
    }
}
