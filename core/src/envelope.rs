//! Request construction and response-envelope interpretation.
//!
//! # Design
//! Every Gumroad endpoint shares one contract: the access token travels as a
//! query parameter, the body (if any) is JSON, and the reply is an envelope
//! of the form `{ "success": bool, "message"?: string, <payload>... }`.
//! [`build_request`] and [`parse_envelope`] are the two halves of that
//! contract; neither performs I/O.
//!
//! A reply only counts as a success when the status is exactly 200 *and*
//! the envelope's `success` flag is truthy. Everything else becomes a
//! [`GumroadError`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{GumroadConfig, ACCESS_TOKEN_PARAM};
use crate::error::GumroadError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Ordered query parameters.
///
/// Inserting an existing key replaces its value in place, so later sources
/// take precedence while the first source keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder-style [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Spread `other` over `self`: colliding keys take `other`'s value.
    pub fn merge(&mut self, other: Params) {
        for (key, value) in other.0 {
            self.insert(key, value);
        }
    }

    /// Flatten a serializable struct into query parameters.
    ///
    /// The value must serialize to a JSON object. `null` fields are dropped,
    /// strings are used verbatim and other scalars use their JSON rendering.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, GumroadError> {
        let object = match serde_json::to_value(value)? {
            Value::Object(object) => object,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(GumroadError::Serialization(format!(
                    "query parameters must be an object, got {other}"
                )))
            }
        };

        let mut params = Self::new();
        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::String(s) => params.insert(key, s),
                other => params.insert(key, other.to_string()),
            }
        }
        Ok(params)
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Per-call options: HTTP method, caller query parameters and JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub params: Params,
    pub data: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Attach a JSON body serialized from `data`.
    pub fn data<T: Serialize>(mut self, data: &T) -> Result<Self, GumroadError> {
        self.data = Some(serde_json::to_value(data)?);
        Ok(self)
    }
}

/// Build the request for `path` (appended verbatim to the base URL).
///
/// The credential is inserted first and the caller's params are spread over
/// it, so a caller param named `access_token` replaces the configured token.
pub fn build_request(
    config: &GumroadConfig,
    path: &str,
    options: RequestOptions,
) -> Result<HttpRequest, GumroadError> {
    let mut query = Params::new().with(ACCESS_TOKEN_PARAM, config.access_token.as_str());
    query.merge(options.params);

    let body = options
        .data
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    Ok(HttpRequest {
        method: options.method,
        url: format!("{}{path}", config.base_url),
        query: query.into_pairs(),
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body,
    })
}

/// A decoded success envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub message: Option<String>,
    /// Every top-level key of the body except `success` and `message`.
    pub fields: Map<String, Value>,
}

impl Envelope {
    /// Deserialize the payload field `field`. A missing field is treated as
    /// `null`, so it only succeeds for types that accept `null`.
    pub fn project<T: DeserializeOwned>(&self, field: &str) -> Result<T, GumroadError> {
        let value = self.fields.get(field).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| GumroadError::MalformedResponse(format!("field `{field}`: {e}")))
    }

    pub fn field(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Interpret a response as a Gumroad envelope.
pub fn parse_envelope(response: HttpResponse) -> Result<Envelope, GumroadError> {
    if response.status != 200 {
        let message = envelope_message(&response.body).unwrap_or_else(|| {
            format!("Request failed with status code {}", response.status)
        });
        return Err(match response.status {
            401 | 403 => GumroadError::Authentication {
                status: response.status,
                message,
            },
            status => GumroadError::Status { status, message },
        });
    }

    let mut object = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            return Err(GumroadError::MalformedResponse(format!(
                "expected a JSON object envelope, got {}",
                json_kind(&other)
            )))
        }
        Err(e) => {
            return Err(GumroadError::MalformedResponse(format!(
                "body is not JSON: {e}"
            )))
        }
    };

    let success = object.remove("success").is_some_and(|v| is_truthy(&v));
    let message = object.remove("message").and_then(message_text);

    if !success {
        return Err(GumroadError::Api {
            message: message.unwrap_or_default(),
        });
    }

    Ok(Envelope {
        message,
        fields: object,
    })
}

/// Truthiness as the API's JSON-script clients see it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn message_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn envelope_message(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(mut object) => object.remove("message").and_then(message_text),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
