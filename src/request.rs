//! A single prepared call to the Megaplan API.
//!
//! A [`Request`] is built by the [`Client`](crate::client::Client): the
//! URI is resolved, the `Date` header is fixed and, for signed calls, the
//! signature is computed up front. Nothing touches the network until
//! [`Request::send`] (or [`Request::dispatch`]) is called.
//!
//! # Outcome
//!
//! Exactly one of success or failure is produced per request:
//!
//! - the request cannot be delivered: [`MegaplanError::Network`]
//! - the connection drops mid-body: [`MegaplanError::Hangup`]
//! - the body is not JSON: [`MegaplanError::InvalidJson`]
//! - the envelope status is not `ok`: [`MegaplanError::Remote`]
//! - a plucked key is missing: [`MegaplanError::MissingKey`]
//!
//! The HTTP status line is not consulted; Megaplan reports failures in the
//! JSON envelope.
//!
//! # Security
//!
//! The secret key is used only to compute the signature and is never
//! stored on the request or logged.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::error::{codes, MegaplanError};
use crate::models::Credentials;
use crate::utils;

/// HTTP method used for every call.
pub const METHOD: &str = "POST";

/// Content type of every request body.
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The `User-Agent` sent with every call.
pub const USER_AGENT: &str = concat!("Megaplan Rust Client/", env!("CARGO_PKG_VERSION"));

/// Header carrying `access_id:signature`.
pub const AUTH_HEADER: &str = "X-Authorization";

/// A caller-supplied transformation of the normalized result.
pub type Transform = Box<dyn FnOnce(Value) -> Value + Send + Sync>;

/// What to hand back from a successful response.
pub enum ResponseFilter {
    /// The whole normalized payload.
    All,
    /// The value under one snake_case key of the payload.
    Key(String),
    /// The result of a function applied to the payload.
    Transform(Transform),
}

impl ResponseFilter {
    fn apply(self, payload: Value) -> Result<Value, MegaplanError> {
        match self {
            ResponseFilter::All => Ok(payload),
            ResponseFilter::Key(key) => {
                let mut payload = payload;
                match payload.as_object_mut().and_then(|m| m.remove(&key)) {
                    Some(value) if !value.is_null() => Ok(value),
                    _ => Err(MegaplanError::MissingKey { key }),
                }
            }
            ResponseFilter::Transform(f) => Ok(f(payload)),
        }
    }
}

impl fmt::Debug for ResponseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFilter::All => f.write_str("All"),
            ResponseFilter::Key(key) => f.debug_tuple("Key").field(key).finish(),
            ResponseFilter::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

/// How parameter keys are written to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// snake_case keys become PascalCase (`super_task` to `SuperTask`).
    #[default]
    PascalCase,
    /// Keys are sent as given.
    Verbatim,
}

/// A prepared, optionally signed API call.
pub struct Request {
    http: reqwest::Client,
    server: Arc<ServerConfig>,
    uri: String,
    signed_url: String,
    date: String,
    data: Value,
    signature: Option<String>,
    auth_key: Option<String>,
    response_filter: ResponseFilter,
    key_style: KeyStyle,
}

impl Request {
    /// Prepares an unsigned request for an already-resolved URI.
    pub(crate) fn new(
        http: reqwest::Client,
        server: Arc<ServerConfig>,
        uri: String,
        data: Map<String, Value>,
    ) -> Self {
        let signed_url = format!("{}/{}", server.hostname(), uri.trim_start_matches('/'));
        Self {
            http,
            server,
            uri,
            signed_url,
            date: utils::http_date(Utc::now()),
            data: Value::Object(data),
            signature: None,
            auth_key: None,
            response_filter: ResponseFilter::All,
            key_style: KeyStyle::default(),
        }
    }

    /// Signs the request with a credential pair.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Signature` if the HMAC cannot be keyed.
    pub(crate) fn sign(mut self, credentials: &Credentials) -> Result<Self, MegaplanError> {
        let text = utils::canonical_text(METHOD, CONTENT_TYPE, &self.date, &self.signed_url);
        let signature = utils::make_signature(&credentials.secret_key, &text)?;
        self.auth_key = Some(format!("{}:{}", credentials.access_id, signature));
        self.signature = Some(signature);
        Ok(self)
    }

    /// Returns only the value under `key` of the normalized payload.
    #[must_use]
    pub fn pluck(mut self, key: impl Into<String>) -> Self {
        self.response_filter = ResponseFilter::Key(key.into());
        self
    }

    /// Applies `f` to the normalized payload before returning it.
    #[must_use]
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Value) -> Value + Send + Sync + 'static,
    {
        self.response_filter = ResponseFilter::Transform(Box::new(f));
        self
    }

    /// Sends parameter keys as given instead of PascalCase.
    #[must_use]
    pub fn verbatim(mut self) -> Self {
        self.key_style = KeyStyle::Verbatim;
        self
    }

    /// The resolved API path.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The host-qualified path covered by the signature.
    pub fn signed_url(&self) -> &str {
        &self.signed_url
    }

    /// The `Date` header value.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The signature, for signed requests.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// The `X-Authorization` header value, for signed requests.
    pub fn auth_key(&self) -> Option<&str> {
        self.auth_key.as_deref()
    }

    /// Parameters before key conversion.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The response filter.
    pub fn response_filter(&self) -> &ResponseFilter {
        &self.response_filter
    }

    /// The encoded form body.
    pub fn body(&self) -> String {
        encode_body(self.data.clone(), self.key_style)
    }

    /// Performs the call and returns the filtered, normalized payload.
    ///
    /// # Errors
    ///
    /// See the module documentation for the possible failures.
    pub async fn send(self) -> Result<Value, MegaplanError> {
        let Request {
            http,
            server,
            uri,
            date,
            data,
            auth_key,
            response_filter,
            key_style,
            ..
        } = self;

        let url = server.url_for(&uri)?;
        let body = encode_body(data, key_style);

        tracing::debug!(
            method = METHOD,
            uri = %uri,
            signed = auth_key.is_some(),
            "Sending Megaplan request"
        );

        let mut builder = http
            .post(url)
            .header(header::DATE, &date)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body);
        if let Some((user, pass)) = server.basic_auth_parts() {
            builder = builder.basic_auth(user, pass);
        }
        if let Some(key) = &auth_key {
            builder = builder.header(AUTH_HEADER, key);
        }

        let mut response = builder.send().await.map_err(|e| {
            tracing::warn!(uri = %uri, error = %e, "Megaplan request dropped");
            MegaplanError::Network(e)
        })?;

        let status = response.status();
        tracing::debug!(uri = %uri, status = %status, "Megaplan responded");

        let mut chunks: Vec<Vec<u8>> = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => chunks.push(chunk.to_vec()),
                Ok(None) => break,
                Err(source) => {
                    tracing::warn!(uri = %uri, chunks = chunks.len(), "Connection closed mid-body");
                    return Err(MegaplanError::Hangup {
                        chunks: chunks
                            .iter()
                            .map(|c| String::from_utf8_lossy(c).into_owned())
                            .collect(),
                        source,
                    });
                }
            }
        }

        let payload = parse_envelope(&chunks.concat())?;
        response_filter.apply(payload)
    }

    /// Performs the call and deserializes the result into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`Request::send`] returns, plus
    /// `MegaplanError::Serialization` when the payload does not fit `T`.
    pub async fn send_as<T: DeserializeOwned>(self) -> Result<T, MegaplanError> {
        let value = self.send().await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Sends the request on the runtime and invokes exactly one callback.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch<S, F>(self, on_success: S, on_failure: F) -> JoinHandle<()>
    where
        S: FnOnce(Value) + Send + 'static,
        F: FnOnce(MegaplanError) + Send + 'static,
    {
        tokio::spawn(async move {
            match self.send().await {
                Ok(value) => on_success(value),
                Err(e) => on_failure(e),
            }
        })
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("uri", &self.uri)
            .field("date", &self.date)
            .field("signed", &self.auth_key.is_some())
            .field("response_filter", &self.response_filter)
            .field("key_style", &self.key_style)
            .finish_non_exhaustive()
    }
}

fn encode_body(data: Value, key_style: KeyStyle) -> String {
    let data = match key_style {
        KeyStyle::PascalCase => utils::convert_keys_to_pascal_case(data),
        KeyStyle::Verbatim => data,
    };
    utils::encode_form(&data)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Validates the response envelope and returns its normalized payload.
///
/// The payload is `data`, else `json`, else an empty object; its keys are
/// converted to snake_case and temporal values coerced.
fn parse_envelope(body: &[u8]) -> Result<Value, MegaplanError> {
    let mut envelope: Value =
        serde_json::from_slice(body).map_err(|source| MegaplanError::InvalidJson { source })?;

    let status = envelope.get("status").cloned().unwrap_or(Value::Null);
    if status.get("code").and_then(Value::as_str) != Some(codes::OK) {
        tracing::debug!(status = %status, "Megaplan rejected the request");
        return Err(MegaplanError::remote(status));
    }

    let payload = ["data", "json"]
        .iter()
        .find_map(|key| {
            envelope
                .as_object_mut()
                .and_then(|m| m.remove(*key))
                .filter(is_truthy)
        })
        .unwrap_or_else(|| Value::Object(Map::new()));

    Ok(utils::convert_values_to_natives(
        utils::convert_keys_to_underscore(payload),
    ))
}
