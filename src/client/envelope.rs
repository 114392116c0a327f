//! Response envelope shared by every endpoint, and request headers.

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AtolError, TransportError};
use crate::resilience::retry::CallError;
use crate::transport::RawResponse;

pub const ACCEPT_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const TOKEN_HEADER: &str = "Token";

/// Structured error carried in the `error` field of a response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    #[serde(default)]
    pub error_id: Option<String>,
    pub code: i64,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ApiError {
    pub fn into_client_error(self) -> AtolError {
        AtolError::Client {
            error_id: self.error_id.unwrap_or_default(),
            code: self.code,
            text: self.text,
        }
    }

    pub fn into_auth_error(self) -> AtolError {
        AtolError::Auth {
            error_id: self.error_id.unwrap_or_default(),
            code: self.code,
            text: self.text,
        }
    }
}

/// `{"error": {...} | null, ...operation fields}`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(flatten)]
    pub data: T,
}

pub fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<Envelope<T>, AtolError> {
    debug!("response http {}: {}", response.status, response.body);
    let envelope: Envelope<T> = serde_json::from_str(&response.body).map_err(|e| AtolError::Decode {
        status: response.status,
        reason: e.to_string(),
    })?;
    if let Some(err) = &envelope.error {
        warn!(
            "error response http {}: code={}, error_id={:?}, text={}",
            response.status, err.code, err.error_id, err.text
        );
    }
    Ok(envelope)
}

/// Splits a decoded envelope into data, a bad-token signal, or a client error.
pub fn classify<T>(envelope: Envelope<T>, bad_token_code: i64) -> Result<T, CallError> {
    match envelope.error {
        Some(err) if err.code == bad_token_code => Err(CallError::BadToken(err)),
        Some(err) => Err(CallError::Fatal(err.into_client_error())),
        None => Ok(envelope.data),
    }
}

/// Headers for one request; `Content-Type` only when a JSON body is sent.
pub fn request_headers(token: Option<&str>, json_body: bool) -> Result<HeaderMap, AtolError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    if json_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    }
    if let Some(token) = token {
        let value = HeaderValue::from_str(token)
            .map_err(|e| TransportError::Request(format!("token is not a valid header value: {}", e)))?;
        headers.insert(HeaderName::from_static("token"), value);
    }
    Ok(headers)
}
