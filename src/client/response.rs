//! Decoded response payload

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};

use crate::client::negotiate::{BodyKind, NegotiationPolicy};
use crate::error::Result;

/// Response body after content negotiation
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed JSON (an empty JSON body decodes to `null`)
    Json(serde_json::Value),
    /// Raw bytes, unmodified
    Bytes(Bytes),
    /// Text decoded with the declared charset
    Text(String),
}

impl ResponseBody {
    /// Decoder that produced this body
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        match self {
            Self::Json(_) => BodyKind::Json,
            Self::Bytes(_) => BodyKind::Bytes,
            Self::Text(_) => BodyKind::Text,
        }
    }

    /// JSON value, if decoded as JSON
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Raw bytes, if read as bytes
    #[must_use]
    pub const fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Text, if decoded as text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Deserialize a JSON body into `T`
    ///
    /// Returns `None` when the body is not JSON.
    pub fn json_into<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.as_json()
            .map(|value| serde_json::from_value(value.clone()).map_err(Into::into))
    }
}

/// Result of one exchange: decoded body, status code and headers
///
/// Header lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct NegotiatedResponse {
    /// Decoded body
    pub body: ResponseBody,
    /// Numeric status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
}

impl NegotiatedResponse {
    /// Split into the `(body, status, headers)` triple
    #[must_use]
    pub fn into_parts(self) -> (ResponseBody, u16, HeaderMap) {
        (self.body, self.status, self.headers)
    }

    /// Declared `Content-Type`, if present and valid ASCII
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        content_type(&self.headers)
    }

    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

pub(crate) fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

/// Read the engine response according to `policy`
pub(crate) async fn decode(
    response: reqwest::Response,
    policy: &NegotiationPolicy,
) -> Result<NegotiatedResponse> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let kind = policy.select(content_type(&headers));

    tracing::debug!(status, ?kind, content_type = ?content_type(&headers), "decoding response body");

    let body = match kind {
        BodyKind::Json => ResponseBody::Json(parse_json(&response.bytes().await?)?),
        BodyKind::Bytes => ResponseBody::Bytes(response.bytes().await?),
        BodyKind::Text => ResponseBody::Text(response.text().await?),
    };

    Ok(NegotiatedResponse {
        body,
        status,
        headers,
    })
}

/// Parse a JSON body; whitespace-only input is `null`
pub(crate) fn parse_json(bytes: &[u8]) -> Result<serde_json::Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}
