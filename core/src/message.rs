//! Internal HTTP message model.
//!
//! # Design
//! These types describe requests and responses as plain, immutable data. The
//! bridge in `mappers` converts them to and from the `http`-crate values the
//! client engine speaks; nothing here touches the network. Fields are private
//! and set once by constructors, so a value observed by one caller cannot
//! change under another.
//!
//! Bodies are `Bytes`, which makes clones cheap and hands payloads to the
//! client layer without copying.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::headers::Headers;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl From<HttpMethod> for http::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Head => http::Method::HEAD,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Patch => http::Method::PATCH,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Options => http::Method::OPTIONS,
        }
    }
}

/// Protocol version a response is mapped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtocolVersion {
    Http10,
    #[default]
    Http11,
    Http2,
    Http3,
}

impl ProtocolVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::Http10 => "HTTP/1.0",
            ProtocolVersion::Http11 => "HTTP/1.1",
            ProtocolVersion::Http2 => "HTTP/2",
            ProtocolVersion::Http3 => "HTTP/3",
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HTTP/1.0" => Ok(ProtocolVersion::Http10),
            "HTTP/1.1" => Ok(ProtocolVersion::Http11),
            "HTTP/2" | "HTTP/2.0" => Ok(ProtocolVersion::Http2),
            "HTTP/3" | "HTTP/3.0" => Ok(ProtocolVersion::Http3),
            _ => Err(RelayError::invalid_argument(s, "unknown HTTP version")),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProtocolVersion> for http::Version {
    fn from(v: ProtocolVersion) -> Self {
        match v {
            ProtocolVersion::Http10 => http::Version::HTTP_10,
            ProtocolVersion::Http11 => http::Version::HTTP_11,
            ProtocolVersion::Http2 => http::Version::HTTP_2,
            ProtocolVersion::Http3 => http::Version::HTTP_3,
        }
    }
}

/// An outbound request of the internal model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    target: String,
    headers: Headers,
    body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, target: impl Into<String>, headers: Headers) -> Self {
        Self {
            method,
            target: target.into(),
            headers,
            body: None,
        }
    }

    pub fn get(target: impl Into<String>, headers: Headers) -> Self {
        Self::new(HttpMethod::Get, target, headers)
    }

    pub fn with_body(
        method: HttpMethod,
        target: impl Into<String>,
        headers: Headers,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::new(method, target, headers)
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

/// A response of the internal model.
///
/// An empty payload is never stored: `message_body()` is either `None` or a
/// non-empty byte string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    version: ProtocolVersion,
    status: u16,
    headers: Headers,
    message_body: Option<Bytes>,
}

impl HttpResponse {
    pub fn new(
        version: ProtocolVersion,
        status: u16,
        headers: Headers,
        message_body: Option<Bytes>,
    ) -> Self {
        Self {
            version,
            status,
            headers,
            message_body: message_body.filter(|b| !b.is_empty()),
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn message_body(&self) -> Option<&Bytes> {
        self.message_body.as_ref()
    }

    pub fn has_message_body(&self) -> bool {
        self.message_body.is_some()
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn message_body_text(&self) -> Option<Cow<'_, str>> {
        self.message_body.as_deref().map(String::from_utf8_lossy)
    }
}
