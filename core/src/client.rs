//! Client-side wire values handed to and received from the HTTP engine.
//!
//! # Design
//! The core never performs I/O. `ClientRequest` is what the caller executes
//! and `ClientResponse` is what it hands back once the round trip is over;
//! both are built from `http`-crate types so any engine speaking `http` 1.x
//! (`ureq`, `hyper`, `reqwest`) plugs in without further glue.
//!
//! `ClientRequest` keeps its URL as the caller's string instead of an
//! `http::Uri`, because `Uri` normalizes (`http://host` prints as
//! `http://host/`) and the URL must come out exactly as it went in.

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Version};

use crate::error::{RelayError, Result};

/// A request ready to be executed by the client engine.
#[derive(Debug, Clone)]
pub struct ClientRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl ClientRequest {
    /// Convert into an `http::Request`, validating the URL on the way.
    pub fn into_http(self) -> Result<http::Request<Bytes>> {
        let mut builder = http::Request::builder()
            .method(self.method)
            .uri(self.url.as_str());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }
        builder
            .body(self.body.unwrap_or_default())
            .map_err(|e| RelayError::invalid_argument(self.url, e))
    }
}

/// A response as received from the client engine.
///
/// `body` is `None` when the engine exposed no payload at all; a zero-length
/// payload may also show up as `Some(empty)`. The mapper treats both alike.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    pub version: Version,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl ClientResponse {
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            version: Version::HTTP_11,
            status,
            headers,
            body: None,
        }
    }

    pub fn with_body(self, body: impl Into<Bytes>) -> Self {
        Self {
            body: Some(body.into()),
            ..self
        }
    }
}

impl<B: Into<Bytes>> From<http::Response<B>> for ClientResponse {
    fn from(response: http::Response<B>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            version: parts.version,
            status: parts.status,
            headers: parts.headers,
            body: Some(body.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    #[test]
    fn into_http_keeps_method_headers_and_body() {
        let mut headers = HeaderMap::new();
        headers.insert("header-1", HeaderValue::from_static("value-1"));
        let req = ClientRequest {
            method: Method::POST,
            url: "http://localhost:3000/echo".to_string(),
            headers,
            body: Some(Bytes::from_static(b"ping")),
        };

        let http_req = req.into_http().unwrap();
        assert_eq!(http_req.method(), Method::POST);
        assert_eq!(http_req.uri(), "http://localhost:3000/echo");
        assert_eq!(http_req.headers()["header-1"], "value-1");
        assert_eq!(http_req.body(), &Bytes::from_static(b"ping"));
    }

    #[test]
    fn into_http_rejects_bad_url() {
        let req = ClientRequest {
            method: Method::GET,
            url: "http://bad host/".to_string(),
            headers: HeaderMap::new(),
            body: None,
        };
        let err = req.into_http().unwrap_err();
        assert!(matches!(err, RelayError::InvalidArgument { ref input, .. } if input == "http://bad host/"));
    }

    #[test]
    fn from_http_response() {
        let response = http::Response::builder()
            .status(404)
            .header("header-1", "value-1")
            .body("missing")
            .unwrap();

        let client = ClientResponse::from(response);
        assert_eq!(client.status, StatusCode::NOT_FOUND);
        assert_eq!(client.version, Version::HTTP_11);
        assert_eq!(client.headers["header-1"], "value-1");
        assert_eq!(client.body, Some(Bytes::from_static(b"missing")));
    }
}
