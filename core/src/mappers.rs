//! Conversions between the internal message model and the client engine.
//!
//! # Design
//! Every function here is pure: it reads its input and builds a fresh value.
//! Headers the `http` crate cannot represent are skipped with a warning
//! instead of failing the whole conversion, so the mappings stay total.
//!
//! `response_mapper` resolves a version string once and returns a `Copy`
//! strategy value. Callers keep it around and map every response of a
//! connection through it; version-specific response handling belongs in
//! `ResponseMapper::map` so call sites never change.

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;

use crate::client::{ClientRequest, ClientResponse};
use crate::headers::Headers;
use crate::message::{HttpRequest, HttpResponse, ProtocolVersion};

/// Copy every internal header into a new `HeaderMap`, in insertion order.
pub fn headers_to_client(headers: &Headers) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .ok()
            .zip(HeaderValue::from_str(value).ok());
        match parsed {
            Some((name, value)) => {
                map.append(name, value);
            }
            None => tracing::warn!(header = %name, "Skipping header not representable on the wire"),
        }
    }
    map
}

/// Build internal `Headers` from a `HeaderMap`.
///
/// Repeated values of one name are joined with `", "`; values that are not
/// valid UTF-8 are decoded lossily.
pub fn client_to_headers(map: &HeaderMap) -> Headers {
    map.keys()
        .map(|name| {
            let value = map
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str(), value)
        })
        .collect()
}

/// Build a client request for `request` aimed at `base_url`.
///
/// `base_url` is used exactly as given; composing it with the request target
/// is the caller's job.
pub fn request_to_client(base_url: &str, request: &HttpRequest) -> ClientRequest {
    tracing::trace!(
        method = ?request.method(),
        url = base_url,
        headers = request.headers().len(),
        "Mapping request to client"
    );
    ClientRequest {
        method: request.method().into(),
        url: base_url.to_string(),
        headers: headers_to_client(request.headers()),
        body: request.body().cloned(),
    }
}

/// Converts client responses into `HttpResponse` values for one protocol
/// version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseMapper {
    version: ProtocolVersion,
}

impl ResponseMapper {
    pub fn new(version: ProtocolVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn map(&self, response: ClientResponse) -> HttpResponse {
        let headers = client_to_headers(&response.headers);
        // Same for every version so far: a zero-length payload means no body.
        let body = response.body.filter(|b| !b.is_empty());
        tracing::trace!(
            version = %self.version,
            status = response.status.as_u16(),
            body_len = body.as_ref().map_or(0, |b| b.len()),
            "Mapped client response"
        );
        HttpResponse::new(self.version, response.status.as_u16(), headers, body)
    }
}

/// Resolve the mapper for `http_version` (e.g. `"HTTP/1.1"`).
///
/// Unknown versions fall back to HTTP/1.1.
pub fn response_mapper(http_version: &str) -> ResponseMapper {
    let version = match http_version.parse::<ProtocolVersion>() {
        Ok(version) => version,
        Err(e) => {
            tracing::warn!(error = %e, fallback = %ProtocolVersion::Http11, "Unknown HTTP version");
            ProtocolVersion::Http11
        }
    };
    tracing::debug!(version = %version, "Response mapper selected");
    ResponseMapper::new(version)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::error::RelayError;
    use crate::message::HttpMethod;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_send_and_sync() {
        assert_send_sync::<Headers>();
        assert_send_sync::<HttpRequest>();
        assert_send_sync::<HttpResponse>();
        assert_send_sync::<ClientRequest>();
        assert_send_sync::<ClientResponse>();
        assert_send_sync::<ResponseMapper>();
        assert_send_sync::<RelayError>();
    }

    fn two_headers() -> Headers {
        Headers::empty().put("header-1", "value-1").put("header-2", "value-2")
    }

    fn client_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        map.append("header-1", HeaderValue::from_static("value-1"));
        map.append("header-2", HeaderValue::from_static("value-2"));
        map
    }

    #[test]
    fn headers_to_client_copies_every_pair() {
        let map = headers_to_client(&two_headers());
        assert_eq!(map.len(), 2);
        assert_eq!(map["header-1"], "value-1");
        assert_eq!(map["header-2"], "value-2");
    }

    #[test]
    fn headers_to_client_skips_invalid_entries() {
        let headers = two_headers().put("bad name", "x").put("header-3", "line\nbreak");
        let map = headers_to_client(&headers);
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("header-3"));
    }

    #[test]
    fn client_to_headers_copies_every_pair() {
        let headers = client_to_headers(&client_headers());
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("header-1"), Some("value-1"));
        assert_eq!(headers.get("header-2"), Some("value-2"));
    }

    #[test]
    fn client_to_headers_joins_repeated_values() {
        let mut map = HeaderMap::new();
        map.append("accept", HeaderValue::from_static("text/html"));
        map.append("accept", HeaderValue::from_static("application/json"));

        let headers = client_to_headers(&map);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("accept"), Some("text/html, application/json"));
    }

    #[test]
    fn headers_round_trip() {
        let headers = two_headers().put("Content-Type", "text/plain");
        assert_eq!(client_to_headers(&headers_to_client(&headers)), headers);
    }

    #[test]
    fn request_to_client_keeps_url_verbatim() {
        let request = HttpRequest::get("", two_headers());
        let client = request_to_client("http://localhost", &request);

        assert_eq!(client.url, "http://localhost");
        assert_eq!(client.method, http::Method::GET);
        assert_eq!(client.headers["header-1"], "value-1");
        assert_eq!(client.headers["header-2"], "value-2");
        assert!(client.body.is_none());
    }

    #[test]
    fn request_to_client_carries_body() {
        let request = HttpRequest::with_body(HttpMethod::Put, "/x", Headers::empty(), "data");
        let client = request_to_client("http://localhost/x", &request);
        assert_eq!(client.method, http::Method::PUT);
        assert_eq!(client.body, Some(Bytes::from_static(b"data")));
    }

    #[test]
    fn response_with_body_is_present() {
        let response = ClientResponse::new(StatusCode::OK, client_headers()).with_body("Hello world");
        let mapped = response_mapper("HTTP/1.1").map(response);

        assert_eq!(mapped.headers().get("header-1"), Some("value-1"));
        assert_eq!(mapped.headers().get("header-2"), Some("value-2"));
        assert!(mapped.has_message_body());
        assert_eq!(mapped.message_body_text().as_deref(), Some("Hello world"));
        assert_eq!(mapped.status(), 200);
        assert_eq!(mapped.version(), ProtocolVersion::Http11);
    }

    #[test]
    fn response_without_body_is_absent() {
        let response = ClientResponse::new(StatusCode::INTERNAL_SERVER_ERROR, client_headers());
        let mapped = response_mapper("HTTP/1.1").map(response);

        assert_eq!(mapped.headers().get("header-1"), Some("value-1"));
        assert!(!mapped.has_message_body());
        assert_eq!(mapped.status(), 500);
    }

    #[test]
    fn zero_length_body_is_absent() {
        let response = ClientResponse::new(StatusCode::OK, HeaderMap::new()).with_body(Bytes::new());
        assert!(!response_mapper("HTTP/2").map(response).has_message_body());
    }

    #[test]
    fn mapper_follows_version_string() {
        assert_eq!(response_mapper("HTTP/1.0").version(), ProtocolVersion::Http10);
        assert_eq!(response_mapper("HTTP/2.0").version(), ProtocolVersion::Http2);
        assert_eq!(response_mapper("HTTP/9").version(), ProtocolVersion::Http11);
    }

    #[test]
    fn mapper_is_reusable() {
        let mapper = response_mapper("HTTP/1.1");
        let first = mapper.map(ClientResponse::new(StatusCode::OK, HeaderMap::new()).with_body("a"));
        let second = mapper.map(ClientResponse::new(StatusCode::OK, HeaderMap::new()));
        assert!(first.has_message_body());
        assert!(!second.has_message_body());
    }
}
