//! Fixed-response backend used to exercise the relay bridge over real HTTP.

use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    routing::{any, get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";
pub const HELLO_BODY: &str = "Hello world";

pub fn app() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/empty", get(empty))
        .route("/headers", get(request_headers))
        .route("/echo", post(echo).put(echo))
        .route("/method", any(method_name))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Mock server listening");
    }
    axum::serve(listener, app()).await
}

/// Headers every fixture response carries, plus a fresh request id.
fn fixture_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("header-1", HeaderValue::from_static("value-1"));
    headers.insert("header-2", HeaderValue::from_static("value-2"));
    if let Ok(id) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
        headers.insert(X_REQUEST_ID, id);
    }
    headers
}

async fn hello() -> (HeaderMap, &'static str) {
    tracing::debug!("Serving hello");
    (fixture_headers(), HELLO_BODY)
}

async fn empty() -> (StatusCode, HeaderMap) {
    tracing::debug!("Serving empty 500");
    (StatusCode::INTERNAL_SERVER_ERROR, fixture_headers())
}

async fn request_headers(headers: HeaderMap) -> Json<Value> {
    let mut received = Map::new();
    for (name, value) in headers.iter() {
        received.insert(
            name.as_str().to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }
    tracing::debug!(count = received.len(), "Reflecting request headers");
    Json(Value::Object(received))
}

async fn echo(headers: HeaderMap, body: Bytes) -> (HeaderMap, Bytes) {
    let mut reply = HeaderMap::new();
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        reply.insert(header::CONTENT_TYPE, content_type.clone());
    }
    tracing::debug!(len = body.len(), "Echoing body");
    (reply, body)
}

async fn method_name(method: Method) -> String {
    tracing::debug!(method = %method, "Reporting request method");
    method.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_headers_carry_request_id() {
        let headers = fixture_headers();
        assert_eq!(headers["header-1"], "value-1");
        assert_eq!(headers["header-2"], "value-2");
        let id = headers[X_REQUEST_ID].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(fixture_headers()[X_REQUEST_ID], fixture_headers()[X_REQUEST_ID]);
    }
}
