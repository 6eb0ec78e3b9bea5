//! URI rewriting and HTTP client bridge for the relay.
//!
//! # Overview
//! Two independent pieces:
//! - `uri`: point a URI at another host (`rewrite_host`) and parse URIs whose
//!   authority must name a real server (`parse_strict`).
//! - `mappers`: translate the internal message model (`Headers`,
//!   `HttpRequest`, `HttpResponse`) to and from the `http`-crate values a
//!   client engine works with.
//!
//! # Design
//! - Nothing here does I/O. The caller executes `ClientRequest`s with its
//!   engine of choice and hands back `ClientResponse`s (host-does-IO).
//! - All functions are pure and all types are immutable values, so every
//!   entry point is safe to call from any thread without coordination.
//! - Only input validation can fail (`RelayError::InvalidArgument`).

pub mod client;
pub mod error;
pub mod headers;
pub mod message;
pub mod mappers;
pub mod uri;

pub use crate::client::{ClientRequest, ClientResponse};
pub use crate::error::{RelayError, Result};
pub use crate::headers::Headers;
pub use crate::message::{HttpMethod, HttpRequest, HttpResponse, ProtocolVersion};
pub use crate::mappers::{
    client_to_headers, headers_to_client, request_to_client, response_mapper, ResponseMapper,
};
pub use crate::uri::{parse_strict, rewrite_host, HostSpec};
