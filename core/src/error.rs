//! Error types for the relay core.
//!
//! # Design
//! Only input validation can fail in this crate. Everything else (header
//! mapping, request construction, response mapping) is total, so there is a
//! single variant carrying the offending input and the diagnostic of the
//! layer that rejected it. Transport failures of the client that executes a
//! `ClientRequest` are the caller's concern and never show up here.

use thiserror::Error;

/// Errors returned by `parse_strict` and `ClientRequest::into_http`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The input is not a valid URI, has a malformed server authority, or
    /// holds a header/method the `http` crate refuses.
    #[error("invalid argument {input:?}: {reason}")]
    InvalidArgument { input: String, reason: String },
}

impl RelayError {
    pub(crate) fn invalid_argument(input: impl Into<String>, reason: impl ToString) -> Self {
        RelayError::InvalidArgument {
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
