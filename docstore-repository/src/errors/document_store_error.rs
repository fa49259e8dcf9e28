//! Document store error types.
//!
//! This module defines the unified error type for all document store
//! operations. Absent documents are not errors: `get`, `get_source` and
//! `delete` report them as `None` / `DeleteResult::NotFound`.

use thiserror::Error;

/// Unified errors from document store operations.
///
/// Used by the `DocumentStoreProvider` trait and `DocumentStoreClient`.
/// Only `TransportError` is worth retrying; a `RequestError` will fail the same
/// way every time it is sent.
#[derive(Debug, Clone, Error)]
pub enum DocumentStoreError {
    /// The store could not be reached, or answered that it is unavailable.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The call did not complete before its deadline.
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// The store rejected the request (malformed body, missing index, invalid input).
    #[error("Request error: {0}")]
    RequestError(String),

    /// The store answered with a body the client could not understand.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl DocumentStoreError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::TimeoutError(msg.into())
    }

    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestError(msg.into())
    }

    /// Create a validation error (reported as a request error).
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::RequestError(format!("invalid input: {}", msg.into()))
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Classify an unsuccessful HTTP status.
    ///
    /// Gateway and availability failures (502, 503, 504) are transport
    /// problems; every other status is a rejected request.
    pub fn from_status(operation: &str, status: u16, body: &str) -> Self {
        let msg = format!("{} failed with status {}: {}", operation, status, body);
        match status {
            502..=504 => Self::TransportError(msg),
            _ => Self::RequestError(msg),
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }
}

impl From<opensearch::Error> for DocumentStoreError {
    fn from(err: opensearch::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else {
            Self::TransportError(err.to_string())
        }
    }
}
