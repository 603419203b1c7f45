//! Error types for the Trello client.
//!
//! # Design
//! One public enum covering every failure class the library can produce.
//! "Does not exist" is deliberately absent: fetch-by-id returns `Ok(None)`
//! and fetch-all returns an empty vec, because a missing resource is an
//! expected outcome rather than a failure. A caller seeing `Validation`
//! knows no request was issued; the check always runs before any I/O.

use thiserror::Error;

/// Errors returned by every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input rejected before any network call (empty API key,
    /// empty or oversized board name, empty URL page).
    #[error("invalid input: {0}")]
    Validation(String),

    /// A write was attempted without sufficient credentials, or the server
    /// rejected the request with 401/403.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// The server returned an unexpected non-2xx status. Raw status and
    /// body are kept for debugging.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The host transport failed to complete the round trip (network error,
    /// timeout, connection refused).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body was not valid JSON or lacked an expected field.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The handle was used after a successful `delete`.
    #[error("handle is no longer usable: {0}")]
    InvalidState(&'static str),
}
