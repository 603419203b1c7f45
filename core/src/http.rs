//! HTTP boundary types for the host-does-IO pattern.
//!
//! # Design
//! The library never touches the network itself. It builds fully
//! authenticated URLs, hands a plain-data [`HttpRequest`] to the host's
//! [`Transport`] implementation, and interprets the [`HttpResponse`] that
//! comes back. Every mutation argument travels in the query string (the
//! discipline the Trello API supports for all endpoints used here), so a
//! request is nothing more than a method and a URL. This keeps the core
//! deterministic and lets tests substitute a recording stub for the
//! transport.

use serde::de::DeserializeOwned;

use crate::error::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data. The URL already carries the
/// auth credentials and all operation arguments as query parameters.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
}

/// An HTTP response described as plain data, produced by the host's
/// [`Transport`] after executing an [`HttpRequest`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as JSON into `T`, mapping any parse failure to
    /// [`Error::Decode`] so a malformed response never yields a partially
    /// populated object.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| Error::Decode(e.to_string()))
    }
}

/// The generic request/response capability the host supplies.
///
/// One call is one blocking round trip; the library performs no retry,
/// backoff, or timeout handling of its own. Implementations should return
/// non-2xx responses as data rather than errors — status interpretation
/// belongs to the library. [`Error::Transport`] is reserved for failures
/// where no response was obtained at all.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}
