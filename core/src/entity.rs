//! The account handle that owns the API credentials.
//!
//! # Design
//! `Entity` is the root of every other resource: it holds the key/token
//! pair, the API base URL, and the host's [`Transport`]. It is the only
//! type that builds URLs and the only one that talks to the transport, so
//! credentials have a single source of truth. Cloning is cheap (`Arc`
//! inner) and the credentials are immutable after construction — rotating
//! a token means constructing a new `Entity`.
//!
//! Construction comes in two flavors. [`Entity::new`] is pedantic: an
//! empty key is a [`Error::Validation`]. [`Entity::new_lenient`] logs a
//! warning instead and returns a degraded handle that can still attempt
//! reads of public data but refuses every write at call time.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::url::{build_url, ParamValue};

const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

#[derive(Clone)]
struct EntityInner {
    transport: Arc<dyn Transport>,
    base_url: String,
    key: String,
    token: Option<String>,
    user: OnceCell<String>,
}

/// A Trello account: credentials plus the transport to reach the API.
#[derive(Clone)]
pub struct Entity {
    inner: Arc<EntityInner>,
}

#[derive(Deserialize)]
struct MemberData {
    username: String,
}

impl Entity {
    /// Construct an entity, rejecting an empty key before any I/O.
    ///
    /// `token` may be omitted for read access to public boards; any write
    /// through a token-less entity fails with [`Error::Authorization`] at
    /// call time, not here.
    pub fn new(
        transport: Arc<dyn Transport>,
        key: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, Error> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::Validation("API key must not be empty".to_string()));
        }
        Ok(Self::assemble(transport, key, token))
    }

    /// Like [`Entity::new`], but an empty key logs a warning instead of
    /// failing. The resulting handle refuses all writes.
    pub fn new_lenient(
        transport: Arc<dyn Transport>,
        key: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        let key = key.into();
        if key.is_empty() {
            log::warn!("entity constructed without an API key; writes will be refused");
        }
        Self::assemble(transport, key, token)
    }

    fn assemble(transport: Arc<dyn Transport>, key: String, token: Option<String>) -> Self {
        Self {
            inner: Arc::new(EntityInner {
                transport,
                base_url: DEFAULT_BASE_URL.to_string(),
                key,
                token,
                user: OnceCell::new(),
            }),
        }
    }

    /// Point the entity at a different API root (a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.inner).base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn has_token(&self) -> bool {
        self.inner.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The username behind these credentials, resolved lazily.
    ///
    /// The first call issues `GET /members/me`; the result is cached for
    /// the lifetime of the entity.
    pub fn user(&self) -> Result<&str, Error> {
        self.inner
            .user
            .get_or_try_init(|| {
                let response = self.get("/members/me", &[])?;
                let member: MemberData = response.json()?;
                Ok(member.username)
            })
            .map(String::as_str)
    }

    pub(crate) fn get(
        &self,
        page: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<HttpResponse, Error> {
        self.request(HttpMethod::Get, page, params)
    }

    /// GET where "missing or inaccessible" is an expected outcome: 404 and
    /// credential rejections map to `Ok(None)` instead of an error.
    pub(crate) fn get_opt(
        &self,
        page: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<Option<HttpResponse>, Error> {
        match self.request(HttpMethod::Get, page, params) {
            Ok(response) => Ok(Some(response)),
            Err(Error::Authorization(_)) | Err(Error::Http { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn post(
        &self,
        page: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<HttpResponse, Error> {
        self.require_write()?;
        self.request(HttpMethod::Post, page, params)
    }

    pub(crate) fn put(
        &self,
        page: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<HttpResponse, Error> {
        self.require_write()?;
        self.request(HttpMethod::Put, page, params)
    }

    pub(crate) fn delete(
        &self,
        page: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<HttpResponse, Error> {
        self.require_write()?;
        self.request(HttpMethod::Delete, page, params)
    }

    /// Eager credential check for mutating calls. Runs before any I/O.
    fn require_write(&self) -> Result<(), Error> {
        if self.inner.key.is_empty() {
            return Err(Error::Authorization(
                "writes require an API key".to_string(),
            ));
        }
        if !self.has_token() {
            return Err(Error::Authorization(
                "writes require an API token".to_string(),
            ));
        }
        Ok(())
    }

    fn request(
        &self,
        method: HttpMethod,
        page: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<HttpResponse, Error> {
        let url = build_url(
            &self.inner.base_url,
            page,
            params,
            &self.inner.key,
            self.inner.token.as_deref(),
        )?;
        // Log the page, never the URL: the URL carries the credentials.
        log::debug!("{method:?} {page}");
        let response = self.inner.transport.execute(&HttpRequest { method, url })?;
        match response.status {
            200..=299 => Ok(response),
            401 | 403 => Err(Error::Authorization(format!(
                "server rejected credentials (HTTP {})",
                response.status
            ))),
            status => Err(Error::Http {
                status,
                body: response.body,
            }),
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Redacted on purpose.
        f.debug_struct("Entity")
            .field("base_url", &self.inner.base_url)
            .field("has_token", &self.has_token())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubTransport;

    #[test]
    fn construction_succeeds_with_non_empty_key() {
        let stub = StubTransport::new();
        let entity = Entity::new(stub, "k123", Some("t".to_string())).unwrap();
        assert_eq!(entity.key(), "k123");
        assert!(entity.has_token());
    }

    #[test]
    fn empty_key_is_a_validation_error() {
        let stub = StubTransport::new();
        let err = Entity::new(stub, "", None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn lenient_construction_yields_a_read_only_handle() {
        let stub = StubTransport::new();
        let entity = Entity::new_lenient(stub.clone(), "", None);
        let err = entity.post("/boards", &[]).unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn writes_without_token_fail_before_any_io() {
        let stub = StubTransport::new();
        let entity = Entity::new(stub.clone(), "k", None).unwrap();
        let err = entity.put("/boards/abc", &[]).unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn requests_carry_auth_in_the_url() {
        let stub = StubTransport::new();
        stub.push(200, "{}");
        let entity = Entity::new(stub.clone(), "k123", Some("t456".to_string()))
            .unwrap()
            .with_base_url("http://localhost:3000/1");
        entity.get("/boards/abc", &[]).unwrap();
        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, HttpMethod::Get);
        assert_eq!(
            calls[0].url,
            "http://localhost:3000/1/boards/abc?key=k123&token=t456"
        );
    }

    #[test]
    fn user_is_fetched_once_and_cached() {
        let stub = StubTransport::new();
        stub.push(200, r#"{"id":"m1","username":"alice"}"#);
        let entity = Entity::new(stub.clone(), "k", None).unwrap();
        assert_eq!(entity.user().unwrap(), "alice");
        assert_eq!(entity.user().unwrap(), "alice");
        assert_eq!(stub.call_count(), 1);
    }

    #[test]
    fn auth_rejection_maps_to_authorization() {
        let stub = StubTransport::new();
        stub.push(401, "invalid token");
        let entity = Entity::new(stub, "k", None).unwrap();
        let err = entity.get("/boards/abc", &[]).unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
    }

    #[test]
    fn unexpected_status_maps_to_http() {
        let stub = StubTransport::new();
        stub.push(500, "boom");
        let entity = Entity::new(stub, "k", None).unwrap();
        let err = entity.get("/boards/abc", &[]).unwrap_err();
        assert!(matches!(err, Error::Http { status: 500, .. }));
    }

    #[test]
    fn get_opt_maps_missing_and_inaccessible_to_none() {
        let stub = StubTransport::new();
        stub.push(404, "");
        stub.push(403, "no access");
        let entity = Entity::new(stub, "k", None).unwrap();
        assert!(entity.get_opt("/boards/abc", &[]).unwrap().is_none());
        assert!(entity.get_opt("/boards/abc", &[]).unwrap().is_none());
    }
}
